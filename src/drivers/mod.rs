//! Drivers module
//!
//! Register-level peripheral drivers and the bus primitives they share.

pub mod ab0805;
pub mod register_bus;

#[cfg(test)]
pub(crate) mod fake_bus;
