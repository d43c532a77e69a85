//! # AB0805 Real-Time Clock
//!
//! Blocking `embedded-hal` 1.0 driver for the Abracon AB0805 I2C RTC.
//!
//! - [`drivers::ab0805`]: register-level driver (time/date counters, 12/24h
//!   hours, clock and oscillator control, identity check)
//! - [`drivers::register_bus`]: byte/bit register primitives over any I2C bus
//! - [`middleware::ab0805_api`]: bring-up, cached "now" and ISO-8601 output
//!
//! Logging goes through `defmt` when the `defmt` feature is on.

#![cfg_attr(not(test), no_std)]

// Must stay first so the logging macros are visible everywhere below.
#[macro_use]
mod fmt;

pub mod drivers;
pub mod middleware;

pub use drivers::ab0805::{
    Ab0805, Date, DateTime, DateTime12, Error, HourMode, Meridiem, RangePolicy, Time12, Time24,
    AB0805_ADDRESS,
};
pub use drivers::register_bus::{BusError, RegisterBus};
pub use middleware::ab0805_api::Ab0805Api;
