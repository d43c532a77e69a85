//! Middleware module
//!
//! Thin APIs over the raw drivers for application code.

pub mod ab0805_api; // AB0805 RTC middleware
