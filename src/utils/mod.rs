//! Shared utilities.

mod hash;

pub use hash::content_serial_number;
