//! CLI command handlers.
//!
//! Handlers hold the logic behind the command line so it can be tested
//! without spawning the binary; `main.rs` only parses arguments and sets up
//! logging.

mod combine;

pub use combine::run_combine;

// Re-export config types used by handlers
pub use crate::config::{CombineConfig, CombineConfigBuilder};
