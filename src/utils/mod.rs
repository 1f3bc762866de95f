//! Utility functions and helpers for csk-sniffer.
//!
//! # Submodules
//!
//! - `logging`: Tracing and logging initialization.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod logging;
