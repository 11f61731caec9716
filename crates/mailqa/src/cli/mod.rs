//! Command implementations for the mailqa binary.

pub mod ask;
pub mod config;
pub mod interactive;
pub mod preview;
