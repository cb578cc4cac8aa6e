//! Command implementations for the dailydo CLI

pub mod serve;

pub use serve::run_serve;
