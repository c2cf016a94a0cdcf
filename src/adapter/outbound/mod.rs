//! Outbound adapters (driven side).

pub mod file;
pub mod lightstreamer;
pub mod telegram;
