//! Infrastructure layer.
//!
//! Provides technical concerns that support the application without containing
//! business logic: configuration, feed supervision and runtime wiring.
//!
//! # Submodules
//!
//! - [`config`] - Configuration loading and validation
//! - [`feed`] - Feed session supervision with reconnection backoff
//! - [`runtime`] - Composition root and service lifecycle
//! - [`shutdown`] - Cooperative shutdown signal

pub mod config;
pub mod feed;
pub mod runtime;
pub mod shutdown;
