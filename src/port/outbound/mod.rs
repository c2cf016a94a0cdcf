//! Outbound ports: everything the application calls out to.

pub mod feed;
pub mod messenger;
pub mod store;
