//! Infrastructure configuration modules.

pub mod feed;
pub mod logging;
pub mod settings;
pub mod storage;
pub mod telegram;
