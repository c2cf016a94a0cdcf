//! Subscriber storage configuration.

use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Subscriber file, one chat id per line.
    #[serde(default = "default_subscribers_file")]
    pub subscribers_file: PathBuf,
}

fn default_subscribers_file() -> PathBuf {
    PathBuf::from("data/subscribers.txt")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            subscribers_file: default_subscribers_file(),
        }
    }
}
