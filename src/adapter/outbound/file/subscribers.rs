//! Line-delimited subscriber file.
//!
//! One decimal chat id per line, no header. Every save rewrites the whole
//! file in place; the write is not atomic, so a crash mid-write can leave a
//! truncated file behind.

use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::SubscriberId;
use crate::error::{Error, Result, StoreError};
use crate::port::SubscriberStore;

#[derive(Debug, Clone)]
pub struct FileSubscriberStore {
    path: PathBuf,
}

impl FileSubscriberStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SubscriberStore for FileSubscriberStore {
    fn load(&self) -> Result<HashSet<SubscriberId>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Subscriber file not found, starting empty");
                return Ok(HashSet::new());
            }
            Err(e) => return Err(StoreError::Read(e).into()),
        };

        parse_subscribers(&content)
    }

    fn save(&self, subscribers: &HashSet<SubscriberId>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(StoreError::Write)?;
        }

        fs::write(&self.path, render_subscribers(subscribers)).map_err(StoreError::Write)?;
        debug!(
            path = %self.path.display(),
            subscribers = subscribers.len(),
            "Subscriber file written"
        );
        Ok(())
    }
}

fn parse_subscribers(content: &str) -> Result<HashSet<SubscriberId>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            line.parse::<SubscriberId>().map_err(|_| {
                Error::from(StoreError::InvalidLine {
                    line: index + 1,
                    content: line.to_string(),
                })
            })
        })
        .collect()
}

fn render_subscribers(subscribers: &HashSet<SubscriberId>) -> String {
    let mut ids: Vec<_> = subscribers.iter().copied().collect();
    ids.sort_unstable();
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
