//! Feed session supervision.

mod backoff;
mod supervisor;

pub use backoff::Backoff;
pub use supervisor::FeedSupervisor;
