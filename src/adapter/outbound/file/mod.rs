//! Plain-file persistence adapters.

mod subscribers;

pub use subscribers::FileSubscriberStore;
