//! Feed-agnostic domain types.

mod connection;
mod level;
mod subscriber;

pub use connection::ConnectionStatus;
pub use level::{LevelChange, TankReading, NOMINAL_STATUS_CLASS};
pub use subscriber::SubscriberId;
