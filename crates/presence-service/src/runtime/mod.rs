//! Task runtime: shutdown signalling, periodic loops, notification dispatch

mod dispatch;
mod scheduler;
mod shutdown;

pub use dispatch::{dispatch, spawn_dispatcher, DispatchStats};
pub use scheduler::{run_every, spawn_collector};
pub use shutdown::{shutdown_channel, Shutdown, ShutdownTrigger};
