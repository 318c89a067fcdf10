//! LiveReload server - the browser side of the LiveReload protocol
//!
//! This library accepts WebSocket connections from LiveReload browser
//! extensions, performs the protocol 7 handshake and broadcasts `reload`
//! commands whenever the caller reports changed files.

pub mod config;
pub mod constants;
pub mod core;
pub mod error;
pub mod handlers;
pub mod notify;

// Re-export main components
pub use config::ReloadConfig;
pub use constants::*;
pub use crate::core::LiveReloadServer;
pub use error::{LiveReloadError, Result};
pub use notify::{LogNotifier, Notifier, NotifyStyle};
