//! Core functionality for the LiveReload server

pub mod broadcast;
pub mod connection;
pub mod message;
pub mod reactor;
pub mod registry;
pub mod rewrite;
pub mod server;

// Re-export main components for convenience
pub use broadcast::Broadcaster;
pub use connection::Connection;
pub use message::{ClientMessage, ReloadMessage, ServerMessage};
pub use reactor::Reactor;
pub use registry::{create_registry, lock_registry, ConnectionRegistry, Registry};
pub use rewrite::rewrite_sass_path;
pub use server::LiveReloadServer;
