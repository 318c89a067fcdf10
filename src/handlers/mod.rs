//! Request handlers for the LiveReload endpoint

pub mod websocket;

// Re-export the websocket handler
pub use websocket::handle_browser;
