use futures_util::sink::{Sink, SinkExt};
use futures_util::stream::StreamExt;
use log::{debug, error, info, warn};
use std::fmt;
use tokio::sync::mpsc;
use warp::ws::{Message, WebSocket};

use crate::core::connection::Connection;
use crate::core::message::{ClientMessage, ServerMessage};
use crate::core::registry::{lock_registry, Registry};
use crate::error::{LiveReloadError, Result};

// Handle one browser connection from handshake to close
pub async fn handle_browser(ws: WebSocket, registry: Registry) {
    let (mut ws_tx, mut ws_rx) = ws.split();

    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();

    let connection_id = match open_connection(&mut ws_tx, &registry, tx).await {
        Ok(id) => id,
        Err(e) => {
            error!("Failed to open browser connection: {}", e);
            error!("{:?}", e);
            return;
        }
    };

    // Spawn a task to forward queued frames to the WebSocket
    let writer = tokio::task::spawn(async move {
        while let Some(message) = rx.recv().await {
            if let Err(e) = ws_tx.send(message).await {
                debug!("Failed to send WebSocket frame: {}", e);
                break;
            }
        }
    });

    // Handle incoming frames until the socket closes
    while let Some(result) = ws_rx.next().await {
        match result {
            Ok(msg) => {
                if msg.is_close() {
                    break;
                }
                // Only text frames carry protocol messages
                if let Ok(text) = msg.to_str() {
                    process_message(text, &connection_id);
                }
            }
            Err(e) => {
                debug!("WebSocket error on {}: {}", connection_id, e);
                break;
            }
        }
    }

    // Browser disconnected
    match lock_registry(&registry) {
        Ok(mut registry_guard) => {
            if let Some(connection) = registry_guard.unregister(&connection_id) {
                debug!(
                    "Browser {} disconnected after {:?}, {} live connections",
                    connection_id,
                    connection.connection_duration(),
                    registry_guard.client_count()
                );
            }
        }
        Err(e) => {
            error!("Failed to acquire registry lock for unregistration: {}", e);
        }
    }

    writer.abort();
}

// Send the handshake, then enter the live set. A browser whose hello
// could not be sent is never registered.
async fn open_connection<S>(
    ws_tx: &mut S,
    registry: &Registry,
    sender: mpsc::UnboundedSender<Message>,
) -> Result<String>
where
    S: Sink<Message> + Unpin,
    S::Error: fmt::Display,
{
    send_hello(ws_tx).await?;

    let connection = Connection::new(sender);
    let connection_id = connection.id.clone();

    let mut registry_guard = lock_registry(registry)?;
    let registration = registry_guard.register(connection);
    if registration.is_first() {
        info!("Browser connected.");
    }
    debug!(
        "Browser {} registered, {} live connections",
        connection_id,
        registry_guard.client_count()
    );

    Ok(connection_id)
}

async fn send_hello<S>(ws_tx: &mut S) -> Result<()>
where
    S: Sink<Message> + Unpin,
    S::Error: fmt::Display,
{
    let hello = ServerMessage::hello().to_json()?;
    ws_tx
        .send(Message::text(hello))
        .await
        .map_err(|e| LiveReloadError::SendFailed(e.to_string()))
}

// Act on a frame sent by the browser
fn process_message(text: &str, connection_id: &str) {
    match ClientMessage::parse(text) {
        Ok(ClientMessage::Url { url }) => info!("Browser URL: {}", url),
        Ok(ClientMessage::Hello { protocols }) => {
            debug!("Browser {} speaks {}", connection_id, protocols.join(", "))
        }
        Ok(ClientMessage::Info { url: Some(url) }) => {
            debug!("Browser {} reported info for {}", connection_id, url)
        }
        Ok(_) => {}
        Err(e) => warn!("Ignoring malformed frame from {}: {}", connection_id, e),
    }
}
