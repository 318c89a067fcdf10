use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use log::debug;

use crate::core::connection::Connection;
use crate::error::Result;

// Outcome of registering a browser connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration {
    /// How many connections the registry has ever accepted, this one included
    pub ordinal: u64,
}

impl Registration {
    pub fn is_first(&self) -> bool {
        self.ordinal == 1
    }
}

// Live set of open browser connections
pub struct ConnectionRegistry {
    connections: HashMap<String, Connection>,
    // Never decremented, drives the one-time "Browser connected." line
    connections_count: u64,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: HashMap::new(),
            connections_count: 0,
        }
    }

    // Add a connection after its handshake went out
    pub fn register(&mut self, connection: Connection) -> Registration {
        if self.connections.insert(connection.id.clone(), connection).is_none() {
            self.connections_count += 1;
        }
        Registration {
            ordinal: self.connections_count,
        }
    }

    // Remove a connection; absent ids are a no-op
    pub fn unregister(&mut self, id: &str) -> Option<Connection> {
        self.connections.remove(id)
    }

    // Queue a text frame on every live connection, returns how many accepted it.
    // Closed handles are skipped; their own close transition evicts them.
    pub fn broadcast(&self, text: &str) -> usize {
        let mut success_count = 0;

        for connection in self.connections.values() {
            if connection.is_closed() {
                debug!("Skipping closed connection {}", connection.id);
                continue;
            }
            match connection.send_text(text) {
                Ok(()) => success_count += 1,
                Err(e) => debug!("Skipping connection {}: {}", connection.id, e),
            }
        }

        success_count
    }

    pub fn contains(&self, id: &str) -> bool {
        self.connections.contains_key(id)
    }

    // Get current clients count
    pub fn client_count(&self) -> usize {
        self.connections.len()
    }

    pub fn total_connections(&self) -> u64 {
        self.connections_count
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// Thread-safe registry wrapper
pub type Registry = Arc<Mutex<ConnectionRegistry>>;

// Create a new thread-safe registry
pub fn create_registry() -> Registry {
    Arc::new(Mutex::new(ConnectionRegistry::new()))
}

// Lock the registry, turning poisoning into a crate error
pub fn lock_registry(registry: &Registry) -> Result<MutexGuard<'_, ConnectionRegistry>> {
    Ok(registry.lock()?)
}
