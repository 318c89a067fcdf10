//! LiveReload protocol v7 wire messages
//!
//! Every frame is a JSON object discriminated by its `command` field.

use serde::{Deserialize, Serialize};

use crate::constants::{PROTOCOL_OFFICIAL_7, SERVER_NAME};
use crate::error::Result;

/// Server-to-browser frames
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum ServerMessage {
    /// Handshake sent once per connection
    Hello {
        protocols: Vec<String>,
        #[serde(rename = "serverName")]
        server_name: String,
    },

    /// Reload or hot-swap a single asset
    Reload(ReloadMessage),
}

impl ServerMessage {
    /// The handshake always advertises the official protocol 7 only
    pub fn hello() -> Self {
        Self::Hello {
            protocols: vec![PROTOCOL_OFFICIAL_7.to_string()],
            server_name: SERVER_NAME.to_string(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Body of a `reload` frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReloadMessage {
    pub path: String,
    #[serde(rename = "liveCSS")]
    pub live_css: bool,
    #[serde(rename = "overrideURL", skip_serializing_if = "Option::is_none", default)]
    pub override_url: Option<String>,
}

impl From<ReloadMessage> for ServerMessage {
    fn from(message: ReloadMessage) -> Self {
        ServerMessage::Reload(message)
    }
}

/// Browser-to-server frames
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum ClientMessage {
    /// Browser side of the handshake
    Hello {
        #[serde(default)]
        protocols: Vec<String>,
    },

    /// Page URL the browser is showing
    Url { url: String },

    /// Plugin/page information, only the page URL is used
    Info {
        #[serde(default)]
        url: Option<String>,
    },

    /// Any command this server does not implement
    #[serde(other)]
    Other,
}

impl ClientMessage {
    pub fn parse(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}
