use std::error::Error;
use std::fmt;
use std::sync::PoisonError;

#[derive(Debug)]
pub enum LiveReloadError {
    // Startup errors
    ConfigError(String),
    BindError { addr: String, reason: String },
    RuntimeError(String),

    // Registry errors
    RegistryLock(String),

    // Connection errors
    SendFailed(String),
    ConnectionClosed,

    // Messages errors
    MessageSerializeError(String),
    MessageParseError(String),

    // Side channel errors
    NotifyError(String),
}

impl fmt::Display for LiveReloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            Self::BindError { addr, reason } => {
                write!(f, "Failed to bind listener on {}: {}", addr, reason)
            }
            Self::RuntimeError(msg) => write!(f, "Runtime error: {}", msg),
            Self::RegistryLock(msg) => write!(f, "Registry lock error: {}", msg),
            Self::SendFailed(msg) => write!(f, "Send failed: {}", msg),
            Self::ConnectionClosed => write!(f, "Connection closed unexpectedly"),
            Self::MessageSerializeError(msg) => write!(f, "Message serialize error: {}", msg),
            Self::MessageParseError(msg) => write!(f, "Message parse error: {}", msg),
            Self::NotifyError(msg) => write!(f, "Notification error: {}", msg),
        }
    }
}

impl Error for LiveReloadError {}

// Converting from PoisonError to facilitate poisoned mutex handling
impl<T> From<PoisonError<T>> for LiveReloadError {
    fn from(err: PoisonError<T>) -> Self {
        LiveReloadError::RegistryLock(format!("Mutex poisoned: {}", err))
    }
}

impl From<serde_json::Error> for LiveReloadError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() || err.is_syntax() || err.is_eof() {
            LiveReloadError::MessageParseError(err.to_string())
        } else {
            LiveReloadError::MessageSerializeError(err.to_string())
        }
    }
}

// Generic result type for the LiveReload server
pub type Result<T> = std::result::Result<T, LiveReloadError>;
