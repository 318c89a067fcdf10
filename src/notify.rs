//! Desktop notification sink
//!
//! Delivery is up to the embedding application; the server only calls
//! into a [`Notifier`].

use log::info;
use std::fmt;

use crate::error::Result;

/// Style hint passed along with a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyStyle {
    Success,
    Failed,
    Pending,
}

impl fmt::Display for NotifyStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Failed => write!(f, "failed"),
            Self::Pending => write!(f, "pending"),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, message: &str, style: NotifyStyle) -> Result<()>;
}

/// Writes notifications to the log instead of the desktop
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, title: &str, message: &str, style: NotifyStyle) -> Result<()> {
        info!(target: "livereload::notify", "[{}] {}: {}", style, title, message);
        Ok(())
    }
}
