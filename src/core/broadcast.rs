//! Broadcast engine
//!
//! Turns a batch of changed paths into `reload` frames and fans each one
//! out to every live browser connection.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, error, info, warn};

use crate::config::ReloadConfig;
use crate::constants::NOTIFY_TITLE;
use crate::core::message::{ReloadMessage, ServerMessage};
use crate::core::registry::{lock_registry, Registry};
use crate::core::rewrite::apply_sass_rule;
use crate::notify::{Notifier, NotifyStyle};

pub struct Broadcaster {
    config: Arc<ReloadConfig>,
    registry: Registry,
    notifier: Arc<dyn Notifier>,
    root: Option<PathBuf>,
}

impl Broadcaster {
    /// Paths are resolved against the process working directory
    pub fn new(config: Arc<ReloadConfig>, registry: Registry, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            config,
            registry,
            notifier,
            root: None,
        }
    }

    /// Resolve paths against `root` instead of the working directory
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Tell every connected browser to reload `paths`, in order.
    ///
    /// Returns the number of frames queued across all connections. Send
    /// failures on individual connections are swallowed.
    pub fn reload_browser<S: AsRef<str>>(&self, paths: &[S]) -> usize {
        let summary = summary(paths);
        info!("{}", summary);

        if self.config.notify {
            if let Err(e) = self
                .notifier
                .notify(NOTIFY_TITLE, &summary, NotifyStyle::Success)
            {
                warn!("Desktop notification failed: {}", e);
            }
        }

        let mut delivered = 0;
        for path in paths {
            let message = ServerMessage::from(self.build_message(path.as_ref()));
            let frame = match message.to_json() {
                Ok(frame) => frame,
                Err(e) => {
                    error!("Failed to serialize reload message: {}", e);
                    continue;
                }
            };
            debug!("{}", frame);

            match lock_registry(&self.registry) {
                Ok(registry) => delivered += registry.broadcast(&frame),
                Err(e) => error!("Failed to acquire registry lock for broadcast: {}", e),
            }
        }

        delivered
    }

    /// Build the reload body for one changed path, Sass rule included
    pub fn build_message(&self, path: &str) -> ReloadMessage {
        let absolute = self.resolve(path).to_string_lossy().into_owned();

        let override_url = if self.config.override_url && self.exists(path) {
            Some(format!("/{}", path))
        } else {
            None
        };

        ReloadMessage {
            path: apply_sass_rule(absolute, self.config.apply_sass_live),
            live_css: self.config.apply_css_live,
            override_url,
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        match self.base_dir() {
            Some(base) => base.join(path),
            None => PathBuf::from(path),
        }
    }

    fn exists(&self, path: &str) -> bool {
        match &self.root {
            Some(root) => root.join(path).exists(),
            None => Path::new(path).exists(),
        }
    }

    fn base_dir(&self) -> Option<PathBuf> {
        if let Some(root) = &self.root {
            return Some(root.clone());
        }
        match env::current_dir() {
            Ok(cwd) => Some(cwd),
            Err(e) => {
                warn!("Cannot read working directory, sending path as given: {}", e);
                None
            }
        }
    }
}

fn summary<S: AsRef<str>>(paths: &[S]) -> String {
    let joined: Vec<&str> = paths.iter().map(|p| p.as_ref()).collect();
    format!("Reloading browser: {}", joined.join(" "))
}
