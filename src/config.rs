//! Server configuration module
//! Immutable options supplied when the LiveReload server is started

use crate::constants::{DEFAULT_HOST, DEFAULT_PORT};
use crate::error::{LiveReloadError, Result};
use std::env;
use std::net::{SocketAddr, ToSocketAddrs};

/// LiveReload server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloadConfig {
    pub host: String,
    pub port: u16,
    /// Send a desktop notification on every reload
    pub notify: bool,
    /// Ask browsers to hot-swap stylesheets instead of reloading the page
    pub apply_css_live: bool,
    /// Translate `.sass`/`.scss` paths to the compiled `.css` path
    pub apply_sass_live: bool,
    /// Attach an `overrideURL` when the changed file exists on disk
    pub override_url: bool,
}

impl Default for ReloadConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            notify: false,
            apply_css_live: true,
            apply_sass_live: false,
            override_url: false,
        }
    }
}

impl ReloadConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    pub fn with_notify(mut self, notify: bool) -> Self {
        self.notify = notify;
        self
    }

    pub fn with_apply_css_live(mut self, apply_css_live: bool) -> Self {
        self.apply_css_live = apply_css_live;
        self
    }

    pub fn with_apply_sass_live(mut self, apply_sass_live: bool) -> Self {
        self.apply_sass_live = apply_sass_live;
        self
    }

    pub fn with_override_url(mut self, override_url: bool) -> Self {
        self.override_url = override_url;
        self
    }

    /// Resolve `host:port` into the address the listener binds to
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let target = format!("{}:{}", self.host, self.port);
        target
            .to_socket_addrs()
            .map_err(|e| {
                LiveReloadError::ConfigError(format!("Invalid address {}: {}", target, e))
            })?
            .next()
            .ok_or_else(|| {
                LiveReloadError::ConfigError(format!("Address {} did not resolve", target))
            })
    }

    /// Load configuration from environment variables if available
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let host = env::var("LIVERELOAD_HOST").unwrap_or(defaults.host);

        let port = match env::var("LIVERELOAD_PORT") {
            Ok(raw) => raw.trim().parse().map_err(|e| {
                LiveReloadError::ConfigError(format!("LIVERELOAD_PORT '{}' is invalid: {}", raw, e))
            })?,
            Err(_) => defaults.port,
        };

        Ok(Self {
            host,
            port,
            notify: env_flag("LIVERELOAD_NOTIFY", defaults.notify),
            apply_css_live: env_flag("LIVERELOAD_APPLY_CSS_LIVE", defaults.apply_css_live),
            apply_sass_live: env_flag("LIVERELOAD_APPLY_SASS_LIVE", defaults.apply_sass_live),
            override_url: env_flag("LIVERELOAD_OVERRIDE_URL", defaults.override_url),
        })
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .map(|v| parse_flag(&v))
        .unwrap_or(default)
}

fn parse_flag(value: &str) -> bool {
    let value = value.trim();
    value.eq_ignore_ascii_case("true") || value == "1"
}
