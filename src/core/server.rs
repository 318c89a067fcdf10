//! LiveReload server that owns the listener, the live connection set and
//! the background runtime

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use log::{error, info};
use warp::Filter;

use crate::config::ReloadConfig;
use crate::constants::DEFAULT_WORKER_THREADS;
use crate::core::broadcast::Broadcaster;
use crate::core::reactor::Reactor;
use crate::core::registry::{create_registry, lock_registry, Registry};
use crate::error::{LiveReloadError, Result};
use crate::handlers::websocket::handle_browser;
use crate::notify::{LogNotifier, Notifier};

/// Running LiveReload server.
///
/// The accept loop runs on a runtime owned by this value; dropping it
/// stops the server.
pub struct LiveReloadServer {
    config: Arc<ReloadConfig>,
    registry: Registry,
    broadcaster: Broadcaster,
    local_addr: SocketAddr,
    reactor: Reactor,
}

impl LiveReloadServer {
    /// Bind `config.host:config.port` and start accepting browsers.
    ///
    /// Returns once the listener is bound; a bind failure is returned as
    /// [`LiveReloadError::BindError`].
    pub fn start(config: ReloadConfig) -> Result<Self> {
        Self::start_with_notifier(config, Arc::new(LogNotifier))
    }

    /// Same as [`start`](Self::start) with a custom notification sink
    pub fn start_with_notifier(config: ReloadConfig, notifier: Arc<dyn Notifier>) -> Result<Self> {
        let addr = config.socket_addr()?;
        let config = Arc::new(config);
        let registry = create_registry();
        let reactor = Reactor::new(DEFAULT_WORKER_THREADS)?;

        // Browsers may upgrade on any path (`/livereload` or `/`)
        let routes = warp::ws()
            .and(with_registry(registry.clone()))
            .map(|ws: warp::ws::Ws, registry: Registry| {
                ws.on_upgrade(move |socket| handle_browser(socket, registry))
            });

        let (local_addr, accept_loop) = {
            let _guard = reactor.enter()?;
            warp::serve(routes)
                .try_bind_ephemeral(addr)
                .map_err(|e| LiveReloadError::BindError {
                    addr: addr.to_string(),
                    reason: e.to_string(),
                })?
        };

        reactor.spawn(accept_loop)?;
        info!("LiveReload is waiting for a browser to connect.");
        info!(
            "Listening on {} with {} reactor threads",
            local_addr,
            reactor.worker_count()
        );

        let broadcaster = Broadcaster::new(config.clone(), registry.clone(), notifier);

        Ok(Self {
            config,
            registry,
            broadcaster,
            local_addr,
            reactor,
        })
    }

    /// Tear down the background runtime without draining open connections
    pub fn stop(&mut self) {
        self.reactor.shutdown();
    }

    /// Tell every connected browser to reload `paths`
    pub fn broadcast<S: AsRef<str>>(&self, paths: &[S]) -> usize {
        self.broadcaster.reload_browser(paths)
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn config(&self) -> &ReloadConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.reactor.is_running()
    }

    /// Number of browsers currently in the live set
    pub fn client_count(&self) -> usize {
        match lock_registry(&self.registry) {
            Ok(registry) => registry.client_count(),
            Err(e) => {
                error!("Failed to acquire registry lock for client count: {}", e);
                0
            }
        }
    }
}

// Helper function to include the registry in the upgrade request
fn with_registry(registry: Registry) -> impl Filter<Extract = (Registry,), Error = Infallible> + Clone {
    warp::any().map(move || registry.clone())
}
