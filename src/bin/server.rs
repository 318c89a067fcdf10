use log::{error, info, warn};
use std::io::{self, BufRead};

use livereload_server::config::ReloadConfig;
use livereload_server::core::LiveReloadServer;

fn main() {
    // Initialize env
    let dotenv_result = dotenvy::dotenv();

    // Initialize logging
    env_logger::init();

    match dotenv_result {
        Ok(path) => info!("Environment variables loaded from {}", path.display()),
        Err(e) => warn!("Failed to load .env file: {}", e),
    };

    let config = match ReloadConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    info!(
        "Configuration: host={}, port={}, notify={}, apply_css_live={}, apply_sass_live={}, override_url={}",
        config.host,
        config.port,
        config.notify,
        config.apply_css_live,
        config.apply_sass_live,
        config.override_url
    );

    let mut server = match LiveReloadServer::start(config) {
        Ok(server) => server,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    // Each stdin line is one batch of changed paths
    for line in io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!("Failed to read changed paths: {}", e);
                break;
            }
        };

        let paths: Vec<&str> = line.split_whitespace().collect();
        if !paths.is_empty() {
            server.broadcast(&paths);
        }
    }

    server.stop();
}
