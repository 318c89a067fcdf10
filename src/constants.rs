// Fundamental configuration constants
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 35729;

// Protocol identity
pub const PROTOCOL_OFFICIAL_7: &str = "http://livereload.com/protocols/official-7";
pub const SERVER_NAME: &str = "livereload-server";

// Notification defaults
pub const NOTIFY_TITLE: &str = "Reloading browser";

// Reactor configuration constants
pub const DEFAULT_WORKER_THREADS: usize = 2;
pub const REACTOR_THREAD_NAME: &str = "livereload-reactor";
