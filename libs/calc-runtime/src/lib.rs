//! Host plumbing shared by every calculator service process.
//!
//! - `config` - layered configuration loading (defaults -> YAML -> env)
//! - `logging` - `tracing` subscriber setup
//! - `signals` - shutdown signal handling wired to a `CancellationToken`
//! - `server` - HTTP server config, middleware stack and graceful serve loop

pub mod config;
pub mod logging;
pub mod server;
pub mod signals;

pub use config::{ConfigError, ENV_PREFIX, load_layered, to_yaml};
pub use logging::{LogFormat, LoggingConfig, init_logging};
pub use server::{HttpServerConfig, apply_middleware_stack, serve};
pub use signals::{ShutdownSignal, shutdown_token, wait_for_shutdown};
