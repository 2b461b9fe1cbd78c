//! Summit HTTP server: routing, auth, services and background jobs.

pub mod auth;
pub mod config;
pub mod handlers;
pub mod jobs;
pub mod observability;
pub mod server;
pub mod services;
pub mod state;
pub mod worker;

pub use config::{AppConfig, JobsConfig, LoggingConfig, ServerConfig};
pub use observability::{apply_logging_level, init_tracing};
pub use server::{ServerBuilder, SummitServer, build_app};
pub use state::AppState;
