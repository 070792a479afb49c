//! # Blog API Server
//!
//! HTTP handlers, configuration and state for the blog posts service.
//! The binary in `main.rs` wires these together; the integration tests
//! mount the same routes on a test service.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod state;
pub mod telemetry;

pub use config::AppConfig;
pub use handlers::configure_routes;
pub use state::AppState;
