//! modelhub_daemon - HTTP server for model artifacts
//!
//! This crate provides the server that:
//! - Lists registered models and their sidecar metadata
//! - Streams model files to clients holding the shared API key
//! - Handles connections concurrently with an idle timeout

pub mod api;
pub mod auth;
pub mod server;
pub mod state;

pub use server::{run_server, serve};
pub use state::AppState;
