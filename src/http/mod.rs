//! Stage-execution HTTP API
//!
//! Endpoints:
//! - GET /api/test?stage=<stage> - resolve and run the persisted test command
//! - GET /health - health check

pub mod handlers;
pub mod responses;
pub mod server;

pub use server::start_server;
