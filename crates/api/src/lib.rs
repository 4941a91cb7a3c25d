//! City events HTTP API library.
//!
//! Exposes config, state, error handling, auth, and the route tree so the
//! binary and the integration tests build the same application.

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod state;
