//! PROMIS API server library.
//!
//! Exposes the core building blocks (config, state, error handling, routes,
//! resolution, uploads) so integration tests and the binary entrypoint can
//! both access them.

pub mod auth;
pub mod config;
pub mod error;
pub mod form;
pub mod handlers;
pub mod middleware;
pub mod resolution;
pub mod router;
pub mod routes;
pub mod state;
pub mod uploads;
