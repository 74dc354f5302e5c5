//! Route definitions. Each module exposes a `router()` merged by the
//! top-level builder in `crate::router`.

pub mod auth;
pub mod health;
pub mod progress;
pub mod project;
pub mod user;
