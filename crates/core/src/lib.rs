//! Domain logic for the project monitoring platform.
//!
//! Everything in this crate is pure: no I/O, no async, no database types.
//! The rules here (field-level access policy, derived-field calculation,
//! lifecycle transitions, visibility predicates) are the single source of
//! truth that the HTTP and persistence layers enforce.

pub mod calc;
pub mod currency;
pub mod error;
pub mod lifecycle;
pub mod policy;
pub mod quarterly;
pub mod roles;
pub mod types;
pub mod validation;
pub mod visibility;
