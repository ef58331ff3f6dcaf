//! `millgate-core` — foundation building blocks for the permission layer.
//!
//! This crate contains **pure domain** primitives (no I/O, no UI concerns).

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::UserId;
