//! `millgate-session` — identity lifecycle and resolution coordination.
//!
//! This crate owns the asynchronous seam of the permission layer: the
//! data-source contract the backend client implements, and the service
//! that drives fetch → resolve → publish whenever the session identity
//! changes. Everything else in the workspace is synchronous and pure.

pub mod in_memory;
pub mod service;
pub mod source;

pub use in_memory::InMemoryPermissionSource;
pub use service::PermissionService;
pub use source::{PermissionSource, SourceError};
