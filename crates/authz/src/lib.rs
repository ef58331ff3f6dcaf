//! `millgate-authz` — permission resolution and the access check surface.
//!
//! This crate is intentionally decoupled from transport and UI: raw grant
//! records come in (however the data source shipped them), a resolved
//! module×action matrix comes out, and `PermissionStore::has_permission`
//! is the single query surface everything else consumes.
//!
//! The client-side model here is a UX convenience layer. The real
//! security boundary is server-side; nothing in this crate must ever be
//! treated as an enforcement guarantee.

pub mod draft;
pub mod explain;
pub mod grant;
pub mod identity;
pub mod matrix;
pub mod resolver;
pub mod store;

pub use draft::{DraftOrigin, PermissionDraft};
pub use explain::{AccessExplanation, DecisionOrigin, explain};
pub use grant::{GrantEnvelope, GrantRecord, GrantTriple, RawGrant, normalize_grants};
pub use identity::{ADMIN_ROLE, Identity, RoleName};
pub use matrix::PermissionMatrix;
pub use resolver::resolve;
pub use store::{PermissionStore, ResolutionError, ResolutionTicket};
