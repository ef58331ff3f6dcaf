//! The permission data source contract.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use millgate_authz::{RawGrant, RoleName};
use millgate_core::UserId;

/// Grant fetch failure.
///
/// Either kind triggers the fail-open-minimal / fail-closed-rest policy;
/// the distinction only matters for diagnostics.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The endpoint could not be reached (network, 5xx, timeout).
    #[error("permission endpoint unavailable: {0}")]
    Unavailable(String),

    /// The endpoint answered with a payload that could not be decoded.
    #[error("invalid permission payload: {0}")]
    InvalidResponse(String),
}

/// Fetches raw grant records for the resolver.
///
/// Implementations wrap whatever transport the deployment uses (the
/// console talks to a REST backend). They return records exactly as
/// received; normalization and envelope unwrapping are the permission
/// layer's job, so a source may simply deserialize a response body
/// through [`millgate_authz::GrantEnvelope`] and hand the result over.
#[async_trait]
pub trait PermissionSource: Send + Sync {
    /// Grants assigned directly to the user.
    async fn fetch_direct_grants(&self, user_id: UserId) -> Result<Vec<RawGrant>, SourceError>;

    /// Grants attached to a role definition.
    async fn fetch_role_grants(&self, role: &RoleName) -> Result<Vec<RawGrant>, SourceError>;
}

#[async_trait]
impl<S> PermissionSource for Arc<S>
where
    S: PermissionSource + ?Sized,
{
    async fn fetch_direct_grants(&self, user_id: UserId) -> Result<Vec<RawGrant>, SourceError> {
        (**self).fetch_direct_grants(user_id).await
    }

    async fn fetch_role_grants(&self, role: &RoleName) -> Result<Vec<RawGrant>, SourceError> {
        (**self).fetch_role_grants(role).await
    }
}
