//! Resolution coordination: fetch, resolve, publish.

use std::sync::Arc;

use millgate_authz::{Identity, PermissionStore, ResolutionError, resolve};

use crate::source::PermissionSource;

/// Drives the permission store through identity changes.
///
/// One service instance lives for the whole session. Every identity
/// change (login, logout, role reassignment save, manual retry) goes
/// through here; the store's generation ticket makes concurrent triggers
/// safe — whichever resolution began last is the only one whose result
/// is ever published, and a resolve that loses the race is simply
/// discarded, never aborted.
///
/// Resolution uses the catalog the store was built with.
pub struct PermissionService<S> {
    store: Arc<PermissionStore>,
    source: S,
}

impl<S: PermissionSource> PermissionService<S> {
    pub fn new(store: Arc<PermissionStore>, source: S) -> Self {
        Self { store, source }
    }

    pub fn store(&self) -> &Arc<PermissionStore> {
        &self.store
    }

    /// Resolve and publish permissions for a newly established identity.
    ///
    /// Both grant fetches must settle before anything is published —
    /// partial results would risk a transient false-allow or false-deny.
    /// On fetch failure the fallback matrix is published with the error
    /// recorded; there is no automatic retry (callers may invoke
    /// [`Self::refresh`] on user request).
    pub async fn establish(&self, identity: &Identity) {
        let ticket = self.store.begin_resolution();

        // Administrators resolve without consulting the data source, so
        // an outage can never degrade an admin session.
        if identity.is_administrator() {
            let matrix = resolve(identity, &[], &[], self.store.catalog());
            self.store.publish(ticket, matrix);
            return;
        }

        let direct_fut = self.source.fetch_direct_grants(identity.user_id);
        let role_fut = async {
            match &identity.role {
                Some(role) => self.source.fetch_role_grants(role).await,
                None => Ok(Vec::new()),
            }
        };
        let (direct, role) = tokio::join!(direct_fut, role_fut);

        match (direct, role) {
            (Ok(direct), Ok(role)) => {
                let matrix = resolve(identity, &direct, &role, self.store.catalog());
                if !self.store.publish(ticket, matrix) {
                    tracing::debug!(user = %identity.user_id, "resolution lost the identity race");
                }
            }
            (Err(err), _) | (_, Err(err)) => {
                tracing::warn!(user = %identity.user_id, %err, "grant fetch failed");
                self.store
                    .publish_fallback(ticket, ResolutionError::DataSourceUnavailable(err.to_string()));
            }
        }
    }

    /// User-triggered re-resolve (the manual retry affordance).
    pub async fn refresh(&self, identity: &Identity) {
        self.establish(identity).await;
    }

    /// Logout: drop all permissions immediately.
    pub fn clear(&self) {
        self.store.clear();
    }
}
