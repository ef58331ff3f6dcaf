//! In-memory permission source.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use millgate_authz::{RawGrant, RoleName};
use millgate_core::UserId;

use crate::source::{PermissionSource, SourceError};

/// Seeded grant source for tests and development.
///
/// Not optimized for performance. Supports failure injection so callers
/// can exercise the fallback path.
#[derive(Debug, Default)]
pub struct InMemoryPermissionSource {
    direct: RwLock<HashMap<UserId, Vec<RawGrant>>>,
    roles: RwLock<HashMap<String, Vec<RawGrant>>>,
    unavailable: AtomicBool,
}

impl InMemoryPermissionSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_direct(&self, user_id: UserId, grants: Vec<RawGrant>) {
        if let Ok(mut direct) = self.direct.write() {
            direct.insert(user_id, grants);
        }
    }

    pub fn seed_role(&self, role: &RoleName, grants: Vec<RawGrant>) {
        if let Ok(mut roles) = self.roles.write() {
            roles.insert(role.as_str().to_string(), grants);
        }
    }

    /// Make every subsequent fetch fail, or restore service.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), SourceError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(SourceError::Unavailable("injected outage".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl PermissionSource for InMemoryPermissionSource {
    async fn fetch_direct_grants(&self, user_id: UserId) -> Result<Vec<RawGrant>, SourceError> {
        self.check_available()?;
        let direct = self
            .direct
            .read()
            .map_err(|_| SourceError::Unavailable("lock poisoned".to_string()))?;
        Ok(direct.get(&user_id).cloned().unwrap_or_default())
    }

    async fn fetch_role_grants(&self, role: &RoleName) -> Result<Vec<RawGrant>, SourceError> {
        self.check_available()?;
        let roles = self
            .roles
            .read()
            .map_err(|_| SourceError::Unavailable("lock poisoned".to_string()))?;
        Ok(roles.get(role.as_str()).cloned().unwrap_or_default())
    }
}
