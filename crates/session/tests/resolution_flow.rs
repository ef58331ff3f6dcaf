//! End-to-end flow: login, resolve, guard, gate, outage, identity race.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Notify;

use millgate_authz::{Identity, PermissionStore, RawGrant, RoleName};
use millgate_core::UserId;
use millgate_guard::{ActionGate, AuthSnapshot, GuardOutcome, RouteGuard};
use millgate_session::{InMemoryPermissionSource, PermissionService, PermissionSource, SourceError};

fn storekeeper_source(user: UserId, role: &RoleName) -> InMemoryPermissionSource {
    let source = InMemoryPermissionSource::new();
    source.seed_role(
        role,
        vec![
            RawGrant::crud("inventory-management", true, true, true, true),
            RawGrant::crud("stock-transfers", true, true, true, false),
            RawGrant::single("stock-transfers", "approve", true),
        ],
    );
    // A direct restriction: this user may not delete inventory records.
    source.seed_direct(
        user,
        vec![RawGrant::crud("inventory-management", true, true, true, false)],
    );
    source
}

#[tokio::test]
async fn login_resolves_and_gates_the_console() {
    millgate_observability::init();

    let user = UserId::new();
    let role = RoleName::new("Storekeeper");
    let source = storekeeper_source(user, &role);

    let store = Arc::new(PermissionStore::with_standard_catalog());
    let service = PermissionService::new(Arc::clone(&store), source);
    let identity = Identity::new(user, "sam", Some(role));

    service.establish(&identity).await;

    // Route guard lets the storekeeper into inventory screens.
    let mut guard = RouteGuard::new("Inventory Management", "view");
    let outcome = guard.poll(&AuthSnapshot::authenticated(&identity), &store, "/inventory");
    assert_eq!(outcome, GuardOutcome::Allowed);

    // Role grants still apply for modules without a direct record.
    assert!(store.has_permission("stock-transfers", "approve"));

    // The direct record governs its module: delete stays off even though
    // the role would allow it.
    assert!(!store.has_permission("inventory-management", "delete"));

    // Hidden-mode gate hides the delete button; intercept-mode keeps it
    // visible but blocks the click.
    let delete = ActionGate::intercept("inventory-management", "delete");
    let activation = delete.activate(&store, || "deleted");
    assert!(activation.is_blocked());

    let edit = ActionGate::hide("inventory-management", "edit");
    assert_eq!(edit.activate(&store, || "edited").performed(), Some("edited"));
}

#[tokio::test]
async fn outage_falls_back_then_manual_retry_recovers() {
    millgate_observability::init();

    let user = UserId::new();
    let role = RoleName::new("Storekeeper");
    let source = Arc::new(storekeeper_source(user, &role));
    source.set_unavailable(true);

    let store = Arc::new(PermissionStore::with_standard_catalog());
    let service = PermissionService::new(Arc::clone(&store), Arc::clone(&source));
    let identity = Identity::new(user, "sam", Some(role));

    service.establish(&identity).await;

    // Fail open for self-view only, fail closed for everything else.
    assert!(store.has_permission("users", "view"));
    assert!(store.has_permission("user-management", "view"));
    assert!(!store.has_permission("inventory-management", "view"));
    assert!(store.last_resolution_error().is_some());

    // The user hits "retry" once the backend is back.
    source.set_unavailable(false);
    service.refresh(&identity).await;

    assert!(store.last_resolution_error().is_none());
    assert!(store.has_permission("inventory-management", "view"));
}

/// Source that holds one user's direct-grant fetch open until released,
/// so a test can interleave a second login mid-resolve.
struct GatedSource {
    inner: InMemoryPermissionSource,
    gated_user: UserId,
    entered: Notify,
    release: Notify,
}

#[async_trait]
impl PermissionSource for GatedSource {
    async fn fetch_direct_grants(&self, user_id: UserId) -> Result<Vec<RawGrant>, SourceError> {
        if user_id == self.gated_user {
            self.entered.notify_one();
            self.release.notified().await;
        }
        self.inner.fetch_direct_grants(user_id).await
    }

    async fn fetch_role_grants(&self, role: &RoleName) -> Result<Vec<RawGrant>, SourceError> {
        self.inner.fetch_role_grants(role).await
    }
}

#[tokio::test]
async fn last_identity_wins_when_logins_interleave() {
    millgate_observability::init();

    let user_a = UserId::new();
    let user_b = UserId::new();

    let inner = InMemoryPermissionSource::new();
    inner.seed_direct(user_a, vec![RawGrant::crud("products", true, true, true, true)]);
    inner.seed_direct(user_b, vec![RawGrant::crud("brands", true, true, true, true)]);

    let source = Arc::new(GatedSource {
        inner,
        gated_user: user_a,
        entered: Notify::new(),
        release: Notify::new(),
    });

    let store = Arc::new(PermissionStore::with_standard_catalog());
    let service = Arc::new(PermissionService::new(Arc::clone(&store), Arc::clone(&source)));

    let identity_a = Identity::new(user_a, "alex", None);
    let identity_b = Identity::new(user_b, "blair", None);

    // A logs in; the fetch parks inside the source.
    let racing = tokio::spawn({
        let service = Arc::clone(&service);
        async move { service.establish(&identity_a).await }
    });
    source.entered.notified().await;

    // B logs in and resolves while A's fetch is still in flight.
    service.establish(&identity_b).await;
    assert!(store.has_permission("brands", "view"));

    // A's fetch finally completes; its result must be discarded.
    source.release.notify_one();
    racing.await.expect("establish task panicked");

    assert!(store.has_permission("brands", "view"));
    assert!(!store.has_permission("products", "view"));
    assert!(!store.is_resolving());
}

#[tokio::test]
async fn logout_mid_resolve_discards_the_late_result() {
    millgate_observability::init();

    let user = UserId::new();
    let inner = InMemoryPermissionSource::new();
    inner.seed_direct(user, vec![RawGrant::crud("products", true, true, true, true)]);

    let source = Arc::new(GatedSource {
        inner,
        gated_user: user,
        entered: Notify::new(),
        release: Notify::new(),
    });

    let store = Arc::new(PermissionStore::with_standard_catalog());
    let service = Arc::new(PermissionService::new(Arc::clone(&store), Arc::clone(&source)));
    let identity = Identity::new(user, "alex", None);

    let racing = tokio::spawn({
        let service = Arc::clone(&service);
        async move { service.establish(&identity).await }
    });
    source.entered.notified().await;

    service.clear();
    source.release.notify_one();
    racing.await.expect("establish task panicked");

    assert!(!store.has_permission("products", "view"));
    assert!(store.snapshot().is_empty());
}
