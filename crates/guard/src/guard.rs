//! Route guard: the per-navigation permission state machine.

use millgate_authz::{Identity, PermissionStore};

/// Where unauthenticated users are sent.
pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// The guard's view of the auth session.
#[derive(Debug, Clone, Copy)]
pub struct AuthSnapshot<'a> {
    /// Identity still being restored (e.g. session rehydration).
    pub loading: bool,
    pub identity: Option<&'a Identity>,
}

impl<'a> AuthSnapshot<'a> {
    pub fn loading() -> Self {
        Self {
            loading: true,
            identity: None,
        }
    }

    pub fn authenticated(identity: &'a Identity) -> Self {
        Self {
            loading: false,
            identity: Some(identity),
        }
    }

    pub fn anonymous() -> Self {
        Self {
            loading: false,
            identity: None,
        }
    }
}

/// Resolved screen state for one navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Identity or permissions not yet resolved; show the spinner.
    Checking,
    /// Not logged in: redirect to the login entry point, carrying the
    /// originally requested path for post-login continuation.
    Unauthenticated {
        login_path: String,
        return_to: String,
    },
    /// The guard was built without a module key. A caller bug, shown as
    /// a visible configuration-error state rather than silently allowing
    /// or denying.
    Misconfigured { reason: String },
    /// Resolved and denied: a fixed access-denied screen with a go-back
    /// affordance. No redirect; this is distinct from the
    /// unauthenticated case.
    Denied { module: String },
    /// Resolved and allowed: render the protected screen.
    Allowed,
}

impl GuardOutcome {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardOutcome::Allowed)
    }

    pub fn is_settled(&self) -> bool {
        !matches!(self, GuardOutcome::Checking)
    }
}

/// Protects one screen behind a `(module, action)` check.
///
/// The guard transitions out of `Checking` exactly once per navigation:
/// the first poll where both the identity and the permission store have
/// finished loading produces the outcome, and subsequent polls return
/// that latched outcome until [`Self::reset_for_navigation`]. A matrix
/// replacement mid-screen therefore never flips an already-rendered
/// screen; the next navigation re-evaluates.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    module: Option<String>,
    action: String,
    login_path: String,
    latched: Option<GuardOutcome>,
}

impl RouteGuard {
    pub fn new(module: impl Into<String>, action: impl Into<String>) -> Self {
        Self::from_parts(Some(module.into()), action)
    }

    /// Build from route configuration where the module key may be
    /// missing. A `None` (or blank) key polls to `Misconfigured`.
    pub fn from_parts(module: Option<String>, action: impl Into<String>) -> Self {
        Self {
            module: module.filter(|m| !m.trim().is_empty()),
            action: action.into(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            latched: None,
        }
    }

    pub fn with_login_path(mut self, login_path: impl Into<String>) -> Self {
        self.login_path = login_path.into();
        self
    }

    /// Evaluate the guard for the current render.
    pub fn poll(
        &mut self,
        auth: &AuthSnapshot<'_>,
        store: &PermissionStore,
        requested_path: &str,
    ) -> GuardOutcome {
        if let Some(settled) = &self.latched {
            return settled.clone();
        }

        if auth.loading || store.is_resolving() {
            return GuardOutcome::Checking;
        }

        let outcome = self.evaluate(auth, store, requested_path);
        self.latched = Some(outcome.clone());
        outcome
    }

    fn evaluate(
        &self,
        auth: &AuthSnapshot<'_>,
        store: &PermissionStore,
        requested_path: &str,
    ) -> GuardOutcome {
        if auth.identity.is_none() {
            return GuardOutcome::Unauthenticated {
                login_path: self.login_path.clone(),
                return_to: requested_path.to_string(),
            };
        }

        let Some(module) = &self.module else {
            tracing::error!("route guard invoked without a module key");
            return GuardOutcome::Misconfigured {
                reason: "route guard requires a module key".to_string(),
            };
        };

        if store.has_permission(module, &self.action) {
            GuardOutcome::Allowed
        } else {
            GuardOutcome::Denied {
                module: module.clone(),
            }
        }
    }

    /// The latched outcome, if the guard has settled.
    pub fn outcome(&self) -> Option<&GuardOutcome> {
        self.latched.as_ref()
    }

    /// Forget the latched outcome; the next poll re-evaluates.
    pub fn reset_for_navigation(&mut self) {
        self.latched = None;
    }
}
