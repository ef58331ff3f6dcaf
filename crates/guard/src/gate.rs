//! Conditional action rendering: permission-gated buttons.

use millgate_authz::PermissionStore;

/// How a gated action behaves when the check fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateMode {
    /// Hide the action entirely (the caller renders its fallback).
    Hide,
    /// Keep the action visible for discoverability, but block its
    /// activation and surface a denial notice instead of running the
    /// handler.
    Intercept,
}

/// Whether a gated action should be rendered this pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

/// What the user sees when a blocked action is activated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenialNotice {
    pub module: String,
    pub action: String,
    pub message: String,
}

/// Result of activating a gated action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation<T> {
    /// The handler ran; here is its result.
    Performed(T),
    /// The handler was not invoked.
    Blocked(DenialNotice),
}

impl<T> Activation<T> {
    pub fn performed(self) -> Option<T> {
        match self {
            Activation::Performed(value) => Some(value),
            Activation::Blocked(_) => None,
        }
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, Activation::Blocked(_))
    }
}

/// Wraps one UI action (a button, a menu item) with a permission check.
///
/// The gate holds no decision state: both `visibility` and `activate`
/// read the store when called, so a matrix replaced between two renders
/// (a role reassignment finishing, a logout) takes effect on the next
/// call. Never cache the answer across render passes.
#[derive(Debug, Clone)]
pub struct ActionGate {
    module: String,
    action: String,
    mode: GateMode,
}

impl ActionGate {
    /// Gate that hides the action when denied.
    pub fn hide(module: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            action: action.into(),
            mode: GateMode::Hide,
        }
    }

    /// Gate that keeps the action visible and blocks at activation time.
    pub fn intercept(module: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            action: action.into(),
            mode: GateMode::Intercept,
        }
    }

    pub fn mode(&self) -> GateMode {
        self.mode
    }

    /// Whether to render the action this pass.
    pub fn visibility(&self, store: &PermissionStore) -> Visibility {
        match self.mode {
            GateMode::Intercept => Visibility::Visible,
            GateMode::Hide => {
                if store.has_permission(&self.module, &self.action) {
                    Visibility::Visible
                } else {
                    Visibility::Hidden
                }
            }
        }
    }

    /// Run the handler if (and only if) the check passes right now.
    ///
    /// Both modes re-check at activation time: even a hidden-mode gate
    /// can race a matrix replacement between render and click.
    pub fn activate<T>(&self, store: &PermissionStore, handler: impl FnOnce() -> T) -> Activation<T> {
        if store.has_permission(&self.module, &self.action) {
            Activation::Performed(handler())
        } else {
            tracing::debug!(
                module = %self.module,
                action = %self.action,
                "blocked activation of unauthorized action"
            );
            Activation::Blocked(self.denial_notice())
        }
    }

    fn denial_notice(&self) -> DenialNotice {
        DenialNotice {
            module: self.module.clone(),
            action: self.action.clone(),
            message: format!(
                "You don't have permission to {} {}.",
                self.action, self.module
            ),
        }
    }
}
