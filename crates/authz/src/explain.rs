//! Decision diagnostics for the permission debugger panel.
//!
//! Explanations answer "why was this allowed/denied?" without ever
//! influencing the decision itself: `explain` reaches the same verdict as
//! `has_permission`, with its reasoning attached.

use serde::Serialize;

use millgate_catalog::{Action, ModuleKey};

use crate::store::PermissionStore;

/// Which rule produced the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionOrigin {
    /// The resolved matrix holds an explicit value for the cell.
    MatrixCell,
    /// The module name failed normalization (empty).
    InvalidModule,
    /// The action is outside the vocabulary.
    UnknownAction,
    /// The catalog module does not declare the action.
    UndeclaredAction,
    /// No cell in the matrix; default deny.
    DefaultDeny,
}

/// A full account of one access decision.
#[derive(Debug, Clone, Serialize)]
pub struct AccessExplanation {
    /// Module key as it was actually consulted (normalized), or the raw
    /// input when normalization failed.
    pub module: String,
    pub action: String,
    pub granted: bool,
    pub origin: DecisionOrigin,
    pub reason: String,
    pub suggestions: Vec<String>,
}

/// Explain the decision `has_permission(module, action)` would make.
pub fn explain(store: &PermissionStore, module: &str, action: &str) -> AccessExplanation {
    let Ok(module_key) = ModuleKey::new(module) else {
        return AccessExplanation {
            module: module.to_string(),
            action: action.to_string(),
            granted: false,
            origin: DecisionOrigin::InvalidModule,
            reason: "module name is empty after normalization".to_string(),
            suggestions: vec!["pass the module's catalog key or display label".to_string()],
        };
    };

    let Some(parsed_action) = Action::parse(action) else {
        return AccessExplanation {
            module: module_key.to_string(),
            action: action.to_string(),
            granted: false,
            origin: DecisionOrigin::UnknownAction,
            reason: format!("'{action}' is not in the action vocabulary"),
            suggestions: vec![
                "use view/create/edit/delete (or their synonyms read/add/update/remove)".to_string(),
            ],
        };
    };

    if let Some(declared) = store.catalog().actions_of(&module_key) {
        if !declared.contains(&parsed_action) {
            let supported: Vec<&str> = declared.iter().map(Action::as_str).collect();
            return AccessExplanation {
                module: module_key.to_string(),
                action: parsed_action.to_string(),
                granted: false,
                origin: DecisionOrigin::UndeclaredAction,
                reason: format!(
                    "module '{module_key}' does not declare the '{parsed_action}' action"
                ),
                suggestions: vec![format!("supported actions: {}", supported.join(", "))],
            };
        }
    }

    match store.snapshot().cell(&module_key, parsed_action) {
        Some(allowed) => AccessExplanation {
            module: module_key.to_string(),
            action: parsed_action.to_string(),
            granted: allowed,
            origin: DecisionOrigin::MatrixCell,
            reason: if allowed {
                format!("an effective grant allows '{parsed_action}' on '{module_key}'")
            } else {
                format!("an effective grant denies '{parsed_action}' on '{module_key}'")
            },
            suggestions: if allowed {
                Vec::new()
            } else {
                vec![format!(
                    "grant '{parsed_action}' on '{module_key}' directly or through the user's role"
                )]
            },
        },
        None => AccessExplanation {
            module: module_key.to_string(),
            action: parsed_action.to_string(),
            granted: false,
            origin: DecisionOrigin::DefaultDeny,
            reason: format!("no grant mentions '{parsed_action}' on '{module_key}'"),
            suggestions: vec![format!(
                "grant '{parsed_action}' on '{module_key}' directly or through the user's role"
            )],
        },
    }
}
