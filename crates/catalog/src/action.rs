//! The closed action vocabulary and its synonym normalization.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use millgate_core::DomainError;

/// An operation category a permission can be granted for.
///
/// The vocabulary is closed: four base CRUD actions shared by every
/// module, plus module-specific extensions (workflow approvals and the
/// chatbot configuration toggle).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    View,
    Create,
    Edit,
    Delete,
    Approve,
    Reject,
    Confirm,
    Configure,
}

/// The four base actions every module supports unless it narrows its set.
pub const BASE_ACTIONS: [Action; 4] = [Action::View, Action::Create, Action::Edit, Action::Delete];

impl Action {
    /// Parse an action name, applying the synonym map.
    ///
    /// Callers may use either vocabulary interchangeably: `read` → view,
    /// `add` → create, `update` → edit, `remove` → delete. Matching is
    /// case-insensitive. Returns `None` for anything outside the
    /// vocabulary; unknown actions are never granted.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "view" | "read" => Some(Action::View),
            "create" | "add" => Some(Action::Create),
            "edit" | "update" => Some(Action::Edit),
            "delete" | "remove" => Some(Action::Delete),
            "approve" => Some(Action::Approve),
            "reject" => Some(Action::Reject),
            "confirm" => Some(Action::Confirm),
            "configure" => Some(Action::Configure),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Create => "create",
            Action::Edit => "edit",
            Action::Delete => "delete",
            Action::Approve => "approve",
            Action::Reject => "reject",
            Action::Confirm => "confirm",
            Action::Configure => "configure",
        }
    }

    /// Whether this is one of the four base CRUD actions.
    pub fn is_base(&self) -> bool {
        BASE_ACTIONS.contains(self)
    }
}

impl core::fmt::Display for Action {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::parse(s).ok_or_else(|| DomainError::validation(format!("unknown action '{s}'")))
    }
}
