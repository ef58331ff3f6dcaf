//! Module identity and metadata.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use millgate_core::DomainError;

use crate::Action;

/// Normalized module key.
///
/// Keys are lowercased with runs of whitespace collapsed to a single
/// hyphen, so `"Production Orders"`, `"production orders"` and
/// `"production-orders"` all name the same module. Normalization happens
/// on construction and is idempotent; every layer that accepts a module
/// name goes through this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ModuleKey(String);

impl ModuleKey {
    /// Normalize a raw module name into a key.
    ///
    /// Fails only when the name is empty (or whitespace-only), which is
    /// how malformed grant records surface.
    pub fn new(raw: &str) -> Result<Self, DomainError> {
        let normalized = Self::normalize(raw);
        if normalized.is_empty() {
            return Err(DomainError::validation("module name cannot be empty"));
        }
        Ok(Self(normalized))
    }

    fn normalize(raw: &str) -> String {
        raw.split_whitespace()
            .collect::<Vec<_>>()
            .join("-")
            .to_lowercase()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ModuleKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ModuleKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl<'de> Deserialize<'de> for ModuleKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        ModuleKey::new(&raw).map_err(serde::de::Error::custom)
    }
}

/// Sidebar category a module belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Masters,
    Operations,
    Storage,
    Admin,
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Category::Masters => write!(f, "Masters"),
            Category::Operations => write!(f, "Operations"),
            Category::Storage => write!(f, "Storage"),
            Category::Admin => write!(f, "Admin"),
        }
    }
}

/// A catalog entry: one module, its display label, category, and the
/// actions it supports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleDescriptor {
    key: ModuleKey,
    label: &'static str,
    category: Category,
    actions: &'static [Action],
}

impl ModuleDescriptor {
    /// Build a descriptor from a display label.
    ///
    /// Labels come from the static catalog table and are normalized into
    /// the key directly.
    pub(crate) fn new(label: &'static str, category: Category, actions: &'static [Action]) -> Self {
        let key = ModuleKey(ModuleKey::normalize(label));
        Self {
            key,
            label,
            category,
            actions,
        }
    }

    pub fn key(&self) -> &ModuleKey {
        &self.key
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn actions(&self) -> &'static [Action] {
        self.actions
    }

    pub fn supports(&self, action: Action) -> bool {
        self.actions.contains(&action)
    }
}
