//! Raw grant records and their normalization.
//!
//! The permission endpoints ship grants in two encodings that share one
//! JSON object shape: a four-flag CRUD record (user editors) and a single
//! `action` + `isAllowed` record (role editors). Both are classified into
//! one tagged variant at this boundary; nothing downstream branches on
//! the wire encoding again.

use serde::{Deserialize, Serialize};

use millgate_catalog::{Action, ModuleKey};

/// A grant record exactly as the data source returns it.
///
/// Heterogeneous by design: `action`/`is_allowed` are set for
/// single-action records, the four `can_*` flags for CRUD records.
/// Unknown extra fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawGrant {
    pub module_name: Option<String>,
    pub action: Option<String>,
    pub is_allowed: Option<bool>,
    pub can_create: Option<bool>,
    pub can_read: Option<bool>,
    pub can_update: Option<bool>,
    pub can_delete: Option<bool>,
}

impl RawGrant {
    /// Four-flag CRUD record.
    pub fn crud(module: impl Into<String>, create: bool, read: bool, update: bool, delete: bool) -> Self {
        Self {
            module_name: Some(module.into()),
            can_create: Some(create),
            can_read: Some(read),
            can_update: Some(update),
            can_delete: Some(delete),
            ..Self::default()
        }
    }

    /// Single action + allowed record.
    pub fn single(module: impl Into<String>, action: impl Into<String>, allowed: bool) -> Self {
        Self {
            module_name: Some(module.into()),
            action: Some(action.into()),
            is_allowed: Some(allowed),
            ..Self::default()
        }
    }
}

/// Wrapper shapes a grants response arrives in.
///
/// The backend returns either a bare array, an object with a
/// `userPermissions`/`rolePermissions` list, or the .NET serializer form
/// where that list is itself wrapped as `{ "$values": [...] }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum GrantEnvelope {
    Bare(Vec<RawGrant>),
    Wrapped {
        #[serde(rename = "userPermissions", alias = "rolePermissions")]
        permissions: GrantList,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum GrantList {
    Values {
        #[serde(rename = "$values")]
        values: Vec<RawGrant>,
    },
    Plain(Vec<RawGrant>),
}

impl GrantEnvelope {
    pub fn into_grants(self) -> Vec<RawGrant> {
        match self {
            GrantEnvelope::Bare(grants) => grants,
            GrantEnvelope::Wrapped { permissions } => match permissions {
                GrantList::Values { values } => values,
                GrantList::Plain(grants) => grants,
            },
        }
    }
}

/// A grant record classified into its encoding, with the module key
/// normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrantRecord {
    CrudFlags {
        module: ModuleKey,
        create: bool,
        read: bool,
        update: bool,
        delete: bool,
    },
    Single {
        module: ModuleKey,
        action: Action,
        allowed: bool,
    },
}

impl GrantRecord {
    /// Classify a raw record.
    ///
    /// Returns `None` for malformed records: a missing or empty
    /// `moduleName`, or a single-action record naming an action outside
    /// the vocabulary. Malformed records are skipped, never fatal.
    pub fn classify(raw: &RawGrant) -> Option<Self> {
        let module = ModuleKey::new(raw.module_name.as_deref()?).ok()?;

        if let Some(action) = raw.action.as_deref() {
            let action = Action::parse(action)?;
            return Some(GrantRecord::Single {
                module,
                action,
                allowed: raw.is_allowed.unwrap_or(false),
            });
        }

        Some(GrantRecord::CrudFlags {
            module,
            create: raw.can_create.unwrap_or(false),
            read: raw.can_read.unwrap_or(false),
            update: raw.can_update.unwrap_or(false),
            delete: raw.can_delete.unwrap_or(false),
        })
    }

    /// Expand into canonical `(module, action, allowed)` triples.
    ///
    /// CRUD records expand to four triples (`canRead` maps to `view`,
    /// `canUpdate` to `edit`); single-action records to one.
    pub fn triples(&self) -> Vec<GrantTriple> {
        match self {
            GrantRecord::CrudFlags {
                module,
                create,
                read,
                update,
                delete,
            } => vec![
                GrantTriple::new(module.clone(), Action::Create, *create),
                GrantTriple::new(module.clone(), Action::View, *read),
                GrantTriple::new(module.clone(), Action::Edit, *update),
                GrantTriple::new(module.clone(), Action::Delete, *delete),
            ],
            GrantRecord::Single {
                module,
                action,
                allowed,
            } => vec![GrantTriple::new(module.clone(), *action, *allowed)],
        }
    }
}

/// Canonical grant cell: the only shape the merge algorithm sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantTriple {
    pub module: ModuleKey,
    pub action: Action,
    pub allowed: bool,
}

impl GrantTriple {
    pub fn new(module: ModuleKey, action: Action, allowed: bool) -> Self {
        Self {
            module,
            action,
            allowed,
        }
    }
}

/// Normalize a batch of raw records into triples, skipping malformed
/// entries.
pub fn normalize_grants(raws: &[RawGrant]) -> Vec<GrantTriple> {
    let mut triples = Vec::with_capacity(raws.len() * 4);
    for raw in raws {
        match GrantRecord::classify(raw) {
            Some(record) => triples.extend(record.triples()),
            None => {
                tracing::debug!(record = ?raw, "skipping malformed grant record");
            }
        }
    }
    triples
}
