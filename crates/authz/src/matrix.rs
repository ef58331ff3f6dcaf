//! The resolved module×action matrix.

use std::collections::BTreeMap;

use serde::Serialize;

use millgate_catalog::{Action, Catalog, ModuleKey};

use crate::grant::GrantTriple;

/// Flattened, precedence-applied permission table.
///
/// The sole data structure queried at check time. Absent cells resolve to
/// `false` (default deny). The matrix is a plain value: it is built by
/// the resolver and installed wholesale into the store, never mutated in
/// place afterwards.
///
/// Module keys not present in the catalog are retained (forward
/// compatible) but only surfaced through direct lookup, never through
/// catalog-driven enumeration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PermissionMatrix {
    cells: BTreeMap<ModuleKey, BTreeMap<Action, bool>>,
}

impl PermissionMatrix {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from canonical triples; later triples for the same cell
    /// overwrite earlier ones (last-write-wins within one source).
    pub fn from_triples(triples: impl IntoIterator<Item = GrantTriple>) -> Self {
        let mut matrix = Self::empty();
        for triple in triples {
            matrix.set(triple.module, triple.action, triple.allowed);
        }
        matrix
    }

    /// The administrator matrix: every catalog module gets the base
    /// actions it declares. Module-specific extensions (approve, confirm,
    /// configure) still require explicit grants.
    pub fn admin(catalog: &Catalog) -> Self {
        let mut matrix = Self::empty();
        for module in catalog.modules() {
            for action in module.actions() {
                if action.is_base() {
                    matrix.set(module.key().clone(), *action, true);
                }
            }
        }
        matrix
    }

    /// The fail-open-minimal matrix published when the grant data source
    /// is unreachable: self-view capabilities only, everything else
    /// fail-closed.
    pub fn fallback() -> Self {
        let mut matrix = Self::empty();
        for module in ["users", "user-management", "chatbot"] {
            if let Ok(key) = ModuleKey::new(module) {
                matrix.set(key, Action::View, true);
            }
        }
        matrix
    }

    pub fn set(&mut self, module: ModuleKey, action: Action, allowed: bool) {
        self.cells.entry(module).or_default().insert(action, allowed);
    }

    /// Read one cell distinguishing "explicitly set" from "absent".
    pub fn cell(&self, module: &ModuleKey, action: Action) -> Option<bool> {
        self.cells.get(module).and_then(|row| row.get(&action)).copied()
    }

    /// Read one cell; absent cells are `false`.
    pub fn get(&self, module: &ModuleKey, action: Action) -> bool {
        self.cells
            .get(module)
            .and_then(|row| row.get(&action))
            .copied()
            .unwrap_or(false)
    }

    pub fn contains_module(&self, module: &ModuleKey) -> bool {
        self.cells.contains_key(module)
    }

    /// Install an entire module row, replacing whatever was there.
    pub fn set_row(&mut self, module: ModuleKey, row: BTreeMap<Action, bool>) {
        self.cells.insert(module, row);
    }

    pub fn row(&self, module: &ModuleKey) -> Option<&BTreeMap<Action, bool>> {
        self.cells.get(module)
    }

    /// Grant `view` unless the module already has any entry.
    ///
    /// Used for the baseline defaults every authenticated user gets; an
    /// explicit `view = false` grant is preserved.
    pub fn grant_view_if_absent(&mut self, module: ModuleKey) {
        self.cells
            .entry(module)
            .or_insert_with(|| BTreeMap::from([(Action::View, true)]));
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// All module keys present, catalog-listed or not.
    pub fn modules(&self) -> impl Iterator<Item = &ModuleKey> {
        self.cells.keys()
    }

    /// Catalog-driven enumeration: only modules the catalog lists.
    pub fn catalog_modules<'a>(&'a self, catalog: &'a Catalog) -> impl Iterator<Item = &'a ModuleKey> {
        self.cells.keys().filter(|key| catalog.contains(key))
    }
}
