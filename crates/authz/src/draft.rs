//! Editing model for the permission grids in the user and role forms.
//!
//! A draft is pure form state: a module×action grid of checkboxes, which
//! role template (if any) it was seeded from, and whether it has unsaved
//! changes. It knows nothing about transport; saving means exporting the
//! grid in one of the two wire encodings and handing it to the caller.

use std::collections::BTreeMap;

use millgate_catalog::{Action, BASE_ACTIONS, Catalog, ModuleKey};

use crate::grant::{GrantRecord, RawGrant};
use crate::identity::RoleName;

/// Where the current grid contents came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftOrigin {
    /// Hand-edited grants (the console's "Custom" role).
    Custom,
    /// Seeded from a role's grant list and untouched since.
    RoleTemplate(RoleName),
}

/// In-progress edit of a grant grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionDraft {
    cells: BTreeMap<ModuleKey, BTreeMap<Action, bool>>,
    origin: DraftOrigin,
    dirty: bool,
}

impl PermissionDraft {
    pub fn empty() -> Self {
        Self {
            cells: BTreeMap::new(),
            origin: DraftOrigin::Custom,
            dirty: false,
        }
    }

    /// Load an existing user's or role's grants for editing.
    ///
    /// Malformed records are skipped, same as at resolve time.
    pub fn from_records(records: &[RawGrant]) -> Self {
        let mut draft = Self::empty();
        draft.load(records);
        draft
    }

    fn load(&mut self, records: &[RawGrant]) {
        self.cells.clear();
        for record in records {
            if let Some(classified) = GrantRecord::classify(record) {
                for triple in classified.triples() {
                    self.cells
                        .entry(triple.module)
                        .or_default()
                        .insert(triple.action, triple.allowed);
                }
            }
        }
    }

    pub fn origin(&self) -> &DraftOrigin {
        &self.origin
    }

    /// Whether the grid has changes the caller has not saved yet (the
    /// "unsaved changes" confirmation in the forms).
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    pub fn is_checked(&self, module: &ModuleKey, action: Action) -> bool {
        self.cells
            .get(module)
            .and_then(|row| row.get(&action))
            .copied()
            .unwrap_or(false)
    }

    /// Flip one checkbox. An unchecked (absent) cell becomes checked.
    ///
    /// Any manual edit turns a role-seeded draft into a custom one.
    pub fn toggle(&mut self, module: ModuleKey, action: Action) {
        let current = self.is_checked(&module, action);
        self.set(module, action, !current);
    }

    pub fn set(&mut self, module: ModuleKey, action: Action, allowed: bool) {
        self.cells.entry(module).or_default().insert(action, allowed);
        self.touch();
    }

    /// Set one action's column across every catalog module that declares
    /// it (the "select all" header button).
    pub fn set_all_for_action(&mut self, action: Action, catalog: &Catalog, allowed: bool) {
        for module in catalog.modules() {
            if module.supports(action) {
                self.cells
                    .entry(module.key().clone())
                    .or_default()
                    .insert(action, allowed);
            }
        }
        self.touch();
    }

    /// Set one module's full row (the per-row "select all" button).
    ///
    /// Uses the module's declared action set; non-catalog modules get the
    /// base four.
    pub fn set_all_for_module(&mut self, module: &ModuleKey, catalog: &Catalog, allowed: bool) {
        let actions = catalog.actions_of(module).unwrap_or(&BASE_ACTIONS);
        let row = self.cells.entry(module.clone()).or_default();
        for action in actions {
            row.insert(*action, allowed);
        }
        self.touch();
    }

    /// Replace the grid with a role's grant list.
    ///
    /// The draft stays role-derived until the next manual edit.
    pub fn apply_role_template(&mut self, role: RoleName, records: &[RawGrant]) {
        self.load(records);
        self.origin = DraftOrigin::RoleTemplate(role);
        self.dirty = true;
    }

    fn touch(&mut self) {
        self.origin = DraftOrigin::Custom;
        self.dirty = true;
    }

    /// Export in the four-flag encoding the user editor submits.
    ///
    /// One record per module with at least one base-action cell;
    /// module-specific extensions do not fit this encoding and are
    /// exported through [`Self::to_action_records`].
    pub fn to_crud_records(&self) -> Vec<RawGrant> {
        self.cells
            .iter()
            .filter(|(_, row)| row.keys().any(Action::is_base))
            .map(|(module, row)| {
                let flag = |action: Action| row.get(&action).copied().unwrap_or(false);
                RawGrant::crud(
                    module.as_str(),
                    flag(Action::Create),
                    flag(Action::View),
                    flag(Action::Edit),
                    flag(Action::Delete),
                )
            })
            .collect()
    }

    /// Export in the action+isAllowed encoding the role editor submits.
    /// Every cell becomes one record.
    pub fn to_action_records(&self) -> Vec<RawGrant> {
        self.cells
            .iter()
            .flat_map(|(module, row)| {
                row.iter()
                    .map(|(action, allowed)| RawGrant::single(module.as_str(), action.as_str(), *allowed))
            })
            .collect()
    }
}

impl Default for PermissionDraft {
    fn default() -> Self {
        Self::empty()
    }
}
