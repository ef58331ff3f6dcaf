//! The module registry.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::{Action, Category, ModuleDescriptor, ModuleKey};

use Action::*;

const CRUD: &[Action] = &[View, Create, Edit, Delete];
const CRUD_APPROVE: &[Action] = &[View, Create, Edit, Delete, Approve];
const CRUD_APPROVE_REJECT: &[Action] = &[View, Create, Edit, Delete, Approve, Reject];
const CRUD_CONFIRM: &[Action] = &[View, Create, Edit, Delete, Confirm];

/// Registry of modules and the actions each one supports.
///
/// The standard catalog mirrors the console sidebar. Custom catalogs can
/// be built for tests or future fetched-catalog deployments; the rest of
/// the permission layer only depends on the read contract.
#[derive(Debug, Clone)]
pub struct Catalog {
    modules: Vec<ModuleDescriptor>,
    index: HashMap<ModuleKey, usize>,
}

impl Catalog {
    pub fn new(modules: Vec<ModuleDescriptor>) -> Self {
        let index = modules
            .iter()
            .enumerate()
            .map(|(i, m)| (m.key().clone(), i))
            .collect();
        Self { modules, index }
    }

    /// The compiled-in catalog used by the console.
    pub fn standard() -> &'static Catalog {
        static STANDARD: OnceLock<Catalog> = OnceLock::new();
        STANDARD.get_or_init(|| {
            Catalog::new(vec![
                // Masters
                ModuleDescriptor::new("Categories", Category::Masters, CRUD),
                ModuleDescriptor::new("Brands", Category::Masters, CRUD),
                ModuleDescriptor::new("Suppliers", Category::Masters, CRUD),
                ModuleDescriptor::new("Products", Category::Masters, CRUD),
                ModuleDescriptor::new("Roles", Category::Masters, CRUD),
                // Operations
                ModuleDescriptor::new("Production Orders", Category::Operations, CRUD_APPROVE_REJECT),
                ModuleDescriptor::new("Material Receipt", Category::Operations, CRUD_CONFIRM),
                ModuleDescriptor::new("Quality Check", Category::Operations, CRUD_APPROVE_REJECT),
                // Storage
                ModuleDescriptor::new("Inventory Management", Category::Storage, CRUD),
                ModuleDescriptor::new("Stock Transfers", Category::Storage, CRUD_APPROVE),
                ModuleDescriptor::new("Stock Adjustments", Category::Storage, CRUD_APPROVE),
                // Admin
                ModuleDescriptor::new("User Management", Category::Admin, CRUD),
                ModuleDescriptor::new("ChatBot", Category::Admin, &[View, Configure]),
                ModuleDescriptor::new("Activity Log", Category::Admin, &[View]),
            ])
        })
    }

    pub fn modules(&self) -> &[ModuleDescriptor] {
        &self.modules
    }

    pub fn get(&self, key: &ModuleKey) -> Option<&ModuleDescriptor> {
        self.index.get(key).map(|&i| &self.modules[i])
    }

    pub fn contains(&self, key: &ModuleKey) -> bool {
        self.index.contains_key(key)
    }

    pub fn category_of(&self, key: &ModuleKey) -> Option<Category> {
        self.get(key).map(ModuleDescriptor::category)
    }

    pub fn actions_of(&self, key: &ModuleKey) -> Option<&'static [Action]> {
        self.get(key).map(ModuleDescriptor::actions)
    }

    /// Whether a catalog module declares the action.
    ///
    /// `false` for unknown modules: callers that need "unknown modules
    /// are matrix-governed" semantics check `contains` first.
    pub fn supports(&self, key: &ModuleKey, action: Action) -> bool {
        self.get(key).is_some_and(|m| m.supports(action))
    }

    pub fn modules_in(&self, category: Category) -> impl Iterator<Item = &ModuleDescriptor> {
        self.modules.iter().filter(move |m| m.category() == category)
    }
}
