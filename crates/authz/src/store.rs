//! The versioned permission store and the access check API.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use thiserror::Error;

use millgate_catalog::{Action, Catalog, ModuleKey};

use crate::matrix::PermissionMatrix;

/// Why the last resolution fell back to the minimal matrix.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("permission data source unavailable: {0}")]
    DataSourceUnavailable(String),
}

/// Handle for one resolution attempt.
///
/// Obtained from [`PermissionStore::begin_resolution`]; publishing with a
/// ticket that is no longer current is a no-op, which is how a resolve
/// that finishes after the identity has changed gets discarded
/// (last-identity-wins).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolutionTicket {
    generation: u64,
}

impl ResolutionTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug)]
struct StoreState {
    matrix: PermissionMatrix,
    generation: u64,
    resolving: bool,
    last_error: Option<ResolutionError>,
    resolved_at: Option<DateTime<Utc>>,
}

/// Single owned holder of the resolved matrix for the current session.
///
/// The matrix is replaced wholesale on every publication; readers never
/// observe a half-merged state. A monotonically increasing generation
/// counter versions each replacement.
///
/// `has_permission` never errors and never panics: malformed inputs and
/// absent cells all resolve to `false`.
#[derive(Debug)]
pub struct PermissionStore {
    catalog: Arc<Catalog>,
    state: RwLock<StoreState>,
}

impl PermissionStore {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            state: RwLock::new(StoreState {
                matrix: PermissionMatrix::empty(),
                generation: 0,
                resolving: false,
                last_error: None,
                resolved_at: None,
            }),
        }
    }

    pub fn with_standard_catalog() -> Self {
        Self::new(Arc::new(Catalog::standard().clone()))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    // A poisoned lock means a panic elsewhere while holding the guard;
    // the state itself is still a coherent matrix, so reads continue.
    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        match self.state.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        match self.state.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Start a new resolution; invalidates every earlier ticket.
    pub fn begin_resolution(&self) -> ResolutionTicket {
        let mut state = self.write();
        state.generation += 1;
        state.resolving = true;
        ResolutionTicket {
            generation: state.generation,
        }
    }

    /// Install a freshly resolved matrix.
    ///
    /// Returns `false` (and leaves the store untouched) when the ticket
    /// is stale, i.e. another resolution or a logout has begun since.
    pub fn publish(&self, ticket: ResolutionTicket, matrix: PermissionMatrix) -> bool {
        let mut state = self.write();
        if ticket.generation != state.generation {
            tracing::debug!(
                stale = ticket.generation,
                current = state.generation,
                "discarding stale permission resolution"
            );
            return false;
        }
        state.matrix = matrix;
        state.resolving = false;
        state.last_error = None;
        state.resolved_at = Some(Utc::now());
        true
    }

    /// Install the fail-open-minimal matrix and record why.
    pub fn publish_fallback(&self, ticket: ResolutionTicket, error: ResolutionError) -> bool {
        let mut state = self.write();
        if ticket.generation != state.generation {
            tracing::debug!(
                stale = ticket.generation,
                current = state.generation,
                "discarding stale fallback publication"
            );
            return false;
        }
        tracing::warn!(%error, "publishing fallback permission matrix");
        state.matrix = PermissionMatrix::fallback();
        state.resolving = false;
        state.last_error = Some(error);
        state.resolved_at = Some(Utc::now());
        true
    }

    /// Logout: drop all permissions and invalidate in-flight tickets.
    pub fn clear(&self) {
        let mut state = self.write();
        state.generation += 1;
        state.matrix = PermissionMatrix::empty();
        state.resolving = false;
        state.last_error = None;
        state.resolved_at = None;
    }

    /// The access check: `has_permission("Product Management", "read")`.
    ///
    /// Applies the same module-key and action-synonym normalization as
    /// the resolver, then the catalog's declared-set invariant, then
    /// reads the matrix. Unknown actions, empty module names, undeclared
    /// actions, and absent cells are all `false`.
    pub fn has_permission(&self, module: &str, action: &str) -> bool {
        let Ok(module) = ModuleKey::new(module) else {
            return false;
        };
        let Some(action) = Action::parse(action) else {
            return false;
        };
        self.check(&module, action)
    }

    /// Typed variant of [`Self::has_permission`].
    pub fn check(&self, module: &ModuleKey, action: Action) -> bool {
        if let Some(declared) = self.catalog.actions_of(module) {
            if !declared.contains(&action) {
                return false;
            }
        }
        self.read().matrix.get(module, action)
    }

    pub fn is_resolving(&self) -> bool {
        self.read().resolving
    }

    pub fn last_resolution_error(&self) -> Option<ResolutionError> {
        self.read().last_error.clone()
    }

    pub fn generation(&self) -> u64 {
        self.read().generation
    }

    pub fn resolved_at(&self) -> Option<DateTime<Utc>> {
        self.read().resolved_at
    }

    /// Copy of the current matrix, for diagnostics surfaces.
    pub fn snapshot(&self) -> PermissionMatrix {
        self.read().matrix.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grant::GrantTriple;

    fn key(raw: &str) -> ModuleKey {
        ModuleKey::new(raw).unwrap()
    }

    fn store_with(cells: &[(&str, Action, bool)]) -> PermissionStore {
        let store = PermissionStore::with_standard_catalog();
        let ticket = store.begin_resolution();
        let matrix = PermissionMatrix::from_triples(
            cells
                .iter()
                .map(|&(m, a, allowed)| GrantTriple::new(key(m), a, allowed)),
        );
        assert!(store.publish(ticket, matrix));
        store
    }

    #[test]
    fn default_deny_for_absent_cells() {
        let store = store_with(&[("products", Action::View, true)]);
        assert!(store.has_permission("products", "view"));
        assert!(!store.has_permission("products", "delete"));
        assert!(!store.has_permission("brands", "view"));
    }

    #[test]
    fn check_normalizes_module_and_action_spellings() {
        let store = store_with(&[("products", Action::View, true)]);
        assert!(store.has_permission("Products", "read"));
        assert!(store.has_permission("products", "view"));
        assert!(store.has_permission("products", "View"));
        assert!(store.has_permission("  PRODUCTS ", "READ"));
    }

    #[test]
    fn garbage_inputs_are_denied_not_errors() {
        let store = store_with(&[("products", Action::View, true)]);
        assert!(!store.has_permission("", "view"));
        assert!(!store.has_permission("   ", "view"));
        assert!(!store.has_permission("products", "transmogrify"));
    }

    #[test]
    fn undeclared_actions_are_denied_despite_grants() {
        // A grant snuck in for an action ChatBot does not declare.
        let store = store_with(&[("chatbot", Action::Edit, true)]);
        assert!(!store.has_permission("chatbot", "edit"));
    }

    #[test]
    fn non_catalog_modules_are_matrix_governed() {
        let store = store_with(&[("dashboard", Action::View, true)]);
        assert!(store.has_permission("dashboard", "view"));
        assert!(!store.has_permission("dashboard", "edit"));
    }

    #[test]
    fn stale_tickets_are_discarded() {
        let store = PermissionStore::with_standard_catalog();

        let first = store.begin_resolution();
        let second = store.begin_resolution();

        let stale = PermissionMatrix::from_triples([GrantTriple::new(key("products"), Action::View, true)]);
        let current = PermissionMatrix::from_triples([GrantTriple::new(key("brands"), Action::View, true)]);

        assert!(store.publish(second, current));
        assert!(!store.publish(first, stale));

        assert!(store.has_permission("brands", "view"));
        assert!(!store.has_permission("products", "view"));
    }

    #[test]
    fn resolving_flag_tracks_the_current_ticket() {
        let store = PermissionStore::with_standard_catalog();
        assert!(!store.is_resolving());

        let ticket = store.begin_resolution();
        assert!(store.is_resolving());

        store.publish(ticket, PermissionMatrix::empty());
        assert!(!store.is_resolving());
    }

    #[test]
    fn fallback_publication_records_the_error() {
        let store = PermissionStore::with_standard_catalog();
        let ticket = store.begin_resolution();

        store.publish_fallback(
            ticket,
            ResolutionError::DataSourceUnavailable("connection refused".into()),
        );

        assert!(store.has_permission("users", "view"));
        assert!(!store.has_permission("products", "delete"));
        assert!(store.last_resolution_error().is_some());
    }

    #[test]
    fn successful_publish_clears_a_previous_error() {
        let store = PermissionStore::with_standard_catalog();

        let ticket = store.begin_resolution();
        store.publish_fallback(ticket, ResolutionError::DataSourceUnavailable("timeout".into()));
        assert!(store.last_resolution_error().is_some());

        let ticket = store.begin_resolution();
        store.publish(ticket, PermissionMatrix::empty());
        assert!(store.last_resolution_error().is_none());
    }

    #[test]
    fn clear_drops_permissions_and_invalidates_tickets() {
        let store = store_with(&[("products", Action::View, true)]);
        let in_flight = store.begin_resolution();

        store.clear();
        assert!(!store.has_permission("products", "view"));

        let late = PermissionMatrix::from_triples([GrantTriple::new(key("products"), Action::View, true)]);
        assert!(!store.publish(in_flight, late));
        assert!(!store.has_permission("products", "view"));
    }

    #[test]
    fn generation_increases_monotonically() {
        let store = PermissionStore::with_standard_catalog();
        let g0 = store.generation();
        store.begin_resolution();
        let g1 = store.generation();
        store.clear();
        let g2 = store.generation();
        assert!(g0 < g1 && g1 < g2);
    }
}
