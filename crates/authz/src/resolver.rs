//! The merge algorithm: raw grants in, resolved matrix out.

use millgate_catalog::{Catalog, ModuleKey};

use crate::grant::{RawGrant, normalize_grants};
use crate::identity::Identity;
use crate::matrix::PermissionMatrix;

/// Modules every authenticated user can at least view.
const BASELINE_VIEW_MODULES: &[&str] = &["user-management", "chatbot", "dashboard"];

/// Resolve raw grant records into the permission matrix for `identity`.
///
/// Precedence is applied at merge time, once; `has_permission` is a plain
/// read afterwards.
///
/// 1. Administrators get every catalog module's declared base actions and
///    the grant lists are ignored entirely.
/// 2. Each list is normalized to canonical triples (malformed records
///    skipped); within one list, later triples for the same cell win.
/// 3. Direct grants take priority with module-level authority: a module
///    named anywhere in the direct list is governed solely by the direct
///    triples — actions they leave unset stay denied, the role's grants
///    for that module are not consulted. Modules with no direct record
///    fall back to the role matrix.
/// 4. Baseline defaults: `view` on user-management, chatbot, and
///    dashboard unless the merged matrix already says anything about the
///    module.
pub fn resolve(
    identity: &Identity,
    direct_grants: &[RawGrant],
    role_grants: &[RawGrant],
    catalog: &Catalog,
) -> PermissionMatrix {
    if identity.is_administrator() {
        tracing::debug!(user = %identity.user_id, "administrator override, granting catalog base actions");
        return PermissionMatrix::admin(catalog);
    }

    let direct = PermissionMatrix::from_triples(normalize_grants(direct_grants));
    let role = PermissionMatrix::from_triples(normalize_grants(role_grants));

    let mut merged = PermissionMatrix::empty();
    for module in role.modules() {
        if !direct.contains_module(module) {
            if let Some(row) = role.row(module) {
                merged.set_row(module.clone(), row.clone());
            }
        }
    }
    for module in direct.modules() {
        if let Some(row) = direct.row(module) {
            merged.set_row(module.clone(), row.clone());
        }
    }

    for module in BASELINE_VIEW_MODULES {
        if let Ok(key) = ModuleKey::new(module) {
            merged.grant_view_if_absent(key);
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use millgate_catalog::Action;
    use millgate_core::UserId;

    use crate::identity::{ADMIN_ROLE, RoleName};

    fn key(raw: &str) -> ModuleKey {
        ModuleKey::new(raw).unwrap()
    }

    fn user(role: Option<&'static str>) -> Identity {
        Identity::new(UserId::new(), "test-user", role.map(RoleName::new))
    }

    fn full_role_grant(module: &str) -> RawGrant {
        RawGrant::crud(module, true, true, true, true)
    }

    #[test]
    fn admin_override_ignores_grant_records() {
        let identity = user(Some(ADMIN_ROLE));
        // Grants that would deny everything, were they consulted.
        let direct = [RawGrant::crud("products", false, false, false, false)];

        let matrix = resolve(&identity, &direct, &[], Catalog::standard());

        for module in Catalog::standard().modules() {
            for action in module.actions().iter().filter(|a| a.is_base()) {
                assert!(
                    matrix.get(module.key(), *action),
                    "admin must hold {}.{action}",
                    module.key()
                );
            }
        }
    }

    #[test]
    fn role_grants_apply_when_no_direct_record_exists() {
        let identity = user(Some("Storekeeper"));
        let role = [full_role_grant("inventory-management")];

        let matrix = resolve(&identity, &[], &role, Catalog::standard());

        assert!(matrix.get(&key("inventory-management"), Action::View));
        assert!(matrix.get(&key("inventory-management"), Action::Delete));
    }

    #[test]
    fn direct_module_authority_beats_role_grants_per_cell() {
        let identity = user(Some("Storekeeper"));
        let role = [full_role_grant("products")];
        let direct = [RawGrant::single("products", "delete", false)];

        let matrix = resolve(&identity, &direct, &role, Catalog::standard());

        assert!(!matrix.get(&key("products"), Action::Delete));
    }

    #[test]
    fn direct_module_authority_covers_unset_actions_as_denials() {
        // The documented open-question policy: a direct record for a
        // module is the complete statement of rights over it. Actions the
        // direct grants leave unset stay denied even when the role grants
        // them.
        let identity = user(Some("Storekeeper"));
        let role = [full_role_grant("products")];
        let direct = [RawGrant::single("products", "delete", false)];

        let matrix = resolve(&identity, &direct, &role, Catalog::standard());

        assert!(!matrix.get(&key("products"), Action::View));
        assert!(!matrix.get(&key("products"), Action::Create));
        assert!(!matrix.get(&key("products"), Action::Edit));
    }

    #[test]
    fn modules_without_direct_records_still_follow_the_role() {
        let identity = user(Some("Storekeeper"));
        let role = [full_role_grant("products"), full_role_grant("brands")];
        let direct = [RawGrant::single("products", "delete", false)];

        let matrix = resolve(&identity, &direct, &role, Catalog::standard());

        assert!(matrix.get(&key("brands"), Action::View));
        assert!(matrix.get(&key("brands"), Action::Delete));
    }

    #[test]
    fn last_write_wins_within_a_single_source() {
        let identity = user(None);
        let direct = [
            RawGrant::single("products", "edit", true),
            RawGrant::single("products", "edit", false),
        ];

        let matrix = resolve(&identity, &direct, &[], Catalog::standard());

        assert!(!matrix.get(&key("products"), Action::Edit));
    }

    #[test]
    fn malformed_records_do_not_poison_the_batch() {
        let identity = user(None);
        let direct = [
            RawGrant {
                can_read: Some(true),
                ..RawGrant::default()
            },
            RawGrant::crud("suppliers", false, true, false, false),
        ];

        let matrix = resolve(&identity, &direct, &[], Catalog::standard());

        assert!(matrix.get(&key("suppliers"), Action::View));
    }

    #[test]
    fn baseline_defaults_grant_view_for_authenticated_users() {
        let identity = user(None);
        let matrix = resolve(&identity, &[], &[], Catalog::standard());

        assert!(matrix.get(&key("user-management"), Action::View));
        assert!(matrix.get(&key("chatbot"), Action::View));
        assert!(matrix.get(&key("dashboard"), Action::View));
        assert!(!matrix.get(&key("user-management"), Action::Edit));
    }

    #[test]
    fn baseline_defaults_do_not_override_explicit_grants() {
        let identity = user(None);
        let direct = [RawGrant::single("chatbot", "view", false)];

        let matrix = resolve(&identity, &direct, &[], Catalog::standard());

        assert!(!matrix.get(&key("chatbot"), Action::View));
    }

    #[test]
    fn non_catalog_modules_are_retained() {
        let identity = user(None);
        let direct = [RawGrant::crud("reporting", false, true, false, false)];

        let matrix = resolve(&identity, &direct, &[], Catalog::standard());

        assert!(matrix.get(&key("reporting"), Action::View));
        assert!(!matrix.catalog_modules(Catalog::standard()).any(|m| m == &key("reporting")));
    }

    #[test]
    fn module_specific_actions_resolve_from_role_grants() {
        let identity = user(Some("Supervisor"));
        let role = [
            RawGrant::single("production-orders", "approve", true),
            RawGrant::single("production-orders", "reject", true),
        ];

        let matrix = resolve(&identity, &[], &role, Catalog::standard());

        assert!(matrix.get(&key("production-orders"), Action::Approve));
        assert!(matrix.get(&key("production-orders"), Action::Reject));
        assert!(!matrix.get(&key("production-orders"), Action::View));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: for non-administrators, a module named in the
            /// direct list never reads from the role matrix.
            #[test]
            fn direct_module_rows_are_direct_only(
                create: bool, read: bool, update: bool, delete: bool,
            ) {
                let identity = user(Some("Storekeeper"));
                let role = [full_role_grant("products")];
                let direct = [RawGrant::crud("products", create, read, update, delete)];

                let matrix = resolve(&identity, &direct, &role, Catalog::standard());

                prop_assert_eq!(matrix.get(&key("products"), Action::Create), create);
                prop_assert_eq!(matrix.get(&key("products"), Action::View), read);
                prop_assert_eq!(matrix.get(&key("products"), Action::Edit), update);
                prop_assert_eq!(matrix.get(&key("products"), Action::Delete), delete);
            }

            /// Property: resolving is deterministic.
            #[test]
            fn resolve_is_deterministic(seed in proptest::collection::vec(any::<(bool, bool)>(), 0..8)) {
                let identity = user(Some("Storekeeper"));
                let direct: Vec<RawGrant> = seed
                    .iter()
                    .map(|(a, b)| RawGrant::crud("products", *a, *b, *a, *b))
                    .collect();
                let role = [full_role_grant("brands")];

                let first = resolve(&identity, &direct, &role, Catalog::standard());
                let second = resolve(&identity, &direct, &role, Catalog::standard());
                prop_assert_eq!(first, second);
            }
        }
    }
}
