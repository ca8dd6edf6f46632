//! Permission evaluator properties: deny-by-default, ownership rules,
//! cache freshness, and the legacy allow-list fallback.

use std::sync::Arc;

use parlor_common::ManualClock;
use parlor_moderation::{
    AdminRole, LegacyAllowList, MemoryStore, ModerationRepositories, PermissionEvaluator,
    Requester, StatusCache, STATUS_TTL_MILLIS,
};

struct Harness {
    evaluator: PermissionEvaluator,
    repos: ModerationRepositories,
    store: Arc<MemoryStore>,
    clock: ManualClock,
}

fn harness(allow_list: LegacyAllowList) -> Harness {
    let store = Arc::new(MemoryStore::new());
    let clock = ManualClock::new(1_700_000_000_000);
    let cache = Arc::new(StatusCache::new(Arc::new(clock.clone())));
    let evaluator = PermissionEvaluator::new(store.clone(), cache, allow_list);
    let repos = ModerationRepositories::new(store.clone(), Arc::new(clock.clone()));
    Harness {
        evaluator,
        repos,
        store,
        clock,
    }
}

fn default_allow_list() -> LegacyAllowList {
    LegacyAllowList::new(
        vec!["legacy-root".to_string()],
        vec!["admin@parlor.app".to_string()],
    )
}

#[tokio::test]
async fn ungranted_identities_are_denied_everything() {
    let h = harness(default_allow_list());
    let nobody = Requester::new("random-user", Some("user@example.com".to_string()));

    assert!(!h.evaluator.is_admin(Some(&nobody)).await);
    assert!(!h.evaluator.is_super_admin(Some(&nobody)).await);
    assert!(!h.evaluator.is_any_admin(Some(&nobody)).await);
    assert!(!h.evaluator.can_modify_categories(Some(&nobody)).await);
}

#[tokio::test]
async fn absent_identity_is_denied_everything() {
    let h = harness(default_allow_list());

    assert!(!h.evaluator.is_admin(None).await);
    assert!(!h.evaluator.is_super_admin(None).await);
    assert!(!h.evaluator.is_any_admin(None).await);
    assert!(!h.evaluator.can_delete_post(None, "owner").await);
    assert!(!h.evaluator.can_create_report(None, "owner"));
}

#[tokio::test]
async fn can_delete_post_iff_owner_or_admin() {
    let h = harness(default_allow_list());
    h.repos
        .admins
        .grant_admin_role("mod-1", AdminRole::Admin, "legacy-root", vec![])
        .await
        .unwrap();

    let owner = Requester::new("owner-1", None);
    let admin = Requester::new("mod-1", None);
    let stranger = Requester::new("stranger", None);

    assert!(h.evaluator.can_delete_post(Some(&owner), "owner-1").await);
    assert!(h.evaluator.can_delete_post(Some(&admin), "owner-1").await);
    assert!(!h.evaluator.can_delete_post(Some(&stranger), "owner-1").await);
}

#[tokio::test]
async fn can_create_report_only_as_self() {
    let h = harness(default_allow_list());
    let user = Requester::new("reporter-1", None);

    assert!(h.evaluator.can_create_report(Some(&user), "reporter-1"));
    assert!(!h.evaluator.can_create_report(Some(&user), "someone-else"));
}

#[tokio::test]
async fn grant_role_distinguishes_admin_from_super_admin() {
    let h = harness(LegacyAllowList::default());
    h.repos
        .admins
        .grant_admin_role("mod-1", AdminRole::Admin, "root", vec![])
        .await
        .unwrap();
    h.repos
        .admins
        .grant_admin_role("root-1", AdminRole::SuperAdmin, "root", vec![])
        .await
        .unwrap();

    let admin = Requester::new("mod-1", None);
    let super_admin = Requester::new("root-1", None);

    assert!(h.evaluator.is_admin(Some(&admin)).await);
    assert!(!h.evaluator.is_super_admin(Some(&admin)).await);

    assert!(h.evaluator.is_admin(Some(&super_admin)).await);
    assert!(h.evaluator.is_super_admin(Some(&super_admin)).await);
}

#[tokio::test]
async fn cache_suppresses_lookups_within_five_minutes() {
    let h = harness(LegacyAllowList::default());
    h.repos
        .admins
        .grant_admin_role("mod-1", AdminRole::Admin, "root", vec![])
        .await
        .unwrap();

    let admin = Requester::new("mod-1", None);

    assert!(h.evaluator.is_admin(Some(&admin)).await);
    let after_first = h.store.op_count("get_role_grant");

    // Repeated checks inside the freshness window hit only the cache
    h.clock.advance(STATUS_TTL_MILLIS - 1);
    assert!(h.evaluator.is_admin(Some(&admin)).await);
    assert!(h.evaluator.is_super_admin(Some(&admin)).await);
    assert_eq!(h.store.op_count("get_role_grant"), after_first);

    // Past the window exactly one refetch happens
    h.clock.advance(2);
    assert!(h.evaluator.is_admin(Some(&admin)).await);
    assert_eq!(h.store.op_count("get_role_grant"), after_first + 1);
    assert!(h.evaluator.is_admin(Some(&admin)).await);
    assert_eq!(h.store.op_count("get_role_grant"), after_first + 1);
}

#[tokio::test]
async fn store_failure_falls_back_to_legacy_allow_list() {
    let h = harness(default_allow_list());
    h.store.set_failing("get_role_grant", true);

    let legacy_root = Requester::new("legacy-root", None);
    let legacy_email = Requester::new("someone", Some("Admin@Parlor.app".to_string()));
    let stranger = Requester::new("stranger", Some("user@example.com".to_string()));

    assert!(h.evaluator.is_super_admin(Some(&legacy_root)).await);
    assert!(h.evaluator.is_admin(Some(&legacy_root)).await);
    assert!(h.evaluator.is_admin(Some(&legacy_email)).await);
    assert!(!h.evaluator.is_super_admin(Some(&legacy_email)).await);
    assert!(!h.evaluator.is_admin(Some(&stranger)).await);
}

#[tokio::test]
async fn fallback_results_are_not_cached() {
    let h = harness(default_allow_list());
    h.store.set_failing("get_role_grant", true);

    let legacy_root = Requester::new("legacy-root", None);
    assert!(h.evaluator.is_super_admin(Some(&legacy_root)).await);

    // Once the store recovers, a real grant is observed without waiting
    // out any freshness window
    h.store.set_failing("get_role_grant", false);
    h.repos
        .admins
        .grant_admin_role("fresh-admin", AdminRole::Admin, "legacy-root", vec![])
        .await
        .unwrap();
    let fresh = Requester::new("fresh-admin", None);
    assert!(h.evaluator.is_admin(Some(&fresh)).await);
}

#[tokio::test]
async fn legacy_identities_pass_even_when_store_is_healthy() {
    // The allow-list covers the migration window: grandfathered
    // identities have no grant document yet, and the lookup succeeds
    // with None.
    let h = harness(default_allow_list());

    let legacy_root = Requester::new("legacy-root", None);
    assert!(h.evaluator.is_super_admin(Some(&legacy_root)).await);
    assert!(h.evaluator.is_admin(Some(&legacy_root)).await);
}

#[tokio::test]
async fn cache_clear_on_logout_forces_refetch() {
    let h = harness(LegacyAllowList::default());
    h.repos
        .admins
        .grant_admin_role("mod-1", AdminRole::Admin, "root", vec![])
        .await
        .unwrap();

    let admin = Requester::new("mod-1", None);
    assert!(h.evaluator.is_admin(Some(&admin)).await);
    let lookups = h.store.op_count("get_role_grant");

    h.evaluator.cache().clear();
    assert!(h.evaluator.is_admin(Some(&admin)).await);
    assert_eq!(h.store.op_count("get_role_grant"), lookups + 1);
}
