//! End-to-end moderation workflows driven through the dashboard:
//! report review, bans, and category management.

use std::sync::Arc;

use chrono::Utc;
use parlor_common::{Error, ManualClock};
use parlor_moderation::{
    AdminAction, Dashboard, MemoryStore, ModerationRepositories, ModerationStore, Notice, Post,
    Report, ReportStatus, Slice, StatusCache, UserRecord,
};
use tokio::sync::mpsc;

struct Harness {
    dashboard: Dashboard,
    notices: mpsc::UnboundedReceiver<Notice>,
    repos: ModerationRepositories,
    store: Arc<MemoryStore>,
}

async fn harness() -> Harness {
    let store = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(1_700_000_000_000));
    let repos = ModerationRepositories::new(store.clone(), clock.clone());
    let cache = Arc::new(StatusCache::new(clock));
    let (dashboard, notices) = Dashboard::new(repos.clone(), cache);

    store
        .upsert_user(&UserRecord::new("author-1", None, Utc::now()))
        .await
        .unwrap();
    store
        .insert_post(&Post {
            id: "post-1".to_string(),
            author_id: "author-1".to_string(),
            category_id: "general".to_string(),
            created_at: Utc::now(),
        })
        .await
        .unwrap();

    Harness {
        dashboard,
        notices,
        repos,
        store,
    }
}

async fn file_report(h: &Harness) -> Report {
    h.repos
        .reports
        .create_report("post-1", "reporter-1", "spam".to_string(), String::new())
        .await
        .unwrap()
}

#[tokio::test]
async fn reviewed_report_leaves_pending_slice() {
    let h = harness().await;
    let report = file_report(&h).await;
    h.dashboard.load_data().await;
    assert_eq!(h.dashboard.snapshot().reports.data().unwrap().len(), 1);

    h.dashboard
        .review_report(&report.id, "admin-1", AdminAction::Dismiss, None)
        .await
        .unwrap();

    // The reports slice was reloaded and no longer lists the report
    assert!(h.dashboard.snapshot().reports.data().unwrap().is_empty());
    let saved = h.repos.reports.get_report(&report.id).await.unwrap().unwrap();
    assert_eq!(saved.status, ReportStatus::Dismissed);
    assert!(h.store.get_post("post-1").await.unwrap().is_some());
}

#[tokio::test]
async fn ban_review_also_refreshes_banned_slice() {
    let h = harness().await;
    let report = file_report(&h).await;
    h.dashboard.load_data().await;

    h.dashboard
        .review_report(&report.id, "admin-1", AdminAction::BanUser, None)
        .await
        .unwrap();

    let state = h.dashboard.snapshot();
    assert!(state.reports.data().unwrap().is_empty());
    let banned = state.banned_users.data().unwrap();
    assert_eq!(banned.len(), 1);
    assert_eq!(banned[0].id, "author-1");
    assert_eq!(banned[0].ban_reason.as_deref(), Some("Post reported: spam"));
}

#[tokio::test]
async fn partial_failure_still_reloads_reports() {
    let mut h = harness().await;
    let report = file_report(&h).await;
    h.dashboard.load_data().await;

    h.store.set_failing("delete_post", true);
    let err = h
        .dashboard
        .review_report(&report.id, "admin-1", AdminAction::DeletePost, None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::PartialFailure { .. }));

    // The report update committed, so the slice must reflect it even
    // though the overall review failed.
    assert!(h.dashboard.snapshot().reports.data().unwrap().is_empty());
    h.store.set_failing("delete_post", false);
    assert!(h.store.get_post("post-1").await.unwrap().is_some());
    assert!(matches!(h.notices.try_recv().unwrap(), Notice::Error(_)));
}

#[tokio::test]
async fn ban_and_unban_preserve_escalation_counters() {
    let h = harness().await;
    let mut user = UserRecord::new("u1", None, Utc::now());
    user.violation_count = 3;
    user.warning_count = 2;
    h.store.upsert_user(&user).await.unwrap();

    h.dashboard.ban_user("u1", "admin-1", "spam").await.unwrap();
    let banned = h.repos.users.get_user("u1").await.unwrap().unwrap();
    assert!(banned.is_banned);
    assert_eq!(banned.violation_count, 3);
    assert_eq!(banned.warning_count, 2);

    h.dashboard.unban_user("u1").await.unwrap();
    let unbanned = h.repos.users.get_user("u1").await.unwrap().unwrap();
    assert!(!unbanned.is_banned);
    assert!(unbanned.banned_at.is_none());
    assert!(unbanned.ban_reason.is_none());
    assert_eq!(unbanned.violation_count, 3);
    assert_eq!(unbanned.warning_count, 2);
}

#[tokio::test]
async fn category_id_is_derived_from_the_name() {
    let h = harness().await;

    let category = h.dashboard.create_category("Science & Tech", 1).await.unwrap();
    assert_eq!(category.id, "science_tech");
    assert_eq!(category.name, "Science & Tech");
}

#[tokio::test]
async fn duplicate_category_names_are_rejected_case_insensitively() {
    let h = harness().await;
    h.dashboard.create_category("Công nghệ", 1).await.unwrap();

    let err = h.dashboard.create_category("công nghệ ", 2).await.unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));
}

#[tokio::test]
async fn delete_category_migrates_posts_to_target() {
    let h = harness().await;
    let doomed = h.dashboard.create_category("Off Topic", 1).await.unwrap();
    let target = h.dashboard.create_category("General Talk", 2).await.unwrap();

    for i in 0..3 {
        h.store
            .insert_post(&Post {
                id: format!("migrating-{}", i),
                author_id: "author-1".to_string(),
                category_id: doomed.id.clone(),
                created_at: Utc::now(),
            })
            .await
            .unwrap();
    }

    let migrated = h.dashboard.delete_category(&doomed.id, &target.id).await.unwrap();
    assert_eq!(migrated, 3);

    for i in 0..3 {
        let post = h
            .store
            .get_post(&format!("migrating-{}", i))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(post.category_id, target.id);
    }

    let state = h.dashboard.snapshot();
    let names: Vec<_> = state
        .categories
        .data()
        .unwrap()
        .iter()
        .map(|c| c.name.clone())
        .collect();
    assert_eq!(names, vec!["General Talk".to_string()]);
}

#[tokio::test]
async fn delete_category_into_itself_is_rejected() {
    let h = harness().await;
    let category = h.dashboard.create_category("General Talk", 1).await.unwrap();

    let err = h
        .dashboard
        .delete_category(&category.id, &category.id)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    // Still present
    assert_eq!(
        h.repos.categories.list_categories().await.unwrap().len(),
        1
    );
}

#[tokio::test]
async fn mutation_notices_arrive_in_order() {
    let mut h = harness().await;
    h.dashboard.create_category("First", 1).await.unwrap();
    let _ = h.dashboard.create_category("First", 2).await;

    assert!(matches!(h.notices.try_recv().unwrap(), Notice::Success(_)));
    assert!(matches!(h.notices.try_recv().unwrap(), Notice::Error(_)));
    assert!(h.notices.try_recv().is_err());
}

#[tokio::test]
async fn slice_error_recovers_on_next_load() {
    let h = harness().await;
    h.store.set_failing("list_banned_users", true);
    h.dashboard.load_data().await;
    assert!(matches!(
        h.dashboard.snapshot().banned_users,
        Slice::Errored(_)
    ));

    h.store.set_failing("list_banned_users", false);
    h.dashboard.load_data().await;
    assert!(h.dashboard.snapshot().banned_users.is_loaded());
}
