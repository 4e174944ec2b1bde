use std::sync::Arc;

use diggers_common::Confidence;
use wantlist_engine::{
    db_types::{NewWantlistReference, UserHandle},
    test_utils::{new_want_item, prepare_test_env, want_fixture, ManualClock, MockCatalogSource},
    traits::{WantlistManagement, WantlistStoreError},
    EngineConfig,
    MemoryDatabase,
    TtlCache,
    WantlistApi,
};

fn wantlist_api(
    db: &MemoryDatabase,
    source: &MockCatalogSource,
    clock: &Arc<ManualClock>,
    config: EngineConfig,
) -> WantlistApi<MemoryDatabase, MockCatalogSource> {
    let cache = Arc::new(TtlCache::with_clock(clock.clone()));
    WantlistApi::new(db.clone(), source.clone(), cache, config)
}

#[tokio::test]
async fn sync_mirrors_the_remote_wantlist() {
    prepare_test_env();
    let db = MemoryDatabase::new();
    let source = MockCatalogSource::new();
    source.set_wantlist("collector_one", vec![
        want_fixture(3715, "Blue Train", &["John Coltrane"], Some(1957)),
        want_fixture(4001, "Kind Of Blue", &["Miles Davis"], Some(1959)),
    ]);
    let clock = Arc::new(ManualClock::new(10_000));
    let api = wantlist_api(&db, &source, &clock, EngineConfig::default());
    let user = UserHandle::new(1, "collector_one");

    let synced = api.sync_wantlist(&user, false).await.unwrap();

    assert_eq!(synced.len(), 2);
    assert_eq!(source.wantlist_fetches("collector_one"), 1);
    let items = api.wantlist_for_user(1).await.unwrap();
    // Most recently added first.
    assert_eq!(items[0].title, "Kind Of Blue");
    assert_eq!(items[1].title, "Blue Train");
    assert_eq!(items[1].want_id, "3715");
    assert_eq!(items[1].release_id, "3715");
    assert_eq!(items[1].artists, vec!["John Coltrane"]);
    assert_eq!(items[1].year, Some(1957));
    assert_eq!(items[1].format.as_deref(), Some("Vinyl"));
}

#[tokio::test]
async fn a_fresh_wantlist_is_not_refetched() {
    prepare_test_env();
    let db = MemoryDatabase::new();
    let source = MockCatalogSource::new();
    source.set_wantlist("collector_one", vec![want_fixture(3715, "Blue Train", &["John Coltrane"], Some(1957))]);
    let clock = Arc::new(ManualClock::new(10_000));
    let api = wantlist_api(&db, &source, &clock, EngineConfig::default());
    let user = UserHandle::new(1, "collector_one");

    api.sync_wantlist(&user, false).await.unwrap();
    // The remote gains an item, but the local mirror is still within its freshness window.
    source.set_wantlist("collector_one", vec![
        want_fixture(3715, "Blue Train", &["John Coltrane"], Some(1957)),
        want_fixture(4001, "Kind Of Blue", &["Miles Davis"], Some(1959)),
    ]);
    let items = api.sync_wantlist(&user, false).await.unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(source.wantlist_fetches("collector_one"), 1);
}

#[tokio::test]
async fn a_forced_sync_refetches_and_updates_in_place() {
    prepare_test_env();
    let db = MemoryDatabase::new();
    let source = MockCatalogSource::new();
    source.set_wantlist("collector_one", vec![want_fixture(3715, "Blue Trane", &["John Coltrane"], Some(1957))]);
    let clock = Arc::new(ManualClock::new(10_000));
    let api = wantlist_api(&db, &source, &clock, EngineConfig::default());
    let user = UserHandle::new(1, "collector_one");

    let first = api.sync_wantlist(&user, false).await.unwrap();
    let original_id = first[0].id;

    // The catalog fixes a typo in the title; a forced sync picks it up without minting a new local row.
    source.set_wantlist("collector_one", vec![want_fixture(3715, "Blue Train", &["John Coltrane"], Some(1957))]);
    let second = api.sync_wantlist(&user, true).await.unwrap();

    assert_eq!(source.wantlist_fetches("collector_one"), 2);
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].id, original_id);
    assert_eq!(second[0].title, "Blue Train");
}

#[tokio::test]
async fn the_remote_wantlist_is_memoized_between_syncs() {
    prepare_test_env();
    let db = MemoryDatabase::new();
    let source = MockCatalogSource::new();
    source.set_wantlist("collector_one", vec![want_fixture(3715, "Blue Train", &["John Coltrane"], Some(1957))]);
    let clock = Arc::new(ManualClock::new(10_000));
    // Freshness gate disabled: every sync goes to the fetch path, where the cache memoizes the remote pages.
    let config = EngineConfig { sync_freshness_secs: 0, ..EngineConfig::default() };
    let api = wantlist_api(&db, &source, &clock, config);
    let user = UserHandle::new(1, "collector_one");

    api.sync_wantlist(&user, false).await.unwrap();
    api.sync_wantlist(&user, false).await.unwrap();
    assert_eq!(source.wantlist_fetches("collector_one"), 1);

    // Past the wantlist TTL the next sync really fetches again.
    clock.advance(1_801);
    api.sync_wantlist(&user, false).await.unwrap();
    assert_eq!(source.wantlist_fetches("collector_one"), 2);
}

#[tokio::test]
async fn an_unknown_user_syncs_to_an_empty_wantlist() {
    prepare_test_env();
    let db = MemoryDatabase::new();
    let source = MockCatalogSource::new();
    let clock = Arc::new(ManualClock::new(10_000));
    let api = wantlist_api(&db, &source, &clock, EngineConfig::default());
    let user = UserHandle::new(9, "nobody");

    let items = api.sync_wantlist(&user, false).await.unwrap();
    assert!(items.is_empty());
}

#[tokio::test]
async fn stats_summarize_items_and_references() {
    prepare_test_env();
    let db = MemoryDatabase::new();
    let item_a =
        db.upsert_wantlist_item(new_want_item(1, 3715, "Blue Train", &["John Coltrane"], Some(1957))).await.unwrap();
    let item_b =
        db.upsert_wantlist_item(new_want_item(1, 4001, "Kind Of Blue", &["Miles Davis"], Some(1959))).await.unwrap();
    // Two items referencing the same listing, plus one distinct listing.
    for (item_id, listing_id) in [(item_a.id, 10), (item_b.id, 10), (item_b.id, 11)] {
        db.upsert_reference(NewWantlistReference {
            wantlist_item_id: item_id,
            listing_id,
            user_id: 1,
            confidence: Confidence::new(0.9),
        })
        .await
        .unwrap();
    }
    let source = MockCatalogSource::new();
    let clock = Arc::new(ManualClock::new(10_000));
    let api = wantlist_api(&db, &source, &clock, EngineConfig::default());

    let stats = api.stats_for_user(1).await.unwrap();
    assert_eq!(stats.wantlist_items, 2);
    assert_eq!(stats.total_references, 3);
    assert_eq!(stats.unique_listings, 2);
    assert_eq!(stats.recent_references, 3);

    let empty = api.stats_for_user(2).await.unwrap();
    assert_eq!(empty.wantlist_items, 0);
    assert_eq!(empty.total_references, 0);
}

#[tokio::test]
async fn cleanup_respects_the_retention_window() {
    prepare_test_env();
    let db = MemoryDatabase::new();
    let item =
        db.upsert_wantlist_item(new_want_item(1, 3715, "Blue Train", &["John Coltrane"], Some(1957))).await.unwrap();
    for listing_id in [10, 11] {
        db.upsert_reference(NewWantlistReference {
            wantlist_item_id: item.id,
            listing_id,
            user_id: 1,
            confidence: Confidence::new(0.8),
        })
        .await
        .unwrap();
    }
    let source = MockCatalogSource::new();
    let clock = Arc::new(ManualClock::new(10_000));
    let api = wantlist_api(&db, &source, &clock, EngineConfig::default());

    // Everything is newer than the default 30-day window.
    assert_eq!(api.cleanup_old_references(None).await.unwrap(), 0);
    assert_eq!(api.references_for_user(1).await.unwrap().len(), 2);

    // A zero-day window means "older than right now", which sweeps them all.
    assert_eq!(api.cleanup_old_references(Some(0)).await.unwrap(), 2);
    assert!(api.references_for_user(1).await.unwrap().is_empty());
}

#[tokio::test]
async fn deletes_are_owner_checked_and_cascade() {
    prepare_test_env();
    let db = MemoryDatabase::new();
    let item =
        db.upsert_wantlist_item(new_want_item(1, 3715, "Blue Train", &["John Coltrane"], Some(1957))).await.unwrap();
    let reference = db
        .upsert_reference(NewWantlistReference {
            wantlist_item_id: item.id,
            listing_id: 10,
            user_id: 1,
            confidence: Confidence::new(0.8),
        })
        .await
        .unwrap();
    let source = MockCatalogSource::new();
    let clock = Arc::new(ManualClock::new(10_000));
    let api = wantlist_api(&db, &source, &clock, EngineConfig::default());

    // Another user cannot delete item or reference.
    match api.delete_item(2, item.id).await {
        Err(wantlist_engine::WantlistApiError::Storage(WantlistStoreError::PermissionDenied(_))) => {},
        other => panic!("expected PermissionDenied, got {other:?}"),
    }
    match api.delete_reference(2, reference.id).await {
        Err(wantlist_engine::WantlistApiError::Storage(WantlistStoreError::PermissionDenied(_))) => {},
        other => panic!("expected PermissionDenied, got {other:?}"),
    }

    // The owner can, and deleting the item removes its references too.
    api.delete_reference(1, reference.id).await.unwrap();
    match api.delete_reference(1, reference.id).await {
        Err(wantlist_engine::WantlistApiError::Storage(WantlistStoreError::NotFound(_))) => {},
        other => panic!("expected NotFound, got {other:?}"),
    }
    db.upsert_reference(NewWantlistReference {
        wantlist_item_id: item.id,
        listing_id: 11,
        user_id: 1,
        confidence: Confidence::new(0.8),
    })
    .await
    .unwrap();
    api.delete_item(1, item.id).await.unwrap();
    assert!(api.wantlist_for_user(1).await.unwrap().is_empty());
    assert!(api.references_for_user(1).await.unwrap().is_empty());
}
