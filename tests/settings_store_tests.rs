//! Store-level settings coverage: the defensive-decode policy against rows
//! that bypass the codec, and upsert semantics.

use sea_orm::{ActiveModelTrait, Set};
use serde_json::json;
use vitrine::db::Store;
use vitrine::entities::settings;
use vitrine::settings::{SettingKey, SettingRow, SettingType, unflatten};

async fn store() -> Store {
    Store::with_pool_options("sqlite::memory:", 1, 1)
        .await
        .expect("in-memory store")
}

#[tokio::test]
async fn test_corrupted_json_row_does_not_fail_the_read() {
    let store = store().await;

    // Write a malformed json-typed row directly, bypassing the codec.
    let active = settings::ActiveModel {
        key: Set("social_broken".to_string()),
        value: Set("{definitely not json".to_string()),
        value_type: Set("json".to_string()),
        updated_at: Set(chrono::Utc::now().to_rfc3339()),
        ..Default::default()
    };
    active.insert(&store.conn).await.expect("raw insert");

    let rows = store.get_settings().await.expect("read must not fail");
    let nested = unflatten(&rows);

    // The corrupted field degrades to an empty object...
    assert_eq!(nested["social"]["broken"], json!({}));
    // ...while seeded siblings in the same category decode normally.
    assert_eq!(nested["social"]["show_footer_icons"], json!(true));
}

#[tokio::test]
async fn test_upsert_overwrites_by_key_and_preserves_type_changes() {
    let store = store().await;

    let rows = vec![SettingRow {
        key: SettingKey::new("general", "posts_per_page"),
        value: "25".to_string(),
        value_type: SettingType::Number,
    }];
    store.upsert_settings(&rows).await.expect("upsert");

    // Same key again with a different value and type tag.
    let rows = vec![SettingRow {
        key: SettingKey::new("general", "posts_per_page"),
        value: "lots".to_string(),
        value_type: SettingType::String,
    }];
    store.upsert_settings(&rows).await.expect("second upsert");

    let stored = store.get_settings().await.expect("read");
    let row = stored
        .iter()
        .find(|r| r.key == SettingKey::new("general", "posts_per_page"))
        .expect("row present");

    assert_eq!(row.value, "lots");
    assert_eq!(row.value_type, SettingType::String);

    // Exactly one row for the key; upsert never duplicates.
    let count = stored
        .iter()
        .filter(|r| r.key == SettingKey::new("general", "posts_per_page"))
        .count();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_seeded_defaults_group_by_category() {
    let store = store().await;

    let nested = unflatten(&store.get_settings().await.expect("read"));

    assert!(nested["general"]["site_name"].is_string());
    assert_eq!(nested["general"]["posts_per_page"], json!(10));
    assert_eq!(nested["general"]["maintenance_mode"], json!(false));

    // Stored but deliberately unenforced; they must still round-trip.
    assert_eq!(nested["security"]["max_login_attempts"], json!(5));
    assert_eq!(nested["security"]["session_timeout"], json!(480));

    assert!(nested["social"]["links"].is_object());
    assert!(nested["seo"]["keywords"].is_array());
}
