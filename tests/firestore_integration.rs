// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running
//! (set FIRESTORE_EMULATOR_HOST). Skipped otherwise.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use liftbuddy_api::models::measurement::parse_measurements;
use liftbuddy_api::models::{
    Credential, MeasurementHistory, MeasurementKind, MeasurementRecord, UserProfile,
};

mod common;
use common::test_db;

/// Unique user id per test run for isolation in a shared emulator.
fn unique_user_id(prefix: &str) -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{prefix}-{nanos}")
}

fn record(user_id: &str, timestamp: i64, weight: f64) -> MeasurementRecord {
    let mut measurements = BTreeMap::new();
    measurements.insert(MeasurementKind::Weight, weight);
    MeasurementRecord {
        id: None,
        user_id: user_id.to_string(),
        date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        timestamp,
        measurements,
        bmi: None,
    }
}

// ─── Profiles ────────────────────────────────────────────────

#[tokio::test]
async fn test_profile_round_trip() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_user_id("profile");

    let before = db.get_profile(&user_id).await.unwrap();
    assert!(before.is_none(), "Profile should not exist before creation");

    let mut profile = UserProfile::new(
        user_id.clone(),
        "lifter@example.com".to_string(),
        Some("Lifter".to_string()),
    );
    profile.birth_date = Some("2000-03-15".to_string());
    profile.height = Some(180.0);
    db.set_profile(&profile).await.unwrap();

    let fetched = db.get_profile(&user_id).await.unwrap().unwrap();
    assert_eq!(fetched.id, user_id);
    assert_eq!(fetched.email.as_deref(), Some("lifter@example.com"));
    assert_eq!(fetched.birth_date.as_deref(), Some("2000-03-15"));
    assert_eq!(fetched.height, Some(180.0));
}

#[tokio::test]
async fn test_profile_update_preserves_unset_fields() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_user_id("merge");

    let mut profile = UserProfile::new(user_id.clone(), "merge@example.com".to_string(), None);
    profile.height = Some(175.0);
    db.set_profile(&profile).await.unwrap();

    // Fetch-modify-write, as the profile route does
    let mut stored = db.get_profile(&user_id).await.unwrap().unwrap();
    stored.display_name = Some("Renamed".to_string());
    db.set_profile(&stored).await.unwrap();

    let fetched = db.get_profile(&user_id).await.unwrap().unwrap();
    assert_eq!(fetched.display_name.as_deref(), Some("Renamed"));
    assert_eq!(fetched.height, Some(175.0), "height must survive the update");
    assert_eq!(fetched.email.as_deref(), Some("merge@example.com"));
}

// ─── Credentials ─────────────────────────────────────────────

#[tokio::test]
async fn test_credential_lookup_is_case_insensitive() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_user_id("cred");
    let email = format!("{user_id}@Example.COM");

    let credential = Credential {
        user_id: user_id.clone(),
        email: email.to_lowercase(),
        password_hash: "100000$c2FsdA$aGFzaA".to_string(),
        created_at: chrono::Utc::now().to_rfc3339(),
    };
    db.set_credential(&credential).await.unwrap();

    let fetched = db.get_credential(&email).await.unwrap();
    assert!(fetched.is_some(), "Lookup should normalize the email case");
    assert_eq!(fetched.unwrap().user_id, user_id);

    let missing = db.get_credential("nobody@example.com").await.unwrap();
    assert!(missing.is_none());
}

// ─── Measurements ────────────────────────────────────────────

#[tokio::test]
async fn test_insert_assigns_document_id() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_user_id("insert");

    let stored = db
        .insert_measurement(&record(&user_id, 1_000, 70.5))
        .await
        .unwrap();

    assert!(stored.id.is_some(), "Store must assign a document id");
    assert_eq!(stored.user_id, user_id);
    assert_eq!(stored.value(MeasurementKind::Weight), Some(70.5));
}

#[tokio::test]
async fn test_query_returns_only_own_records_in_order() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_user_id("query");
    let other_id = unique_user_id("other");

    // Insert out of chronological order, plus a record for another user
    db.insert_measurement(&record(&user_id, 3_000, 72.0))
        .await
        .unwrap();
    db.insert_measurement(&record(&user_id, 1_000, 70.0))
        .await
        .unwrap();
    db.insert_measurement(&record(&other_id, 2_000, 99.0))
        .await
        .unwrap();
    db.insert_measurement(&record(&user_id, 2_000, 71.0))
        .await
        .unwrap();

    let snapshot = db.measurements_for_user(&user_id).await.unwrap();
    assert_eq!(snapshot.len(), 3, "Other users' records must not leak in");

    let timestamps: Vec<i64> = snapshot.iter().map(|r| r.timestamp).collect();
    assert_eq!(timestamps, vec![1_000, 2_000, 3_000]);

    // The normalized history agrees with the store's ordering
    let history = MeasurementHistory::from_snapshot(snapshot);
    assert_eq!(
        history.latest().unwrap().value(MeasurementKind::Weight),
        Some(72.0)
    );

    let latest = db.latest_measurement(&user_id).await.unwrap().unwrap();
    assert_eq!(latest.timestamp, 3_000);
}

#[tokio::test]
async fn test_full_submission_path_persists_parsed_values() {
    require_emulator!();

    let db = test_db().await;
    let user_id = unique_user_id("submit");

    let mut input = BTreeMap::new();
    input.insert("weight".to_string(), "70.5".to_string());
    input.insert("chest".to_string(), "100".to_string());
    let values = parse_measurements(&input).unwrap();

    let built = MeasurementRecord::build(
        &user_id,
        values,
        Some(180.0),
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        1_717_200_000_000,
    );
    let stored = db.insert_measurement(&built).await.unwrap();

    let fetched = db.measurements_for_user(&user_id).await.unwrap();
    assert_eq!(fetched.len(), 1);
    assert_eq!(fetched[0].id, stored.id);
    assert_eq!(fetched[0].value(MeasurementKind::Weight), Some(70.5));
    assert_eq!(fetched[0].value(MeasurementKind::Chest), Some(100.0));
    assert_eq!(fetched[0].bmi, Some(21.8));
}
