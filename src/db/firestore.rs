// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Profiles (one document per user)
//! - Credentials (email/password accounts)
//! - Measurements (immutable dated records, queried per user)
//!
//! Each measurement query returns one complete snapshot; the caller
//! derives everything (ordering, windows, deltas) from that snapshot and
//! holds no listener state.

use crate::db::collections;
use crate::error::AppError;
use crate::models::{Credential, MeasurementRecord, UserProfile};

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        // Use ExternalJwtFunctionSource to provide a dummy token without needing async-trait
        // or a custom TokenSource implementation struct.
        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── Profile Operations ──────────────────────────────────────

    /// Get a user's profile.
    pub async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::PROFILES)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Write a profile document.
    ///
    /// Callers merge into a freshly read profile first (fetch-modify-write),
    /// so an update never clobbers fields it did not set.
    pub async fn set_profile(&self, profile: &UserProfile) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::PROFILES)
            .document_id(&profile.id)
            .object(profile)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Credential Operations ───────────────────────────────────

    /// Document id for a credential. Emails are lowercased and
    /// url-encoded so they are safe as Firestore document ids.
    fn credential_doc_id(email: &str) -> String {
        urlencoding::encode(&email.to_lowercase()).into_owned()
    }

    /// Look up the credential for an email address.
    pub async fn get_credential(&self, email: &str) -> Result<Option<Credential>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::CREDENTIALS)
            .obj()
            .one(Self::credential_doc_id(email))
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Store a credential.
    pub async fn set_credential(&self, credential: &Credential) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::CREDENTIALS)
            .document_id(Self::credential_doc_id(&credential.email))
            .object(credential)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Measurement Operations ──────────────────────────────────

    /// Store a new measurement record with a store-assigned document id.
    ///
    /// Records are append-only: there is no update or delete path.
    pub async fn insert_measurement(
        &self,
        record: &MeasurementRecord,
    ) -> Result<MeasurementRecord, AppError> {
        let stored: MeasurementRecord = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::MEASUREMENTS)
            .generate_document_id()
            .object(record)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::debug!(
            user_id = %record.user_id,
            timestamp = record.timestamp,
            "Measurement stored"
        );

        Ok(stored)
    }

    /// Fetch all measurement records for a user, ordered by timestamp
    /// ascending (Firestore's document order breaks ties).
    pub async fn measurements_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<MeasurementRecord>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::MEASUREMENTS)
            .filter(|q| q.for_all([q.field("userId").eq(user_id)]))
            .order_by([(
                "timestamp",
                firestore::FirestoreQueryDirection::Ascending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Fetch only the most recent measurement record for a user.
    pub async fn latest_measurement(
        &self,
        user_id: &str,
    ) -> Result<Option<MeasurementRecord>, AppError> {
        let records: Vec<MeasurementRecord> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::MEASUREMENTS)
            .filter(|q| q.for_all([q.field("userId").eq(user_id)]))
            .order_by([(
                "timestamp",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(records.into_iter().next())
    }
}
