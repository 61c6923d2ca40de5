// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated users.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, put},
    Extension, Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::metrics::{calculate_age, calculate_bmi};
use crate::middleware::auth::AuthUser;
use crate::models::measurement::parse_measurements;
use crate::models::profile::ProfileUpdate;
use crate::models::{
    MeasurementHistory, MeasurementKind, MeasurementRecord, Metric, ProgressIndicator,
    UserProfile,
};
use crate::AppState;

const MAX_HISTORY_LIMIT: usize = 500;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me))
        .route("/api/profile", put(update_profile))
        .route(
            "/api/measurements",
            get(get_measurements).post(add_measurement),
        )
        .route("/api/progress", get(get_progress))
        .route("/api/dashboard", get(get_dashboard))
}

// ─── User Profile ────────────────────────────────────────────

/// Current user profile with derived age.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProfileResponse {
    pub id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub birth_date: Option<String>,
    #[cfg_attr(
        feature = "binding-generation",
        ts(type = "\"male\" | \"female\" | \"other\" | null")
    )]
    pub sex: Option<crate::models::Sex>,
    pub height: Option<f64>,
    /// Completed years, derived from `birth_date`; `None` when the birth
    /// date is unset or unparseable
    pub age: Option<i32>,
}

impl ProfileResponse {
    pub fn from_profile(profile: &UserProfile) -> ProfileResponse {
        ProfileResponse {
            id: profile.id.clone(),
            email: profile.email.clone(),
            display_name: profile.display_name.clone(),
            avatar_url: profile.avatar_url.clone(),
            birth_date: profile.birth_date.clone(),
            sex: profile.sex,
            height: profile.height,
            age: profile.birth_date.as_deref().and_then(calculate_age),
        }
    }
}

/// Get current user profile.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ProfileResponse>> {
    let profile = state
        .db
        .get_profile(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile for user {} not found", user.user_id)))?;

    Ok(Json(ProfileResponse::from_profile(&profile)))
}

/// Update the profile (merge semantics).
///
/// Fields absent from the body keep their stored values; `birthDate` and
/// `sex` are write-once and changing them is rejected.
async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<ProfileUpdate>,
) -> Result<Json<ProfileResponse>> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let mut profile = state
        .db
        .get_profile(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile for user {} not found", user.user_id)))?;

    profile.apply_update(&payload)?;
    state.db.set_profile(&profile).await?;

    tracing::info!(user_id = %user.user_id, "Profile updated");

    Ok(Json(ProfileResponse::from_profile(&profile)))
}

// ─── Measurements ────────────────────────────────────────────

/// Measurement submission: raw form values keyed by kind name. Values
/// are strings because they come straight from form fields.
#[derive(Deserialize)]
pub struct AddMeasurementRequest {
    pub measurements: BTreeMap<String, String>,
}

/// One measurement record as returned by the API.
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MeasurementEntry {
    pub id: Option<String>,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub date: NaiveDate,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub timestamp: i64,
    #[cfg_attr(feature = "binding-generation", ts(type = "Record<string, number>"))]
    pub measurements: BTreeMap<MeasurementKind, f64>,
    pub bmi: Option<f64>,
}

impl MeasurementEntry {
    fn from_record(record: MeasurementRecord) -> MeasurementEntry {
        MeasurementEntry {
            id: record.id,
            date: record.date,
            timestamp: record.timestamp,
            measurements: record.measurements,
            bmi: record.bmi,
        }
    }
}

/// Validate and persist a new measurement record.
async fn add_measurement(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<AddMeasurementRequest>,
) -> Result<(StatusCode, Json<MeasurementEntry>)> {
    // Validation happens before any database access; a rejected
    // submission persists nothing.
    let values = parse_measurements(&payload.measurements)?;

    let profile = state
        .db
        .get_profile(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile for user {} not found", user.user_id)))?;

    let now = chrono::Utc::now();
    let record = MeasurementRecord::build(
        &user.user_id,
        values,
        profile.height,
        chrono::Local::now().date_naive(),
        now.timestamp_millis(),
    );

    let stored = state.db.insert_measurement(&record).await?;

    tracing::info!(
        user_id = %user.user_id,
        kinds = stored.measurements.len(),
        "Measurement recorded"
    );

    Ok((StatusCode::CREATED, Json(MeasurementEntry::from_record(stored))))
}

#[derive(Deserialize)]
struct HistoryQuery {
    /// Cap the number of returned records (most recent kept)
    limit: Option<usize>,
}

/// Measurement history response, most recent first.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MeasurementHistoryResponse {
    pub records: Vec<MeasurementEntry>,
    pub total: usize,
}

/// Get the user's measurement history for tabular display.
async fn get_measurements(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<MeasurementHistoryResponse>> {
    let limit = params.limit.unwrap_or(MAX_HISTORY_LIMIT);
    if limit == 0 || limit > MAX_HISTORY_LIMIT {
        return Err(AppError::BadRequest(format!(
            "limit must be between 1 and {MAX_HISTORY_LIMIT}"
        )));
    }

    let snapshot = state.db.measurements_for_user(&user.user_id).await?;
    let history = MeasurementHistory::from_snapshot(snapshot);
    let total = history.len();

    let mut records = history.descending();
    records.truncate(limit);

    Ok(Json(MeasurementHistoryResponse {
        records: records.into_iter().map(MeasurementEntry::from_record).collect(),
        total,
    }))
}

// ─── Progress ────────────────────────────────────────────────

/// Direction of change between the two most recent records.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum TrendDirection {
    NoData,
    Increase,
    Decrease,
    Unchanged,
}

/// Latest value and trend for one metric.
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MetricIndicator {
    /// Wire key: a measurement kind name, or "bmi"
    pub metric: String,
    pub label: String,
    pub unit: String,
    /// Value in the most recent record, if present
    pub latest: Option<f64>,
    pub trend: TrendDirection,
    /// Signed change vs the previous record, 1 decimal; only present for
    /// increase/decrease
    pub delta: Option<f64>,
}

fn indicator_for(history: &MeasurementHistory, metric: Metric) -> MetricIndicator {
    let (trend, delta) = match history.progress_indicator(metric) {
        ProgressIndicator::NoData => (TrendDirection::NoData, None),
        ProgressIndicator::Increase(delta) => (TrendDirection::Increase, Some(delta)),
        ProgressIndicator::Decrease(delta) => (TrendDirection::Decrease, Some(delta)),
        ProgressIndicator::Unchanged => (TrendDirection::Unchanged, None),
    };

    MetricIndicator {
        metric: metric.key().to_string(),
        label: metric.label().to_string(),
        unit: metric.unit().to_string(),
        latest: history.latest().and_then(|record| metric.value_in(record)),
        trend,
        delta,
    }
}

/// Progress response: the full ascending series for charts, plus a
/// latest-vs-previous indicator per metric.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProgressResponse {
    /// Oldest-first records for trend charting
    pub series: Vec<MeasurementEntry>,
    pub indicators: Vec<MetricIndicator>,
    /// False with fewer than two records; a single point is not a line
    pub has_chart_data: bool,
}

/// Get chart series and progress indicators.
async fn get_progress(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ProgressResponse>> {
    let snapshot = state.db.measurements_for_user(&user.user_id).await?;
    let history = MeasurementHistory::from_snapshot(snapshot);

    let indicators = Metric::all()
        .map(|metric| indicator_for(&history, metric))
        .collect();

    Ok(Json(ProgressResponse {
        has_chart_data: history.has_chart_data(),
        indicators,
        series: history
            .ascending()
            .iter()
            .cloned()
            .map(MeasurementEntry::from_record)
            .collect(),
    }))
}

// ─── Dashboard ───────────────────────────────────────────────

/// Dashboard response: everything the landing page shows, derived from
/// the profile and one history snapshot.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct DashboardResponse {
    pub age: Option<i32>,
    /// Stored BMI of the latest record, recomputed from the latest
    /// weight and profile height when absent
    pub current_bmi: Option<f64>,
    pub latest: Option<MeasurementEntry>,
    /// Last few records, oldest first, for the compact trend chart
    pub recent: Vec<MeasurementEntry>,
}

/// Get the dashboard summary.
async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<DashboardResponse>> {
    let profile = state
        .db
        .get_profile(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile for user {} not found", user.user_id)))?;

    // One snapshot serves both the latest-values card and the trend
    // chart; no cross-query coordination is needed.
    let snapshot = state.db.measurements_for_user(&user.user_id).await?;
    let history = MeasurementHistory::from_snapshot(snapshot);

    let latest = history.latest().cloned();
    let current_bmi = latest.as_ref().and_then(|record| {
        record.bmi.or_else(|| {
            calculate_bmi(record.value(MeasurementKind::Weight), profile.height)
        })
    });

    Ok(Json(DashboardResponse {
        age: profile.birth_date.as_deref().and_then(calculate_age),
        current_bmi,
        latest: latest.map(MeasurementEntry::from_record),
        recent: history
            .recent_window(MeasurementHistory::RECENT_WINDOW)
            .iter()
            .cloned()
            .map(MeasurementEntry::from_record)
            .collect(),
    }))
}
