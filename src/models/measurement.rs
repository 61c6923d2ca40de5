// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Measurement record model for storage and API.
//!
//! A record is one dated measuring session: a subset of the known body
//! metrics with the values the user actually entered. Absent kinds mean
//! "not recorded this session", not zero. Records are immutable once
//! persisted.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::metrics::calculate_bmi;

/// The closed set of tracked body metrics.
///
/// Declaration order is display order. Wire names are camelCase
/// (`leftBicep`, ...) for compatibility with records written by earlier
/// clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum MeasurementKind {
    Weight,
    Waist,
    Neck,
    Shoulder,
    Chest,
    LeftBicep,
    RightBicep,
    LeftForearm,
    RightForearm,
    Abdomen,
    Hips,
    LeftThigh,
    RightThigh,
    LeftCalf,
    RightCalf,
}

impl MeasurementKind {
    /// All kinds, in display order.
    pub const ALL: [MeasurementKind; 15] = [
        MeasurementKind::Weight,
        MeasurementKind::Waist,
        MeasurementKind::Neck,
        MeasurementKind::Shoulder,
        MeasurementKind::Chest,
        MeasurementKind::LeftBicep,
        MeasurementKind::RightBicep,
        MeasurementKind::LeftForearm,
        MeasurementKind::RightForearm,
        MeasurementKind::Abdomen,
        MeasurementKind::Hips,
        MeasurementKind::LeftThigh,
        MeasurementKind::RightThigh,
        MeasurementKind::LeftCalf,
        MeasurementKind::RightCalf,
    ];

    /// Stored/wire name of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            MeasurementKind::Weight => "weight",
            MeasurementKind::Waist => "waist",
            MeasurementKind::Neck => "neck",
            MeasurementKind::Shoulder => "shoulder",
            MeasurementKind::Chest => "chest",
            MeasurementKind::LeftBicep => "leftBicep",
            MeasurementKind::RightBicep => "rightBicep",
            MeasurementKind::LeftForearm => "leftForearm",
            MeasurementKind::RightForearm => "rightForearm",
            MeasurementKind::Abdomen => "abdomen",
            MeasurementKind::Hips => "hips",
            MeasurementKind::LeftThigh => "leftThigh",
            MeasurementKind::RightThigh => "rightThigh",
            MeasurementKind::LeftCalf => "leftCalf",
            MeasurementKind::RightCalf => "rightCalf",
        }
    }

    /// Parse a wire name back to a kind.
    pub fn parse(name: &str) -> Option<MeasurementKind> {
        MeasurementKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
    }

    /// Human-readable label for forms and tables.
    pub fn label(&self) -> &'static str {
        match self {
            MeasurementKind::Weight => "Weight",
            MeasurementKind::Waist => "Waist",
            MeasurementKind::Neck => "Neck",
            MeasurementKind::Shoulder => "Shoulder",
            MeasurementKind::Chest => "Chest",
            MeasurementKind::LeftBicep => "Left Bicep",
            MeasurementKind::RightBicep => "Right Bicep",
            MeasurementKind::LeftForearm => "Left Forearm",
            MeasurementKind::RightForearm => "Right Forearm",
            MeasurementKind::Abdomen => "Abdomen",
            MeasurementKind::Hips => "Hips",
            MeasurementKind::LeftThigh => "Left Thigh",
            MeasurementKind::RightThigh => "Right Thigh",
            MeasurementKind::LeftCalf => "Left Calf",
            MeasurementKind::RightCalf => "Right Calf",
        }
    }

    /// Display unit. Weight is the only non-circumference metric.
    pub fn unit(&self) -> &'static str {
        match self {
            MeasurementKind::Weight => "Kg",
            _ => "cm",
        }
    }
}

impl From<MeasurementKind> for String {
    fn from(kind: MeasurementKind) -> String {
        kind.as_str().to_string()
    }
}

impl TryFrom<String> for MeasurementKind {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        MeasurementKind::parse(&value)
            .ok_or_else(|| format!("unknown measurement kind: {value}"))
    }
}

/// Stored measurement record in Firestore (`measurements` collection).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementRecord {
    /// Document id, assigned by Firestore on creation
    #[serde(alias = "_firestore_id", default, skip_serializing)]
    pub id: Option<String>,
    /// Owning user id
    pub user_id: String,
    /// Calendar day the measurement represents (`YYYY-MM-DD`)
    pub date: NaiveDate,
    /// Epoch milliseconds at creation; the canonical sort key
    pub timestamp: i64,
    /// Recorded values, keyed by kind
    pub measurements: BTreeMap<MeasurementKind, f64>,
    /// BMI cached at write time (requires weight here and height on the
    /// profile); `None` renders as "N/A"
    pub bmi: Option<f64>,
}

impl MeasurementRecord {
    /// Build a record from already-validated values.
    ///
    /// BMI is computed once here and cached on the record, so history
    /// queries never need the profile.
    pub fn build(
        user_id: &str,
        values: BTreeMap<MeasurementKind, f64>,
        profile_height_cm: Option<f64>,
        date: NaiveDate,
        timestamp: i64,
    ) -> MeasurementRecord {
        let bmi = calculate_bmi(
            values.get(&MeasurementKind::Weight).copied(),
            profile_height_cm,
        );
        MeasurementRecord {
            id: None,
            user_id: user_id.to_string(),
            date,
            timestamp,
            measurements: values,
            bmi,
        }
    }

    /// Value of one kind, if recorded in this session.
    pub fn value(&self, kind: MeasurementKind) -> Option<f64> {
        self.measurements.get(&kind).copied()
    }
}

/// Parse and validate raw form values (strings keyed by kind name).
///
/// Empty or whitespace-only values count as "not entered" and are
/// skipped. Any unparseable or negative value rejects the whole
/// submission with an error naming the field; a submission with no
/// usable values at all is rejected outright. Nothing is ever partially
/// accepted.
pub fn parse_measurements(
    input: &BTreeMap<String, String>,
) -> Result<BTreeMap<MeasurementKind, f64>, AppError> {
    let mut values = BTreeMap::new();

    for (name, raw) in input {
        let kind = MeasurementKind::parse(name).ok_or_else(|| AppError::Validation {
            field: name.clone(),
            message: "unknown measurement kind".to_string(),
        })?;

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }

        let value: f64 = trimmed.parse().map_err(|_| AppError::Validation {
            field: kind.as_str().to_string(),
            message: format!("{} must be a number", kind.label()),
        })?;

        if !value.is_finite() || value < 0.0 {
            return Err(AppError::Validation {
                field: kind.as_str().to_string(),
                message: format!("{} must be a non-negative number", kind.label()),
            });
        }

        values.insert(kind, value);
    }

    if values.is_empty() {
        return Err(AppError::BadRequest(
            "Nothing to save: enter at least one measurement".to_string(),
        ));
    }

    Ok(values)
}
