// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod history;
pub mod measurement;
pub mod profile;

pub use history::{MeasurementHistory, Metric, ProgressIndicator};
pub use measurement::{MeasurementKind, MeasurementRecord};
pub use profile::{Credential, Sex, UserProfile};
