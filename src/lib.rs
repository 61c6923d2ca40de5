// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! LiftBuddy: track your weightlifting progress
//!
//! This crate provides the backend API for the LiftBuddy fitness
//! tracker: user accounts and profiles, dated body-measurement records
//! stored in Firestore, and the derived metrics (age, BMI, history,
//! trend deltas) the web frontend charts.

pub mod config;
pub mod db;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::FirestoreDb;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
}
