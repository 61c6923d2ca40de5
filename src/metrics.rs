// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Derived profile metrics: age from birth date, BMI from weight and height.
//!
//! All functions here are pure. A missing or non-physical input yields
//! `None`, which the frontend renders as "N/A" — never an error, never a
//! fabricated zero.

use chrono::{Datelike, Local, NaiveDate};

/// Age in completed years as of `today`.
///
/// Returns `None` if `birth_date` is not a valid `YYYY-MM-DD` date.
pub fn age_on(birth_date: &str, today: NaiveDate) -> Option<i32> {
    let birth = NaiveDate::parse_from_str(birth_date.trim(), "%Y-%m-%d").ok()?;

    let mut age = today.year() - birth.year();
    // Borrow one year if the birthday has not yet occurred this year.
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    Some(age)
}

/// Age as of the local calendar day.
///
/// Uses the server's local calendar for "today"; measurements carry their
/// own calendar dates, so this is only as precise as the deployment
/// timezone (accepted imprecision, inherited from the original product).
pub fn calculate_age(birth_date: &str) -> Option<i32> {
    age_on(birth_date, Local::now().date_naive())
}

/// Round to one decimal place, ties away from zero (`f64::round`).
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Body Mass Index: weight (kg) / height (m)², rounded to one decimal.
///
/// `None` when either input is absent or non-positive.
pub fn calculate_bmi(weight_kg: Option<f64>, height_cm: Option<f64>) -> Option<f64> {
    let weight = weight_kg?;
    let height = height_cm?;
    if weight <= 0.0 || height <= 0.0 {
        return None;
    }
    let height_m = height / 100.0;
    Some(round_to_tenth(weight / (height_m * height_m)))
}
