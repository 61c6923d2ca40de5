// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Email/password authentication routes.
//!
//! Sessions are JWTs delivered as an HttpOnly cookie plus a non-HttpOnly
//! `liftbuddy_logged_in` hint cookie the frontend can read to decide
//! whether to render the logged-in chrome. Logout issues removal cookies
//! whose attributes match the creation attributes, otherwise browsers
//! keep the originals.

use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, SESSION_COOKIE};
use crate::models::{Credential, UserProfile};
use crate::routes::api::ProfileResponse;
use crate::services::password::{generate_user_id, hash_password, verify_password};
use crate::AppState;

/// Hint cookie readable by frontend JavaScript.
pub const LOGGED_IN_COOKIE: &str = "liftbuddy_logged_in";

const SESSION_DAYS: i64 = 30;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

/// Signup request body.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    #[validate(length(min = 1, max = 100))]
    pub display_name: Option<String>,
}

/// Login request body.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Create an account: credential plus the implicit initial profile.
async fn signup(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, CookieJar, Json<ProfileResponse>)> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let email = payload.email.trim().to_lowercase();

    if state.db.get_credential(&email).await?.is_some() {
        return Err(AppError::Conflict("Email is already registered".to_string()));
    }

    let user_id = generate_user_id()?;
    let password_hash = hash_password(&payload.password)?;
    let now = chrono::Utc::now().to_rfc3339();

    let credential = Credential {
        user_id: user_id.clone(),
        email: email.clone(),
        password_hash,
        created_at: now,
    };

    // Profile is created implicitly with the account; the user fills in
    // birth date, sex and height later.
    let profile = UserProfile::new(user_id.clone(), email, payload.display_name);

    state.db.set_credential(&credential).await?;
    state.db.set_profile(&profile).await?;

    tracing::info!(user_id = %user_id, "Account created");

    let jar = add_session_cookies(jar, &state, &user_id)?;
    Ok((
        StatusCode::CREATED,
        jar,
        Json(ProfileResponse::from_profile(&profile)),
    ))
}

/// Log in with email and password.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<ProfileResponse>)> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let email = payload.email.trim().to_lowercase();

    // Unknown email and wrong password are indistinguishable to the caller.
    let credential = state
        .db
        .get_credential(&email)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !verify_password(&payload.password, &credential.password_hash) {
        return Err(AppError::Unauthorized);
    }

    // Accounts predating the profile collection may lack a profile
    // document; recreate it on first authentication.
    let profile = match state.db.get_profile(&credential.user_id).await? {
        Some(profile) => profile,
        None => {
            let profile = UserProfile::new(
                credential.user_id.clone(),
                credential.email.clone(),
                None,
            );
            state.db.set_profile(&profile).await?;
            profile
        }
    };

    tracing::info!(user_id = %credential.user_id, "Login successful");

    let jar = add_session_cookies(jar, &state, &credential.user_id)?;
    Ok((jar, Json(ProfileResponse::from_profile(&profile))))
}

/// Log out: remove both session cookies.
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (CookieJar, StatusCode) {
    let secure = use_secure_cookies(&state.config.frontend_url);
    let jar = jar
        .add(removal_cookie(SESSION_COOKIE, true, secure))
        .add(removal_cookie(LOGGED_IN_COOKIE, false, secure));
    (jar, StatusCode::NO_CONTENT)
}

/// Secure cookies whenever the frontend is served over HTTPS.
fn use_secure_cookies(frontend_url: &str) -> bool {
    frontend_url.starts_with("https://")
}

fn add_session_cookies(
    jar: CookieJar,
    state: &Arc<AppState>,
    user_id: &str,
) -> Result<CookieJar> {
    let jwt = create_jwt(user_id, &state.config.jwt_signing_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;
    let secure = use_secure_cookies(&state.config.frontend_url);

    Ok(jar
        .add(session_cookie(SESSION_COOKIE, jwt, true, secure))
        .add(session_cookie(LOGGED_IN_COOKIE, "1".to_string(), false, secure)))
}

fn session_cookie(name: &'static str, value: String, http_only: bool, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(http_only)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::days(SESSION_DAYS))
        .build()
}

/// Removal cookie: identical attributes, empty value, Max-Age=0.
fn removal_cookie(name: &'static str, http_only: bool, secure: bool) -> Cookie<'static> {
    Cookie::build((name, ""))
        .path("/")
        .http_only(http_only)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::ZERO)
        .build()
}
