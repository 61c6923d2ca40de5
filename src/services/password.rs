// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Password hashing and account id generation.
//!
//! Hashes are PBKDF2-HMAC-SHA256 with a per-account random salt, stored
//! as `iterations$salt$hash` with base64url-encoded parts. The iteration
//! count is part of the stored string so it can be raised later without
//! invalidating existing credentials.

use std::num::NonZeroU32;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use ring::rand::{SecureRandom, SystemRandom};
use ring::{digest, pbkdf2};

const PBKDF2_ITERATIONS: u32 = 100_000;
const SALT_LEN: usize = 16;
const HASH_LEN: usize = digest::SHA256_OUTPUT_LEN;
const USER_ID_LEN: usize = 16;

/// Hash a password for storage.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let rng = SystemRandom::new();
    let mut salt = [0u8; SALT_LEN];
    rng.fill(&mut salt)
        .map_err(|_| anyhow::anyhow!("System RNG failure"))?;

    let mut hash = [0u8; HASH_LEN];
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        NonZeroU32::new(PBKDF2_ITERATIONS).expect("iteration count is non-zero"),
        &salt,
        password.as_bytes(),
        &mut hash,
    );

    Ok(format!(
        "{}${}${}",
        PBKDF2_ITERATIONS,
        URL_SAFE_NO_PAD.encode(salt),
        URL_SAFE_NO_PAD.encode(hash)
    ))
}

/// Verify a password against a stored hash string.
///
/// A malformed stored hash verifies as false rather than erroring; the
/// caller cannot do anything else with a corrupt credential anyway.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.splitn(3, '$');
    let (Some(iterations), Some(salt), Some(hash)) = (parts.next(), parts.next(), parts.next())
    else {
        return false;
    };

    let Ok(iterations) = iterations.parse::<u32>() else {
        return false;
    };
    let Some(iterations) = NonZeroU32::new(iterations) else {
        return false;
    };
    let (Ok(salt), Ok(hash)) = (URL_SAFE_NO_PAD.decode(salt), URL_SAFE_NO_PAD.decode(hash))
    else {
        return false;
    };

    pbkdf2::verify(
        pbkdf2::PBKDF2_HMAC_SHA256,
        iterations,
        &salt,
        password.as_bytes(),
        &hash,
    )
    .is_ok()
}

/// Mint an opaque user id: 128 random bits, base64url.
pub fn generate_user_id() -> anyhow::Result<String> {
    let rng = SystemRandom::new();
    let mut bytes = [0u8; USER_ID_LEN];
    rng.fill(&mut bytes)
        .map_err(|_| anyhow::anyhow!("System RNG failure"))?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}
