//! User profile and credential models for storage and API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppError;

/// Biological sex. Settable once on the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
    Other,
}

/// User profile stored in Firestore (`profiles/{user_id}`).
///
/// Field names are camelCase on the wire for compatibility with profiles
/// written by earlier clients. Created implicitly at signup; fields
/// populate incrementally as the user fills in their profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Opaque user id (also the document id)
    #[serde(alias = "_firestore_id", default, skip_serializing)]
    pub id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    /// Birth date (`YYYY-MM-DD`); write-once
    pub birth_date: Option<String>,
    /// Write-once
    pub sex: Option<Sex>,
    /// Height in centimeters; freely editable
    pub height: Option<f64>,
}

impl UserProfile {
    /// Fresh profile for a newly created account.
    pub fn new(id: String, email: String, display_name: Option<String>) -> UserProfile {
        UserProfile {
            id,
            email: Some(email),
            display_name,
            avatar_url: None,
            birth_date: None,
            sex: None,
            height: None,
        }
    }

    /// Merge an update into this profile.
    ///
    /// Fields absent from the update keep their stored value; a write
    /// never clobbers what it does not set. `birth_date` and `sex` are
    /// write-once: changing an already-set value is rejected (re-sending
    /// the identical value is fine).
    pub fn apply_update(&mut self, update: &ProfileUpdate) -> Result<(), AppError> {
        if let Some(display_name) = &update.display_name {
            self.display_name = Some(display_name.clone());
        }
        if let Some(avatar_url) = &update.avatar_url {
            self.avatar_url = Some(avatar_url.clone());
        }

        if let Some(birth_date) = &update.birth_date {
            if NaiveDate::parse_from_str(birth_date, "%Y-%m-%d").is_err() {
                return Err(AppError::Validation {
                    field: "birthDate".to_string(),
                    message: "must be a valid YYYY-MM-DD date".to_string(),
                });
            }
            match &self.birth_date {
                Some(existing) if existing != birth_date => {
                    return Err(AppError::Validation {
                        field: "birthDate".to_string(),
                        message: "birth date can only be set once".to_string(),
                    });
                }
                _ => self.birth_date = Some(birth_date.clone()),
            }
        }

        if let Some(sex) = update.sex {
            match self.sex {
                Some(existing) if existing != sex => {
                    return Err(AppError::Validation {
                        field: "sex".to_string(),
                        message: "sex can only be set once".to_string(),
                    });
                }
                _ => self.sex = Some(sex),
            }
        }

        if let Some(height) = update.height {
            self.height = Some(height);
        }

        Ok(())
    }
}

/// Partial profile update from `PUT /api/profile`.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[validate(length(min = 1, max = 100))]
    pub display_name: Option<String>,
    #[validate(url)]
    pub avatar_url: Option<String>,
    pub birth_date: Option<String>,
    pub sex: Option<Sex>,
    #[validate(range(min = 30.0, max = 300.0))]
    pub height: Option<f64>,
}

/// Login credential, stored separately from the profile
/// (`credentials/{urlencoded email}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub user_id: String,
    pub email: String,
    /// PBKDF2 hash, `iterations$salt$hash` with base64url parts
    pub password_hash: String,
    /// When the account was created (ISO 8601)
    pub created_at: String,
}
