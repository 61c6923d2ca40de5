//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    /// User profiles (keyed by user id)
    pub const PROFILES: &str = "profiles";
    /// Measurement records (store-assigned ids, filtered by `userId`)
    pub const MEASUREMENTS: &str = "measurements";
    /// Login credentials (keyed by url-encoded email)
    pub const CREDENTIALS: &str = "credentials";
}
