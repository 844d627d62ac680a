//! Refresh-token session rows.

use sqlx::FromRow;
use speakcoach_core::types::{DbId, Timestamp};

/// A row from the `auth_sessions` table. Stores only the SHA-256 hash of
/// the refresh token, never the plaintext.
#[derive(Debug, Clone, FromRow)]
pub struct AuthSession {
    pub id: DbId,
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for creating a refresh session at login/refresh time.
#[derive(Debug)]
pub struct CreateAuthSession {
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
}
