//! Server-issued login session.
//!
//! A session is created on login with a fixed 30-day expiry and deleted on
//! logout. Expiry is evaluated against wall-clock time whenever the session
//! is presented; there is no background eviction.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{SessionId, UserId};

/// Fixed session lifetime. Login always issues `now + 30 days` exactly.
#[must_use]
pub fn session_ttl() -> Duration {
    Duration::days(30)
}

/// Authenticated session backing the session cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    user_id: UserId,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl Session {
    /// Issue a fresh session for `user_id` starting at `now`.
    #[must_use]
    pub fn issue(user_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            id: SessionId::random(),
            user_id,
            created_at: now,
            expires_at: now + session_ttl(),
        }
    }

    /// Rehydrate a session from storage.
    #[must_use]
    pub fn from_parts(
        id: SessionId,
        user_id: UserId,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            created_at,
            expires_at,
        }
    }

    /// Opaque session identifier stored in the cookie.
    #[must_use]
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Owning user.
    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Issue timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Expiry timestamp.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Whether the session has expired as of `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
