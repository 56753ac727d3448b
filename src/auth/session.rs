use serde::{Deserialize, Serialize};

use super::Role;

/// Absolute session lifetime.
pub const SESSION_MAX_AGE_SECS: i64 = 8 * 60 * 60;

/// Age past which verification transparently re-issues the record with a
/// fresh expiry window.
pub const SESSION_REFRESH_AFTER_SECS: i64 = 2 * 60 * 60;

/// The authenticated identity produced by a successful credential check.
/// Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub image: Option<String>,
}

/// What actually lives in the session store between requests.
///
/// The role claim is fixed at issuance and is NOT re-read from the database
/// on later requests; a role change takes effect at the next login. This is
/// a deliberate staleness window, not a bug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub principal: Principal,
    /// Unix seconds.
    pub issued_at: i64,
    /// Unix seconds, `issued_at + SESSION_MAX_AGE_SECS`.
    pub expires_at: i64,
}

impl SessionRecord {
    #[must_use]
    pub fn issue(principal: Principal, now: i64) -> Self {
        Self {
            principal,
            issued_at: now,
            expires_at: now + SESSION_MAX_AGE_SECS,
        }
    }

    #[must_use]
    pub const fn is_expired(&self, now: i64) -> bool {
        now >= self.expires_at
    }

    /// Whether the record is old enough for a sliding refresh (remaining
    /// lifetime below six hours).
    #[must_use]
    pub const fn needs_refresh(&self, now: i64) -> bool {
        now - self.issued_at > SESSION_REFRESH_AFTER_SECS
    }

    /// Re-issues the record with a renewed window, preserving the original
    /// subject and role claim.
    #[must_use]
    pub fn refreshed(&self, now: i64) -> Self {
        Self::issue(self.principal.clone(), now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal() -> Principal {
        Principal {
            id: 1,
            email: "admin@site.test".to_string(),
            name: "Admin".to_string(),
            role: Role::Admin,
            image: None,
        }
    }

    #[test]
    fn test_fresh_record_is_valid() {
        let record = SessionRecord::issue(principal(), 1_000);
        assert!(!record.is_expired(1_000));
        assert!(!record.needs_refresh(1_000));
        assert_eq!(record.expires_at, 1_000 + SESSION_MAX_AGE_SECS);
    }

    #[test]
    fn test_expiry_boundary() {
        let record = SessionRecord::issue(principal(), 0);
        assert!(!record.is_expired(SESSION_MAX_AGE_SECS - 1));
        assert!(record.is_expired(SESSION_MAX_AGE_SECS));
    }

    #[test]
    fn test_refresh_threshold() {
        let record = SessionRecord::issue(principal(), 0);
        assert!(!record.needs_refresh(SESSION_REFRESH_AFTER_SECS));
        assert!(record.needs_refresh(SESSION_REFRESH_AFTER_SECS + 1));
    }

    #[test]
    fn test_refresh_preserves_subject_and_role() {
        let record = SessionRecord::issue(principal(), 0);
        let later = SESSION_REFRESH_AFTER_SECS + 60;
        let refreshed = record.refreshed(later);

        assert_eq!(refreshed.principal, record.principal);
        assert_eq!(refreshed.issued_at, later);
        assert_eq!(refreshed.expires_at, later + SESSION_MAX_AGE_SECS);
    }
}
