//! Bearer-token claims

use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

/// Claims decoded from a bearer token
///
/// Derived transiently for each access decision and never cached.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthorizationClaims {
    /// Normalized (trimmed, upper-cased) role tokens
    pub roles: BTreeSet<String>,

    /// `sub` claim
    pub subject: Option<String>,

    /// `exp` claim
    pub expires_at: Option<DateTime<Utc>>,

    /// Temporary second-factor token; carries no roles
    pub pre_auth: bool,
}

impl AuthorizationClaims {
    /// True if the token carries an expiry that is not after `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|exp| exp <= now).unwrap_or(false)
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(&role.trim().to_uppercase())
    }
}
