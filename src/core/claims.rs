//! Bearer-token claim reading and access decisions
//!
//! Tokens are three `.`-separated base64url segments; only the middle (payload)
//! segment is read. Signatures are not verified here: the server remains the
//! authority, and a role set derived on the client only gates local commands.

use crate::adapters::credentials::CredentialStore;
use crate::config::AuthorizationConfig;
use crate::domain::AuthorizationClaims;
use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, TimeZone, Utc};
use secrecy::ExposeSecret;
use serde_json::Value;
use std::collections::BTreeSet;

/// Role set carried by `token`
///
/// Never fails: malformed tokens, bad encodings and missing claims all yield
/// the empty set, as does a `preAuth` second-factor token.
///
/// # Example
///
/// ```
/// use base64::{engine::general_purpose, Engine as _};
/// use vaultflow::core::claims::extract_roles;
///
/// let payload = general_purpose::URL_SAFE_NO_PAD.encode(r#"{"roles":" admin, user "}"#);
/// let roles = extract_roles(&format!("h.{payload}.s"));
/// assert!(roles.contains("ADMIN"));
/// assert!(roles.contains("USER"));
/// ```
pub fn extract_roles(token: &str) -> BTreeSet<String> {
    decode_claims(token).map(|c| c.roles).unwrap_or_default()
}

/// Decode the claims relevant to access decisions
///
/// Returns `None` when the token is not three segments or the payload is not a
/// base64url-encoded JSON object.
pub fn decode_claims(token: &str) -> Option<AuthorizationClaims> {
    let payload = decode_payload(token)?;

    let pre_auth = payload
        .get("preAuth")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let roles = if pre_auth {
        BTreeSet::new()
    } else {
        normalize_roles(payload.get("roles"))
    };

    let subject = payload
        .get("sub")
        .and_then(Value::as_str)
        .map(str::to_string);

    let expires_at = payload
        .get("exp")
        .and_then(expiry_seconds)
        .and_then(|secs| Utc.timestamp_opt(secs, 0).single());

    Some(AuthorizationClaims {
        roles,
        subject,
        expires_at,
        pre_auth,
    })
}

/// Whole seconds from an integer or fractional `exp`
fn expiry_seconds(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|secs| secs.is_finite() && secs.abs() < i64::MAX as f64)
            .map(|secs| secs.trunc() as i64)
    })
}

fn decode_payload(token: &str) -> Option<serde_json::Map<String, Value>> {
    let parts: Vec<&str> = token.trim().split('.').collect();
    if parts.len() != 3 {
        return None;
    }

    let segment = parts[1].trim_end_matches('=');
    let bytes = general_purpose::URL_SAFE_NO_PAD.decode(segment).ok()?;

    match serde_json::from_slice::<Value>(&bytes).ok()? {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

fn normalize_roles(raw: Option<&Value>) -> BTreeSet<String> {
    let joined = match raw {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(","),
        _ => return BTreeSet::new(),
    };

    joined
        .split(',')
        .map(|r| r.trim().to_uppercase())
        .filter(|r| !r.is_empty())
        .collect()
}

/// Result of evaluating an [`AuthorizationPolicy`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Granted { roles: BTreeSet<String> },
    /// No token is stored, or it is not a readable token
    Unauthenticated,
    Expired,
    Forbidden { missing: BTreeSet<String> },
}

impl AccessDecision {
    pub fn is_granted(&self) -> bool {
        matches!(self, AccessDecision::Granted { .. })
    }
}

/// Which roles are required, and where the token is stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationPolicy {
    pub required_roles: BTreeSet<String>,
    pub storage_key: String,
}

impl AuthorizationPolicy {
    pub fn new(
        required_roles: impl IntoIterator<Item = impl AsRef<str>>,
        storage_key: impl Into<String>,
    ) -> Self {
        Self {
            required_roles: required_roles
                .into_iter()
                .map(|r| r.as_ref().trim().to_uppercase())
                .filter(|r| !r.is_empty())
                .collect(),
            storage_key: storage_key.into(),
        }
    }

    /// `ADMIN` under the `token` key
    pub fn admin() -> Self {
        Self::new(["ADMIN"], "token")
    }

    pub fn from_config(config: &AuthorizationConfig) -> Self {
        Self::new(&config.required_roles, config.storage_key.clone())
    }

    /// Decide access for the token currently in `store`
    ///
    /// The token is re-read and re-decoded on every call.
    pub fn evaluate(&self, store: &dyn CredentialStore, now: DateTime<Utc>) -> AccessDecision {
        let Some(token) = store.get(&self.storage_key) else {
            return AccessDecision::Unauthenticated;
        };

        let Some(claims) = decode_claims(token.expose_secret().as_ref()) else {
            return AccessDecision::Unauthenticated;
        };

        self.decide(&claims, now)
    }

    /// Decide access for already-decoded claims
    pub fn decide(&self, claims: &AuthorizationClaims, now: DateTime<Utc>) -> AccessDecision {
        if claims.is_expired_at(now) {
            return AccessDecision::Expired;
        }

        let missing: BTreeSet<String> = self
            .required_roles
            .difference(&claims.roles)
            .cloned()
            .collect();

        if missing.is_empty() {
            AccessDecision::Granted {
                roles: claims.roles.clone(),
            }
        } else {
            AccessDecision::Forbidden { missing }
        }
    }
}

impl Default for AuthorizationPolicy {
    fn default() -> Self {
        Self::admin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::credentials::MemoryCredentialStore;
    use chrono::Duration;
    use serde_json::json;

    fn token(payload: Value) -> String {
        let body = general_purpose::URL_SAFE_NO_PAD.encode(payload.to_string());
        format!("eyJhbGciOiJIUzI1NiJ9.{body}.sig")
    }

    fn roles(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_roles_from_string() {
        assert_eq!(
            extract_roles(&token(json!({ "roles": "admin, user" }))),
            roles(&["ADMIN", "USER"])
        );
    }

    #[test]
    fn test_roles_from_array() {
        assert_eq!(
            extract_roles(&token(json!({ "roles": ["Admin", " auditor "] }))),
            roles(&["ADMIN", "AUDITOR"])
        );
    }

    #[test]
    fn test_array_entries_with_commas_are_split() {
        assert_eq!(
            extract_roles(&token(json!({ "roles": ["admin,user", "ops"] }))),
            roles(&["ADMIN", "OPS", "USER"])
        );
    }

    #[test]
    fn test_empty_tokens_dropped() {
        assert_eq!(
            extract_roles(&token(json!({ "roles": ",, admin ,," }))),
            roles(&["ADMIN"])
        );
    }

    #[test]
    fn test_padded_payload_accepted() {
        let body = general_purpose::URL_SAFE.encode(json!({ "roles": "admin" }).to_string());
        assert_eq!(extract_roles(&format!("h.{body}.s")), roles(&["ADMIN"]));
    }

    #[test]
    fn test_malformed_tokens_yield_empty() {
        assert!(extract_roles("").is_empty());
        assert!(extract_roles("only.two").is_empty());
        assert!(extract_roles("a.b.c.d").is_empty());
        assert!(extract_roles("h.!!!not-base64!!!.s").is_empty());

        let not_json = general_purpose::URL_SAFE_NO_PAD.encode("not json");
        assert!(extract_roles(&format!("h.{not_json}.s")).is_empty());

        let array = general_purpose::URL_SAFE_NO_PAD.encode("[1,2]");
        assert!(extract_roles(&format!("h.{array}.s")).is_empty());
    }

    #[test]
    fn test_missing_or_wrong_type_roles() {
        assert!(extract_roles(&token(json!({ "sub": "alice" }))).is_empty());
        assert!(extract_roles(&token(json!({ "roles": 7 }))).is_empty());
    }

    #[test]
    fn test_pre_auth_token_has_no_roles() {
        let t = token(json!({ "roles": "ADMIN", "preAuth": true }));
        assert!(extract_roles(&t).is_empty());
        assert!(decode_claims(&t).unwrap().pre_auth);
    }

    #[test]
    fn test_decode_subject_and_expiry() {
        let claims = decode_claims(&token(json!({ "sub": "alice", "exp": 1_700_000_000 }))).unwrap();
        assert_eq!(claims.subject.as_deref(), Some("alice"));
        assert_eq!(claims.expires_at.unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_fractional_expiry_truncated() {
        let claims = decode_claims(&token(json!({ "exp": 1.7e9 }))).unwrap();
        assert_eq!(claims.expires_at.unwrap().timestamp(), 1_700_000_000);

        let claims = decode_claims(&token(json!({ "exp": 1_700_000_000.9 }))).unwrap();
        assert_eq!(claims.expires_at.unwrap().timestamp(), 1_700_000_000);

        assert!(decode_claims(&token(json!({ "exp": 1e300 }))).unwrap().expires_at.is_none());
    }

    #[test]
    fn test_policy_granted() {
        let store = MemoryCredentialStore::new();
        store.insert("token", token(json!({ "roles": "admin" })));
        let decision = AuthorizationPolicy::admin().evaluate(&store, Utc::now());
        assert!(decision.is_granted());
    }

    #[test]
    fn test_policy_unauthenticated() {
        let store = MemoryCredentialStore::new();
        assert_eq!(
            AuthorizationPolicy::admin().evaluate(&store, Utc::now()),
            AccessDecision::Unauthenticated
        );

        store.insert("token", "garbage");
        assert_eq!(
            AuthorizationPolicy::admin().evaluate(&store, Utc::now()),
            AccessDecision::Unauthenticated
        );
    }

    #[test]
    fn test_policy_forbidden_lists_missing() {
        let store = MemoryCredentialStore::new();
        store.insert("token", token(json!({ "roles": "user" })));
        let policy = AuthorizationPolicy::new(["admin", "auditor"], "token");
        assert_eq!(
            policy.evaluate(&store, Utc::now()),
            AccessDecision::Forbidden {
                missing: roles(&["ADMIN", "AUDITOR"])
            }
        );
    }

    #[test]
    fn test_policy_expired() {
        let now = Utc::now();
        let exp = (now - Duration::minutes(5)).timestamp();
        let store = MemoryCredentialStore::new();
        store.insert("token", token(json!({ "roles": "admin", "exp": exp })));
        assert_eq!(
            AuthorizationPolicy::admin().evaluate(&store, now),
            AccessDecision::Expired
        );
    }

    #[test]
    fn test_policy_reads_configured_key() {
        let store = MemoryCredentialStore::new();
        store.insert("adminToken", token(json!({ "roles": "admin" })));
        assert_eq!(
            AuthorizationPolicy::admin().evaluate(&store, Utc::now()),
            AccessDecision::Unauthenticated
        );
        let policy = AuthorizationPolicy::new(["ADMIN"], "adminToken");
        assert!(policy.evaluate(&store, Utc::now()).is_granted());
    }

    #[test]
    fn test_empty_policy_grants_authenticated() {
        let store = MemoryCredentialStore::new();
        store.insert("token", token(json!({ "sub": "bob" })));
        let policy = AuthorizationPolicy::new(Vec::<String>::new(), "token");
        assert!(policy.evaluate(&store, Utc::now()).is_granted());
    }

    #[test]
    fn test_decision_reflects_token_changes() {
        let store = MemoryCredentialStore::new();
        let policy = AuthorizationPolicy::admin();
        store.insert("token", token(json!({ "roles": "admin" })));
        assert!(policy.evaluate(&store, Utc::now()).is_granted());
        store.insert("token", token(json!({ "roles": "user" })));
        assert!(!policy.evaluate(&store, Utc::now()).is_granted());
    }
}
