//! Roles command implementation
//!
//! Decodes a bearer token and shows what the configured access policy
//! decides for it.

use crate::adapters::credentials::MemoryCredentialStore;
use crate::cli::session::deny_exit_code;
use crate::cli::{EXIT_ACCESS_DENIED, EXIT_CONFIG, EXIT_OK};
use crate::config::load_config;
use crate::core::claims::{decode_claims, AuthorizationPolicy};
use chrono::Utc;
use clap::Args;
use secrecy::ExposeSecret;

/// Arguments for the roles command
#[derive(Args, Debug)]
pub struct RolesArgs {
    /// Token to inspect
    #[arg(long, conflicts_with = "from_config")]
    pub token: Option<String>,

    /// Inspect the token from the configuration file
    #[arg(long)]
    pub from_config: bool,
}

impl RolesArgs {
    /// Execute the roles command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = load_config(config_path);

        let policy = match &config {
            Ok(config) => AuthorizationPolicy::from_config(&config.authorization),
            Err(e) if self.token.is_some() => {
                tracing::warn!(error = %e, "Configuration unavailable, using the default policy");
                AuthorizationPolicy::default()
            }
            Err(e) => {
                println!("❌ Failed to load configuration: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let token = match (&self.token, &config) {
            (Some(token), _) => token.clone(),
            (None, Ok(config)) => match &config.api.token {
                Some(token) => token.expose_secret().as_ref().to_string(),
                None => {
                    println!("❌ No token in configuration (api.token)");
                    return Ok(EXIT_CONFIG);
                }
            },
            (None, Err(_)) => return Ok(EXIT_CONFIG),
        };

        let Some(claims) = decode_claims(&token) else {
            println!("Token could not be decoded; it carries no roles");
            return Ok(EXIT_ACCESS_DENIED);
        };

        println!("Subject:  {}", claims.subject.as_deref().unwrap_or("-"));
        println!(
            "Expires:  {}",
            claims
                .expires_at
                .map(|t| t.to_rfc3339())
                .unwrap_or_else(|| "-".to_string())
        );
        println!("Pre-auth: {}", claims.pre_auth);
        println!(
            "Roles:    {}",
            if claims.roles.is_empty() {
                "(none)".to_string()
            } else {
                claims.roles.iter().cloned().collect::<Vec<_>>().join(", ")
            }
        );

        let store = MemoryCredentialStore::new();
        store.insert(&policy.storage_key, token);
        let decision = policy.evaluate(&store, Utc::now());

        match deny_exit_code(&decision) {
            Some(code) => Ok(code),
            None => {
                println!("✅ Access granted");
                Ok(EXIT_OK)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose, Engine as _};

    fn token(payload: &str) -> String {
        format!("h.{}.s", general_purpose::URL_SAFE_NO_PAD.encode(payload))
    }

    #[tokio::test]
    async fn test_admin_token_granted() {
        let args = RolesArgs {
            token: Some(token(r#"{"roles":"ADMIN"}"#)),
            from_config: false,
        };
        assert_eq!(args.execute("missing.toml").await.unwrap(), EXIT_OK);
    }

    #[tokio::test]
    async fn test_user_token_denied() {
        let args = RolesArgs {
            token: Some(token(r#"{"roles":"USER"}"#)),
            from_config: false,
        };
        assert_eq!(
            args.execute("missing.toml").await.unwrap(),
            EXIT_ACCESS_DENIED
        );
    }

    #[tokio::test]
    async fn test_from_config_without_file() {
        let args = RolesArgs {
            token: None,
            from_config: true,
        };
        assert_eq!(args.execute("missing.toml").await.unwrap(), EXIT_CONFIG);
    }
}
