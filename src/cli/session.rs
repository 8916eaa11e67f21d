//! Wiring shared by the networked commands

use crate::adapters::api::{ApiClient, QueryNegotiator, StatementClient};
use crate::adapters::credentials::MemoryCredentialStore;
use crate::cli::{EXIT_ACCESS_DENIED, EXIT_CONFIG};
use crate::config::{load_config, VaultFlowConfig};
use crate::core::claims::{AccessDecision, AuthorizationPolicy};
use crate::core::export::DocumentExporter;
use crate::core::reconcile::Reconciler;
use crate::core::refresh::RefreshCoordinator;
use crate::domain::{DateRange, Result, VaultFlowError};
use chrono::{Datelike, Utc};
use clap::Args;
use std::sync::Arc;

/// Month selection shared by `metrics` and `export`
#[derive(Args, Debug, Clone, Default)]
pub struct PeriodArgs {
    /// Statement year (defaults to the current year)
    #[arg(long)]
    pub year: Option<i32>,

    /// Statement month, 1-12 (defaults to the current month)
    #[arg(long)]
    pub month: Option<u32>,
}

impl PeriodArgs {
    pub fn resolve(&self) -> Result<DateRange> {
        let today = Utc::now().date_naive();
        DateRange::month(
            self.year.unwrap_or(today.year()),
            self.month.unwrap_or(today.month()),
        )
        .map_err(VaultFlowError::Validation)
    }
}

/// Loaded configuration plus the clients built from it
pub struct Session {
    pub config: VaultFlowConfig,
    pub policy: AuthorizationPolicy,
    pub store: Arc<MemoryCredentialStore>,
    client: ApiClient,
}

impl Session {
    pub fn open(config_path: &str) -> Result<Self> {
        let config = load_config(config_path)?;
        let policy = AuthorizationPolicy::from_config(&config.authorization);
        let store = Arc::new(MemoryCredentialStore::with_token(
            &policy.storage_key,
            config.api.token.clone(),
        ));
        let client = ApiClient::new(&config.api, store.clone(), policy.storage_key.clone())?;

        Ok(Self {
            config,
            policy,
            store,
            client,
        })
    }

    pub fn authorize(&self) -> AccessDecision {
        self.policy.evaluate(self.store.as_ref(), Utc::now())
    }

    pub fn coordinator(&self) -> RefreshCoordinator<QueryNegotiator, StatementClient> {
        RefreshCoordinator::new(
            QueryNegotiator::new(self.client.clone(), &self.config.api.metrics_path),
            self.statements(),
            Reconciler::from_config(&self.config.reconcile),
        )
    }

    pub fn exporter(&self) -> DocumentExporter<StatementClient> {
        DocumentExporter::from_config(self.statements(), &self.config.export)
    }

    fn statements(&self) -> StatementClient {
        StatementClient::new(self.client.clone(), &self.config.api.statements_path)
    }
}

/// Open a session, or report the failure and return the exit code
pub fn open_or_exit(config_path: &str) -> std::result::Result<Session, i32> {
    Session::open(config_path).map_err(|e| {
        tracing::error!(error = %e, "Failed to load configuration");
        eprintln!("❌ {e}");
        EXIT_CONFIG
    })
}

/// Print a denial and return its exit code; `None` when access is granted
pub fn deny_exit_code(decision: &AccessDecision) -> Option<i32> {
    let message = match decision {
        AccessDecision::Granted { .. } => return None,
        AccessDecision::Unauthenticated => "no usable token is configured".to_string(),
        AccessDecision::Expired => "the configured token has expired".to_string(),
        AccessDecision::Forbidden { missing } => format!(
            "missing required role(s): {}",
            missing.iter().cloned().collect::<Vec<_>>().join(", ")
        ),
    };

    tracing::warn!(reason = %message, "Access denied");
    eprintln!("⛔ Access denied: {message}");
    Some(EXIT_ACCESS_DENIED)
}
