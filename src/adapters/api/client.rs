//! Shared HTTP client for the banking API

use crate::adapters::credentials::CredentialStore;
use crate::config::ApiConfig;
use crate::domain::{ApiError, Result, VaultFlowError};
use reqwest::{Client, ClientBuilder, RequestBuilder, Response};
use secrecy::ExposeSecret;
use std::sync::Arc;
use std::time::Duration;

/// Authenticated HTTP client
///
/// Every request gets `Authorization: Bearer <token>` when the credential store
/// holds a token under `storage_key`. The token is read per request.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
    credentials: Arc<dyn CredentialStore>,
    storage_key: String,
}

impl ApiClient {
    /// Build a client from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::sync::Arc;
    /// use vaultflow::adapters::api::ApiClient;
    /// use vaultflow::adapters::credentials::MemoryCredentialStore;
    /// use vaultflow::config::ApiConfig;
    ///
    /// let store = Arc::new(MemoryCredentialStore::new());
    /// let client = ApiClient::new(&ApiConfig::default(), store, "token").unwrap();
    /// ```
    pub fn new(
        config: &ApiConfig,
        credentials: Arc<dyn CredentialStore>,
        storage_key: impl Into<String>,
    ) -> Result<Self> {
        let mut client_builder = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.timeout_seconds.min(30)));

        if !config.tls_verify {
            tracing::warn!("TLS certificate verification disabled");
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder.build().map_err(|e| {
            VaultFlowError::Configuration(format!("Failed to build HTTP client: {e}"))
        })?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            credentials,
            storage_key: storage_key.into(),
        })
    }

    /// Absolute URL for `path`
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.authorize(self.client.get(self.url(path)))
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.authorize(self.client.post(self.url(path)))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.credentials.get(&self.storage_key) {
            Some(token) => request.bearer_auth(token.expose_secret().as_ref()),
            None => request,
        }
    }

    /// Send a request and check its status
    ///
    /// Transport failures map to `Unreachable` or `Timeout`, 401/403 to
    /// `Unauthorized`, and other non-success statuses to `Status`.
    pub async fn send(&self, request: RequestBuilder) -> std::result::Result<Response, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::from_transport(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status.as_u16(), body));
        }

        Ok(response)
    }

    /// Read the body of a successful response as bytes
    pub async fn body_bytes(response: Response) -> std::result::Result<Vec<u8>, ApiError> {
        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| ApiError::from_transport(&e))
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("storage_key", &self.storage_key)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::credentials::MemoryCredentialStore;

    fn config(base_url: &str) -> ApiConfig {
        ApiConfig {
            base_url: base_url.to_string(),
            ..ApiConfig::default()
        }
    }

    #[test]
    fn test_url_trims_trailing_slash() {
        let client = ApiClient::new(
            &config("https://bank.example.com/"),
            Arc::new(MemoryCredentialStore::new()),
            "token",
        )
        .unwrap();
        assert_eq!(
            client.url("/api/admin/metrics"),
            "https://bank.example.com/api/admin/metrics"
        );
    }

    #[tokio::test]
    async fn test_bearer_header_attached() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/ping")
            .match_header("authorization", "Bearer abc.def.ghi")
            .with_status(200)
            .create_async()
            .await;

        let store = MemoryCredentialStore::new();
        store.insert("token", "abc.def.ghi");
        let client = ApiClient::new(&config(&server.url()), Arc::new(store), "token").unwrap();

        client.send(client.get("/ping")).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_forbidden_maps_to_unauthorized() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/ping")
            .with_status(403)
            .create_async()
            .await;

        let client = ApiClient::new(
            &config(&server.url()),
            Arc::new(MemoryCredentialStore::new()),
            "token",
        )
        .unwrap();

        let err = client.send(client.get("/ping")).await.unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        let client = ApiClient::new(
            &config("http://127.0.0.1:1"),
            Arc::new(MemoryCredentialStore::new()),
            "token",
        )
        .unwrap();

        let err = client.send(client.get("/ping")).await.unwrap_err();
        assert!(matches!(
            err,
            ApiError::Unreachable(_) | ApiError::Timeout(_)
        ));
    }
}
