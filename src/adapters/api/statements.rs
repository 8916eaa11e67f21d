//! Statement endpoints: monthly ledger CSV and server-rendered PDF

use super::client::ApiClient;
use crate::core::export::StatementEndpoint;
use crate::core::ledger::{self, LedgerSource};
use crate::domain::{ApiError, DateRange, Result, TransferRecord};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use serde::Serialize;

/// Request body for `POST {statements_path}/pdf`
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PdfRequest {
    pub year: i32,
    pub month: u32,
    pub chart_png_data_url: Option<String>,
}

/// Encode PNG bytes as a `data:` URL
pub fn png_data_url(png: &[u8]) -> String {
    format!(
        "data:image/png;base64,{}",
        general_purpose::STANDARD.encode(png)
    )
}

/// Client for the statement endpoints
pub struct StatementClient {
    client: ApiClient,
    statements_path: String,
}

impl StatementClient {
    pub fn new(client: ApiClient, statements_path: impl Into<String>) -> Self {
        let statements_path: String = statements_path.into();
        Self {
            client,
            statements_path: statements_path.trim_end_matches('/').to_string(),
        }
    }

    /// `{statements_path}/{year}/{MM}.csv`
    pub fn csv_path(&self, range: &DateRange) -> String {
        format!(
            "{}/{}/{:02}.csv",
            self.statements_path,
            range.year(),
            range.month_number()
        )
    }

    pub fn pdf_path(&self) -> String {
        format!("{}/pdf", self.statements_path)
    }

    async fn download_csv(&self, range: &DateRange) -> std::result::Result<Vec<u8>, ApiError> {
        let response = self.client.send(self.client.get(&self.csv_path(range))).await?;
        ApiClient::body_bytes(response).await
    }
}

fn reject_empty(body: Vec<u8>, what: &str) -> std::result::Result<Vec<u8>, ApiError> {
    if body.is_empty() {
        Err(ApiError::MalformedResponse(format!("empty {what} body")))
    } else {
        Ok(body)
    }
}

#[async_trait]
impl LedgerSource for StatementClient {
    async fn fetch_ledger(&self, range: &DateRange) -> Result<Vec<TransferRecord>> {
        let body = self.download_csv(range).await?;
        let raw = String::from_utf8_lossy(&body);
        let (records, report) = ledger::parse_with_report(&raw);
        tracing::debug!(
            range = %range,
            rows_seen = report.rows_seen,
            rows_skipped = report.rows_skipped,
            records = records.len(),
            "Ledger fetched"
        );
        Ok(records)
    }
}

#[async_trait]
impl StatementEndpoint for StatementClient {
    async fn fetch_csv(&self, range: &DateRange) -> Result<Vec<u8>> {
        let body = self.download_csv(range).await?;
        reject_empty(body, "CSV").map_err(Into::into)
    }

    async fn render_pdf(&self, range: &DateRange, chart_png: Option<&[u8]>) -> Result<Vec<u8>> {
        let payload = PdfRequest {
            year: range.year(),
            month: range.month_number(),
            chart_png_data_url: chart_png.map(png_data_url),
        };

        let request = self.client.post(&self.pdf_path()).json(&payload);
        let response = self.client.send(request).await?;
        let body = ApiClient::body_bytes(response).await?;
        reject_empty(body, "PDF").map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::credentials::MemoryCredentialStore;
    use crate::config::ApiConfig;
    use std::sync::Arc;

    fn client(base_url: &str) -> StatementClient {
        let config = ApiConfig {
            base_url: base_url.to_string(),
            ..ApiConfig::default()
        };
        let api = ApiClient::new(&config, Arc::new(MemoryCredentialStore::new()), "token").unwrap();
        StatementClient::new(api, "/api/admin/statements/")
    }

    #[test]
    fn test_paths() {
        let statements = client("https://bank.example.com");
        let range = DateRange::month(2025, 3).unwrap();
        assert_eq!(statements.csv_path(&range), "/api/admin/statements/2025/03.csv");
        assert_eq!(statements.pdf_path(), "/api/admin/statements/pdf");
    }

    #[test]
    fn test_pdf_request_shape() {
        let body = serde_json::to_value(PdfRequest {
            year: 2025,
            month: 3,
            chart_png_data_url: None,
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "year": 2025, "month": 3, "chartPngDataUrl": null })
        );
    }

    #[test]
    fn test_png_data_url() {
        assert_eq!(png_data_url(&[0x89, 0x50]), "data:image/png;base64,iVA=");
    }

    #[tokio::test]
    async fn test_fetch_ledger_parses_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/admin/statements/2025/03.csv")
            .with_status(200)
            .with_header("content-type", "text/csv")
            .with_body(
                "date,fromAccount,toAccount,amount,reference\n\
                 2025-03-02T10:00:00Z,A1,B1,10.00,1\n\
                 2025-03-05T08:30:00Z,A2,B2,5.50,2\n",
            )
            .create_async()
            .await;

        let statements = client(&server.url());
        let records = statements
            .fetch_ledger(&DateRange::month(2025, 3).unwrap())
            .await
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].reference, "2");
    }

    #[tokio::test]
    async fn test_empty_csv_is_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/admin/statements/2025/03.csv")
            .with_status(200)
            .with_body("")
            .create_async()
            .await;

        let statements = client(&server.url());
        let result = statements
            .fetch_csv(&DateRange::month(2025, 3).unwrap())
            .await;
        assert!(result.is_err());
    }
}
