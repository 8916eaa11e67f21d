//! Metrics endpoint with query-shape negotiation
//!
//! The metrics endpoint has accepted four different query shapes over its
//! lifetime. [`QueryNegotiator`] tries them in a fixed order and returns the
//! first well-formed response.

use super::client::ApiClient;
use super::mapping::map_snapshot;
use crate::core::strategy::{first_success, ChainFailure};
use crate::domain::{ApiError, DateRange, MetricsSnapshot, Result};
use async_trait::async_trait;
use std::fmt;

/// Anything that can produce monthly metrics
#[async_trait]
pub trait MetricsSource: Send + Sync {
    /// Fetch the metrics snapshot for `range`
    async fn fetch_metrics(&self, range: &DateRange) -> Result<MetricsSnapshot>;
}

/// One historical request shape for the metrics endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandidateEncoding {
    /// `year=2025&month=3`
    YearMonth,
    /// `from=2025-03-01&to=2025-03-31`
    CalendarDates,
    /// Full-day bounds with an explicit `+00:00` offset
    OffsetDateTimes,
    /// Full-day bounds in UTC `Z` form
    ZuluDateTimes,
}

impl CandidateEncoding {
    /// All candidates, in the order they are tried
    pub const ORDERED: [CandidateEncoding; 4] = [
        CandidateEncoding::YearMonth,
        CandidateEncoding::CalendarDates,
        CandidateEncoding::OffsetDateTimes,
        CandidateEncoding::ZuluDateTimes,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CandidateEncoding::YearMonth => "year-month",
            CandidateEncoding::CalendarDates => "calendar-dates",
            CandidateEncoding::OffsetDateTimes => "offset-date-times",
            CandidateEncoding::ZuluDateTimes => "zulu-date-times",
        }
    }

    /// Query parameters for `range` in this shape
    ///
    /// # Example
    ///
    /// ```
    /// use vaultflow::adapters::api::metrics::CandidateEncoding;
    /// use vaultflow::domain::DateRange;
    ///
    /// let march = DateRange::month(2025, 3).unwrap();
    /// let query = CandidateEncoding::ZuluDateTimes.query(&march);
    /// assert_eq!(query[0], ("from", "2025-03-01T00:00:00.000Z".to_string()));
    /// assert_eq!(query[1], ("to", "2025-03-31T23:59:59.999Z".to_string()));
    /// ```
    pub fn query(&self, range: &DateRange) -> Vec<(&'static str, String)> {
        let start = range.start().format("%Y-%m-%d");
        let end = range.end().format("%Y-%m-%d");
        match self {
            CandidateEncoding::YearMonth => vec![
                ("year", range.year().to_string()),
                ("month", range.month_number().to_string()),
            ],
            CandidateEncoding::CalendarDates => {
                vec![("from", start.to_string()), ("to", end.to_string())]
            }
            CandidateEncoding::OffsetDateTimes => vec![
                ("from", format!("{start}T00:00:00.000+00:00")),
                ("to", format!("{end}T23:59:59.999+00:00")),
            ],
            CandidateEncoding::ZuluDateTimes => vec![
                ("from", format!("{start}T00:00:00.000Z")),
                ("to", format!("{end}T23:59:59.999Z")),
            ],
        }
    }
}

impl fmt::Display for CandidateEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A successful negotiation
#[derive(Debug, Clone, PartialEq)]
pub struct NegotiationOutcome {
    pub snapshot: MetricsSnapshot,
    /// The shape the server accepted
    pub candidate: CandidateEncoding,
    /// Requests issued, including the successful one
    pub attempts: usize,
}

/// Metrics client that negotiates the request shape
pub struct QueryNegotiator {
    client: ApiClient,
    metrics_path: String,
}

impl QueryNegotiator {
    pub fn new(client: ApiClient, metrics_path: impl Into<String>) -> Self {
        Self {
            client,
            metrics_path: metrics_path.into(),
        }
    }

    /// Try each candidate until one yields a JSON object
    ///
    /// # Errors
    ///
    /// - `Unauthorized` as soon as any candidate gets 401 or 403
    /// - `NegotiationExhausted` when every candidate failed otherwise
    pub async fn negotiate(
        &self,
        range: &DateRange,
    ) -> std::result::Result<NegotiationOutcome, ApiError> {
        let result = first_success(
            "metrics",
            CandidateEncoding::ORDERED,
            |candidate| self.attempt(candidate, range),
            ApiError::is_unauthorized,
        )
        .await;

        match result {
            Ok(success) => {
                tracing::info!(
                    candidate = %success.strategy,
                    attempts = success.attempts,
                    range = %range,
                    "Metrics query negotiated"
                );
                Ok(NegotiationOutcome {
                    snapshot: success.value,
                    candidate: success.strategy,
                    attempts: success.attempts,
                })
            }
            Err(ChainFailure::Aborted { error, .. }) => Err(error),
            Err(ChainFailure::Exhausted {
                last_error,
                attempts,
            }) => {
                let last_error = last_error
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "no candidates".to_string());
                tracing::warn!(
                    attempts = attempts,
                    last_error = %last_error,
                    range = %range,
                    "Every metrics query shape failed"
                );
                Err(ApiError::NegotiationExhausted {
                    attempts,
                    last_error,
                })
            }
        }
    }

    async fn attempt(
        &self,
        candidate: CandidateEncoding,
        range: &DateRange,
    ) -> std::result::Result<MetricsSnapshot, ApiError> {
        let request = self
            .client
            .get(&self.metrics_path)
            .query(&candidate.query(range));

        let response = self.client.send(request).await?;
        let body = ApiClient::body_bytes(response).await?;

        let value: serde_json::Value = serde_json::from_slice(&body)
            .map_err(|e| ApiError::MalformedResponse(format!("body is not JSON: {e}")))?;

        if !value.is_object() {
            return Err(ApiError::MalformedResponse(
                "body is not a JSON object".to_string(),
            ));
        }

        tracing::debug!(candidate = %candidate, "Metrics candidate accepted");
        Ok(map_snapshot(&value))
    }
}

#[async_trait]
impl MetricsSource for QueryNegotiator {
    async fn fetch_metrics(&self, range: &DateRange) -> Result<MetricsSnapshot> {
        Ok(self.negotiate(range).await?.snapshot)
    }
}
