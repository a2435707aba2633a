use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, instrument};

use crate::core::config::ApiConfig;
use crate::core::currency::{CurrencyCode, CurrencyRateProvider};
use crate::core::error::FetchError;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Rate provider for ExchangeRate-API style `pair` endpoints:
/// `GET {base_url}/{api_key}/pair/{from}/{to}`.
pub struct ExchangeRateApiProvider {
    config: ApiConfig,
    timeout: Duration,
}

impl ExchangeRateApiProvider {
    pub fn new(config: ApiConfig) -> Self {
        ExchangeRateApiProvider {
            config,
            timeout: REQUEST_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Deserialize)]
struct PairResponse {
    result: Option<String>,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
    conversion_rate: Option<serde_json::Value>,
}

impl PairResponse {
    fn into_rate(self) -> Result<f64, FetchError> {
        if self.result.as_deref() == Some("error") {
            return Err(FetchError::Api(
                self.error_type
                    .unwrap_or_else(|| "Unknown API error".to_string()),
            ));
        }

        self.conversion_rate
            .as_ref()
            .and_then(serde_json::Value::as_f64)
            .ok_or(FetchError::InvalidResponse)
    }
}

#[async_trait]
impl CurrencyRateProvider for ExchangeRateApiProvider {
    #[instrument(
        name = "ExchangeRateFetch",
        skip_all,
        fields(from = %from, to = %to)
    )]
    async fn get_rate(&self, from: &CurrencyCode, to: &CurrencyCode) -> Result<f64, FetchError> {
        let Some((base_url, api_key)) = self.config.credentials() else {
            return Err(FetchError::Configuration);
        };
        if from.is_empty() || to.is_empty() {
            return Err(FetchError::MissingCode);
        }

        debug!("Fetching conversion rate from {} to {}...", from, to);
        let url = format!("{base_url}/{api_key}/pair/{from}/{to}");

        let client = reqwest::Client::builder()
            .user_agent("xconv/1.0")
            .timeout(self.timeout)
            .build()?;
        let response = client.get(&url).send().await?;

        debug!(status = %response.status(), "Received rate response");

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let details = match body.trim() {
                "" => status.canonical_reason().unwrap_or("Unknown error").to_string(),
                text => text.to_string(),
            };
            return Err(FetchError::Transport {
                status: status.as_u16(),
                details,
            });
        }
        if status != reqwest::StatusCode::OK {
            return Err(FetchError::UnexpectedStatus(status.as_u16()));
        }

        let text = response.text().await?;
        let data: PairResponse = match serde_json::from_str(&text) {
            Ok(data) => data,
            Err(e) => {
                error!(error = ?e, response = %text, "Failed to parse rate response");
                return Err(e.into());
            }
        };

        data.into_rate().inspect_err(|e| {
            if matches!(e, FetchError::InvalidResponse) {
                error!(response = %text, "Invalid API response");
            }
        })
    }
}
