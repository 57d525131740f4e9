//! Outbound provider clients
//!
//! Each proxy builds one upstream URL, performs a single GET through the
//! shared [`HttpClient`] and shapes the JSON into an envelope from
//! [`crate::models`]. There are no retries and no fallbacks.

pub mod geonames;
pub mod pixabay;
pub mod weatherbit;

use std::time::{Duration, Instant};

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

pub use geonames::PlaceResolver;
pub use pixabay::ImageLookup;
pub use weatherbit::{CurrentConditions, HistoricalNormals};

use crate::config::HttpConfig;
use crate::error::GatewayError;

const SLOW_RESPONSE: Duration = Duration::from_secs(5);

/// Pooled HTTP client shared by every proxy
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(config: &HttpConfig) -> Result<Self, GatewayError> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if config.timeout_seconds > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_seconds.into()));
        }

        let client = builder
            .build()
            .map_err(|e| GatewayError::config(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Perform one GET and decode the JSON body.
    ///
    /// `url` carries the provider credential, so only the path is logged.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        provider: &'static str,
        url: &str,
    ) -> Result<T, GatewayError> {
        let started = Instant::now();

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| GatewayError::transport(provider, &e))?;

        let status = response.status();
        debug!(
            provider,
            path = response.url().path(),
            %status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Provider responded"
        );

        if !status.is_success() {
            return Err(GatewayError::UpstreamStatus {
                provider,
                status: status.as_u16(),
            });
        }

        let body = response
            .json::<T>()
            .await
            .map_err(|e| GatewayError::decode(provider, e.to_string()))?;

        let elapsed = started.elapsed();
        if elapsed > SLOW_RESPONSE {
            warn!(
                provider,
                "Slow provider response: {:.3}s",
                elapsed.as_secs_f64()
            );
        }

        Ok(body)
    }
}

/// Join a configured base URL and a query string without doubling separators.
pub(crate) fn with_query(base: &str, query: &str) -> String {
    let base = base.trim_end_matches(['?', '&']);
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{base}{separator}{query}")
}
