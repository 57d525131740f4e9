//! Place resolution against the GeoNames search API
//!
//! API documentation: <http://www.geonames.org/export/geonames-search.html>

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

use super::{HttpClient, with_query};
use crate::config::GeoNamesConfig;
use crate::error::GatewayError;
use crate::models::PlaceResult;

const PROVIDER: &str = "geonames";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    geonames: Vec<Value>,
    /// Present instead of results when the account or query is refused
    status: Option<ServiceStatus>,
}

#[derive(Debug, Deserialize)]
struct ServiceStatus {
    message: String,
}

/// Resolves a free-text place name to its best GeoNames record
#[derive(Debug, Clone)]
pub struct PlaceResolver {
    http: HttpClient,
    base_url: String,
    username: String,
}

impl PlaceResolver {
    pub fn new(config: &GeoNamesConfig, http: HttpClient) -> Self {
        Self {
            http,
            base_url: config.base_url.clone(),
            username: config.username.clone(),
        }
    }

    #[must_use]
    pub fn search_url(&self, place_name: &str) -> String {
        with_query(
            &self.base_url,
            &format!(
                "q={}&maxRows=1&username={}",
                urlencoding::encode(place_name),
                urlencoding::encode(&self.username)
            ),
        )
    }

    /// The record is returned verbatim; the token is echoed whatever the outcome.
    #[instrument(name = "place_resolution", skip(self, passthrough_token))]
    pub async fn resolve(
        &self,
        place_name: &str,
        passthrough_token: Value,
    ) -> Result<PlaceResult, GatewayError> {
        let response: SearchResponse = self
            .http
            .get_json(PROVIDER, &self.search_url(place_name))
            .await?;

        if let Some(status) = response.status {
            return Err(GatewayError::UpstreamRejected {
                provider: PROVIDER,
                message: status.message,
            });
        }

        match response.geonames.into_iter().next() {
            Some(record) => Ok(PlaceResult {
                data: record,
                passthrough_token,
            }),
            None => {
                debug!("No place matched");
                Ok(PlaceResult::no_match(passthrough_token))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HttpConfig;

    #[test]
    fn test_search_url() {
        let config = GeoNamesConfig {
            username: "demo".into(),
            base_url: "http://api.geonames.org/searchJSON".into(),
        };
        let resolver = PlaceResolver::new(&config, HttpClient::new(&HttpConfig::default()).unwrap());
        assert_eq!(
            resolver.search_url("New York"),
            "http://api.geonames.org/searchJSON?q=New%20York&maxRows=1&username=demo"
        );
    }

    #[test]
    fn test_missing_geonames_field_means_no_match() {
        let response: SearchResponse =
            serde_json::from_str(r#"{"totalResultsCount":0}"#).unwrap();
        assert!(response.geonames.is_empty());
        assert!(response.status.is_none());
    }

    #[test]
    fn test_service_status_decodes() {
        let response: SearchResponse = serde_json::from_str(
            r#"{"status":{"message":"user account not enabled to use the free webservice","value":10}}"#,
        )
        .unwrap();
        assert_eq!(
            response.status.unwrap().message,
            "user account not enabled to use the free webservice"
        );
    }
}
