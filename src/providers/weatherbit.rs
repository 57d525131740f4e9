//! Current conditions and climate normals from the Weatherbit API
//!
//! API documentation: <https://www.weatherbit.io/api/weather-current> and
//! <https://www.weatherbit.io/api/climate-normals>

use serde::Deserialize;
use serde_json::Value;
use tracing::{instrument, warn};

use super::{HttpClient, with_query};
use crate::config::WeatherbitConfig;
use crate::error::GatewayError;
use crate::models::ConditionsResult;

const PROVIDER: &str = "weatherbit";

/// Both endpoints wrap their records in a `data` list
#[derive(Debug, Deserialize)]
struct DataResponse {
    #[serde(default)]
    data: Vec<Value>,
}

impl DataResponse {
    /// First record, or the no-data sentinel when the list is empty.
    fn into_result(self, context: Value) -> ConditionsResult {
        match self.data.into_iter().next() {
            Some(record) => ConditionsResult {
                data: record,
                context,
            },
            None => {
                warn!("Weather provider returned an empty data list");
                ConditionsResult::no_data(context)
            }
        }
    }
}

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path)
}

/// Present weather at a coordinate
#[derive(Debug, Clone)]
pub struct CurrentConditions {
    http: HttpClient,
    base_url: String,
    api_key: String,
}

impl CurrentConditions {
    pub fn new(config: &WeatherbitConfig, http: HttpClient) -> Self {
        Self {
            http,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    #[must_use]
    pub fn current_url(&self, lat: f64, lon: f64) -> String {
        with_query(
            &endpoint(&self.base_url, "current"),
            &format!(
                "lat={lat}&lon={lon}&key={}",
                urlencoding::encode(&self.api_key)
            ),
        )
    }

    #[instrument(name = "current_conditions", skip(self, context))]
    pub async fn fetch(
        &self,
        lat: f64,
        lon: f64,
        context: Value,
    ) -> Result<ConditionsResult, GatewayError> {
        let response: DataResponse = self
            .http
            .get_json(PROVIDER, &self.current_url(lat, lon))
            .await?;
        Ok(response.into_result(context))
    }
}

/// Daily climate normals for one day of the year at a coordinate
#[derive(Debug, Clone)]
pub struct HistoricalNormals {
    http: HttpClient,
    base_url: String,
    api_key: String,
}

impl HistoricalNormals {
    pub fn new(config: &WeatherbitConfig, http: HttpClient) -> Self {
        Self {
            http,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// The same date bounds both ends of the range, giving a one-day window.
    #[must_use]
    pub fn normals_url(&self, lat: f64, lon: f64, date: &str) -> String {
        let day = urlencoding::encode(date);
        with_query(
            &endpoint(&self.base_url, "normals"),
            &format!(
                "lat={lat}&lon={lon}&start_day={day}&end_day={day}&tp=daily&key={}",
                urlencoding::encode(&self.api_key)
            ),
        )
    }

    #[instrument(name = "historical_normals", skip(self, context))]
    pub async fn fetch(
        &self,
        lat: f64,
        lon: f64,
        date: &str,
        context: Value,
    ) -> Result<ConditionsResult, GatewayError> {
        let response: DataResponse = self
            .http
            .get_json(PROVIDER, &self.normals_url(lat, lon, date))
            .await?;
        Ok(response.into_result(context))
    }
}
