//! Request and response envelopes exchanged with the front-end
//!
//! Every envelope lives for a single call. Passthrough tokens and context
//! objects are kept as raw JSON and never inspected.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Shown when the image provider has no hit for a place
pub const PLACEHOLDER_IMAGE_URL: &str =
    "https://cdn.pixabay.com/photo/2017/06/08/09/47/lego-2383096_960_720.jpg";

/// Returned in `data` when geocoding finds nothing
pub const NO_PLACE_MATCH: &str = "user city name returns nothing";

/// Returned in `data` when the weather provider sends an empty list
pub const NO_WEATHER_DATA: &str = "weather provider returned no data";

/// Body of `POST /pixabay`
#[derive(Debug, Clone, Deserialize)]
pub struct ImageRequest {
    #[serde(rename = "placeName", alias = "cityName")]
    pub place_name: String,
}

/// Body of `POST /GeoNames`
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceRequest {
    #[serde(rename = "placeName", alias = "cityName")]
    pub place_name: String,
    #[serde(rename = "passthroughToken", alias = "picURL", default)]
    pub passthrough_token: Value,
}

/// Body of `POST /WeatherbitCurrent`
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentConditionsRequest {
    #[serde(deserialize_with = "coordinate")]
    pub lat: f64,
    #[serde(alias = "lng", deserialize_with = "coordinate")]
    pub lon: f64,
    #[serde(alias = "des", default)]
    pub context: Value,
}

/// Body of `POST /WeatherbitNormal`
#[derive(Debug, Clone, Deserialize)]
pub struct NormalsRequest {
    #[serde(deserialize_with = "coordinate")]
    pub lat: f64,
    #[serde(alias = "lng", deserialize_with = "coordinate")]
    pub lon: f64,
    /// Forwarded to the provider as-is for both ends of the day range
    #[serde(alias = "userDate")]
    pub date: String,
    #[serde(alias = "des", default)]
    pub context: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageResult {
    #[serde(rename = "imageURL")]
    pub image_url: String,
    #[serde(rename = "placeName")]
    pub place_name: String,
}

/// Geocoding outcome: the provider's record or [`NO_PLACE_MATCH`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceResult {
    pub data: Value,
    #[serde(rename = "passthroughToken")]
    pub passthrough_token: Value,
}

/// Weather outcome for both current conditions and climate normals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionsResult {
    pub data: Value,
    pub context: Value,
}

impl PlaceResult {
    pub fn no_match(passthrough_token: Value) -> Self {
        Self {
            data: Value::String(NO_PLACE_MATCH.to_string()),
            passthrough_token,
        }
    }

    #[must_use]
    pub fn is_match(&self) -> bool {
        self.data.as_str() != Some(NO_PLACE_MATCH)
    }
}

impl ConditionsResult {
    pub fn no_data(context: Value) -> Self {
        Self {
            data: Value::String(NO_WEATHER_DATA.to_string()),
            context,
        }
    }
}

/// Form posts carry coordinates as strings, JSON bodies as numbers.
fn coordinate<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        String(String),
    }

    let (value, raw) = match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => (Some(n), n.to_string()),
        NumberOrString::String(s) => (s.trim().parse::<f64>().ok(), s),
    };

    value
        .filter(|n| n.is_finite())
        .ok_or_else(|| serde::de::Error::custom(format!("invalid coordinate '{raw}'")))
}
