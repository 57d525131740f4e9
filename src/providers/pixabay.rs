//! Image lookup against the Pixabay search API
//!
//! API documentation: <https://pixabay.com/api/docs/>

use serde::Deserialize;
use tracing::{debug, instrument};

use super::{HttpClient, with_query};
use crate::config::PixabayConfig;
use crate::error::GatewayError;
use crate::models::{ImageResult, PLACEHOLDER_IMAGE_URL};

const PROVIDER: &str = "pixabay";
const RESULTS_PER_PAGE: u8 = 3;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "webformatURL")]
    webformat_url: String,
}

/// Finds one representative photo for a place name
#[derive(Debug, Clone)]
pub struct ImageLookup {
    http: HttpClient,
    base_url: String,
    api_key: String,
}

impl ImageLookup {
    pub fn new(config: &PixabayConfig, http: HttpClient) -> Self {
        Self {
            http,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Search URL for a place: first page of horizontal photos.
    #[must_use]
    pub fn search_url(&self, place_name: &str) -> String {
        with_query(
            &self.base_url,
            &format!(
                "key={}&q={}&image_type=photo&page=1&per_page={}&orientation=horizontal",
                urlencoding::encode(&self.api_key),
                urlencoding::encode(place_name),
                RESULTS_PER_PAGE
            ),
        )
    }

    /// Never reports "not found": a place without hits gets the placeholder.
    #[instrument(name = "image_lookup", skip(self))]
    pub async fn lookup(&self, place_name: &str) -> Result<ImageResult, GatewayError> {
        let response: SearchResponse = self
            .http
            .get_json(PROVIDER, &self.search_url(place_name))
            .await?;

        let image_url = match response.hits.into_iter().next() {
            Some(hit) => hit.webformat_url,
            None => {
                debug!("No images found, using placeholder");
                PLACEHOLDER_IMAGE_URL.to_string()
            }
        };

        Ok(ImageResult {
            image_url,
            place_name: place_name.to_string(),
        })
    }
}
