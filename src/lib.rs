//! `travelgate` - HTTP gateway for the travel planner front-end
//!
//! Relays image search (Pixabay), geocoding (GeoNames) and weather
//! (Weatherbit) requests to their providers and reshapes the answers into
//! small JSON envelopes.

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod providers;
pub mod web;

// Re-export core types for public API
pub use api::{AppState, router};
pub use config::GatewayConfig;
pub use error::{ErrorCode, GatewayError};
pub use models::{ConditionsResult, ImageResult, PlaceResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
