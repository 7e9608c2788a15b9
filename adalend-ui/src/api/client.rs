//! HTTP API Client
//!
//! Functions for communicating with the lending REST API.

use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use std::fmt;

use adalend::market::{
    fallback_market, fallback_markets, fallback_position, fallback_recommendations,
    fallback_stats, Fetched, Market, MarketStats, PositionResponse, Recommendations,
    SimulationAction, SimulationResponse,
};
use adalend::store::KeyValueStore;

use crate::wallet::LocalStorage;

/// Default API base URL
pub const DEFAULT_API_BASE: &str = "http://localhost:8001/api";

/// `localStorage` key of the API base URL override
const API_URL_KEY: &str = "adalend_api_url";

/// Get the API base URL from local storage or use default
pub fn get_api_base() -> String {
    let url = LocalStorage
        .get(API_URL_KEY)
        .ok()
        .flatten()
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    // Normalize: remove trailing slash
    url.trim_end_matches('/').to_string()
}

/// Set the API base URL in local storage
pub fn set_api_base(url: &str) {
    if let Err(e) = LocalStorage.set(API_URL_KEY, url) {
        web_sys::console::error_1(&format!("Failed to save API URL: {}", e).into());
    }
}

// ============ Errors ============

/// A failed API call
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    /// HTTP status, `None` when no response arrived
    pub status: Option<u16>,
    pub message: String,
}

impl ApiError {
    fn network(message: impl fmt::Display) -> Self {
        Self {
            status: None,
            message: format!("Network error: {}", message),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "HTTP {}: {}", status, self.message),
            None => f.write_str(&self.message),
        }
    }
}

#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    detail: String,
}

// ============ API Functions ============

/// Fetch all markets
pub async fn fetch_markets() -> Fetched<Vec<Market>> {
    match get_json("/markets").await {
        Ok(markets) => Fetched::live(markets),
        Err(e) => Fetched::fallback(fallback_markets(), e),
    }
}

/// Fetch one market. A 404 is a live "no such market".
pub async fn fetch_market(id: &str) -> Fetched<Option<Market>> {
    match get_json(&format!("/markets/{}", encode(id))).await {
        Ok(market) => Fetched::live(Some(market)),
        Err(e) if e.is_not_found() => Fetched::live(None),
        Err(e) => Fetched::fallback(fallback_market(id), e),
    }
}

/// Fetch protocol-wide statistics
pub async fn fetch_stats() -> Fetched<MarketStats> {
    match get_json("/markets/stats/overview").await {
        Ok(stats) => Fetched::live(stats),
        Err(e) => Fetched::fallback(fallback_stats(), e),
    }
}

/// Fetch supply/borrow recommendations
pub async fn fetch_recommendations() -> Fetched<Recommendations> {
    match get_json("/markets/recommendations").await {
        Ok(recommendations) => Fetched::live(recommendations),
        Err(e) => Fetched::fallback(fallback_recommendations(), e),
    }
}

/// Fetch the position of an address
pub async fn fetch_position(address: &str) -> Fetched<PositionResponse> {
    match get_json(&format!("/users/{}", encode(address))).await {
        Ok(position) => Fetched::live(position),
        Err(e) => Fetched::fallback(fallback_position(address), e),
    }
}

/// Simulate a supply or borrow. There is no fallback for simulations.
pub async fn simulate(
    action: SimulationAction,
    address: &str,
    asset_id: &str,
    amount: &str,
) -> Result<SimulationResponse, ApiError> {
    let path = format!(
        "/users/simulate-{}/{}/{}/{}",
        action.as_str(),
        encode(address),
        encode(asset_id),
        encode(amount)
    );
    post_json(&path).await
}

// ============ Helpers ============

async fn get_json<T: DeserializeOwned>(path: &str) -> Result<T, ApiError> {
    let response = Request::get(&format!("{}{}", get_api_base(), path))
        .send()
        .await
        .map_err(ApiError::network)?;
    decode(response).await
}

async fn post_json<T: DeserializeOwned>(path: &str) -> Result<T, ApiError> {
    let response = Request::post(&format!("{}{}", get_api_base(), path))
        .send()
        .await
        .map_err(ApiError::network)?;
    decode(response).await
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();

    if !response.ok() {
        let message = response
            .json::<ErrorBody>()
            .await
            .map(|body| body.detail)
            .unwrap_or_else(|_| response.status_text());
        return Err(ApiError {
            status: Some(status),
            message,
        });
    }

    response.json().await.map_err(|e| ApiError {
        status: Some(status),
        message: format!("Parse error: {}", e),
    })
}

fn encode(segment: &str) -> String {
    String::from(js_sys::encode_uri_component(segment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_path_segments_are_encoded() {
        assert_eq!(encode("addr test"), "addr%20test");
        assert_eq!(encode("a/b"), "a%2Fb");
    }

    #[wasm_bindgen_test]
    fn test_api_base_override() {
        set_api_base("http://example.test/api/");
        assert_eq!(get_api_base(), "http://example.test/api");

        set_api_base("");
        assert_eq!(get_api_base(), DEFAULT_API_BASE);
    }

    #[test]
    fn test_error_display() {
        let err = ApiError {
            status: Some(500),
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 500: boom");
        assert!(!err.is_not_found());
        assert!(ApiError::network("refused").to_string().contains("refused"));
    }
}
