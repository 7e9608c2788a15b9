//! Lending API Client
//!
//! HTTP client for the lending backend's REST API.
//!
//! Every read has an `*_or_fallback` twin that never fails: on any error
//! it logs a warning and returns static fallback data tagged as such.
//! Simulations have no fallback.

use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

use crate::market::{
    fallback_market, fallback_markets, fallback_position, fallback_recommendations,
    fallback_stats, Fetched, Market, MarketStats, PositionResponse, Recommendations,
    SimulationAction, SimulationResponse,
};

/// Default backend base URL
pub const DEFAULT_API_URL: &str = "http://localhost:8001/api";

/// Errors that can occur when talking to the lending backend
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Lending API unavailable")]
    Unavailable,

    #[error("Request timeout")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },
}

impl ClientError {
    fn from_send(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_connect() {
            ClientError::Unavailable
        } else {
            ClientError::Request(err)
        }
    }

    /// Whether the backend answered 404
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Api { status: 404, .. })
    }
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Configuration for the lending client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL including the `/api` prefix
    pub base_url: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            request_timeout_ms: 10_000,
        }
    }
}

/// REST client for markets, user positions and simulations
pub struct LendingClient {
    client: Client,
    base_url: String,
}

impl LendingClient {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ============================================
    // Endpoints
    // ============================================

    /// `GET /markets`
    pub async fn markets(&self) -> ClientResult<Vec<Market>> {
        self.request(Method::GET, "/markets".to_string()).await
    }

    /// `GET /markets/{id}`
    pub async fn market(&self, id: &str) -> ClientResult<Market> {
        self.request(Method::GET, format!("/markets/{}", segment(id)))
            .await
    }

    /// `GET /markets/stats/overview`
    pub async fn market_stats(&self) -> ClientResult<MarketStats> {
        self.request(Method::GET, "/markets/stats/overview".to_string())
            .await
    }

    /// `GET /markets/recommendations`
    pub async fn recommendations(&self) -> ClientResult<Recommendations> {
        self.request(Method::GET, "/markets/recommendations".to_string())
            .await
    }

    /// `GET /users/{address}`
    pub async fn user_position(&self, address: &str) -> ClientResult<PositionResponse> {
        self.request(Method::GET, format!("/users/{}", segment(address)))
            .await
    }

    /// `POST /users/simulate-supply/{address}/{asset}/{amount}`
    pub async fn simulate_supply(
        &self,
        address: &str,
        asset_id: &str,
        amount: &str,
    ) -> ClientResult<SimulationResponse> {
        self.simulate(SimulationAction::Supply, address, asset_id, amount)
            .await
    }

    /// `POST /users/simulate-borrow/{address}/{asset}/{amount}`
    pub async fn simulate_borrow(
        &self,
        address: &str,
        asset_id: &str,
        amount: &str,
    ) -> ClientResult<SimulationResponse> {
        self.simulate(SimulationAction::Borrow, address, asset_id, amount)
            .await
    }

    pub async fn simulate(
        &self,
        action: SimulationAction,
        address: &str,
        asset_id: &str,
        amount: &str,
    ) -> ClientResult<SimulationResponse> {
        let path = format!(
            "/users/simulate-{}/{}/{}/{}",
            action.as_str(),
            segment(address),
            segment(asset_id),
            segment(amount)
        );
        self.request(Method::POST, path).await
    }

    // ============================================
    // With fallback
    // ============================================

    pub async fn markets_or_fallback(&self) -> Fetched<Vec<Market>> {
        match self.markets().await {
            Ok(markets) => Fetched::live(markets),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch markets, using fallback data");
                Fetched::fallback(fallback_markets(), e)
            }
        }
    }

    /// A backend 404 is a live answer (`None`); other errors fall back to
    /// the static set.
    pub async fn market_or_fallback(&self, id: &str) -> Fetched<Option<Market>> {
        match self.market(id).await {
            Ok(market) => Fetched::live(Some(market)),
            Err(e) if e.is_not_found() => Fetched::live(None),
            Err(e) => {
                tracing::warn!(market = id, error = %e, "Failed to fetch market, using fallback data");
                Fetched::fallback(fallback_market(id), e)
            }
        }
    }

    pub async fn market_stats_or_fallback(&self) -> Fetched<MarketStats> {
        match self.market_stats().await {
            Ok(stats) => Fetched::live(stats),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch market stats, using fallback data");
                Fetched::fallback(fallback_stats(), e)
            }
        }
    }

    pub async fn recommendations_or_fallback(&self) -> Fetched<Recommendations> {
        match self.recommendations().await {
            Ok(recs) => Fetched::live(recs),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch recommendations, using fallback data");
                Fetched::fallback(fallback_recommendations(), e)
            }
        }
    }

    pub async fn user_position_or_fallback(&self, address: &str) -> Fetched<PositionResponse> {
        match self.user_position(address).await {
            Ok(position) => Fetched::live(position),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch user position, using empty position");
                Fetched::fallback(fallback_position(address), e)
            }
        }
    }

    // ============================================
    // Transport
    // ============================================

    async fn request<T: DeserializeOwned>(&self, method: Method, path: String) -> ClientResult<T> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%method, %url, "Lending API request");

        let response = self
            .client
            .request(method, &url)
            .send()
            .await
            .map_err(ClientError::from_send)?;

        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let text = response.text().await.unwrap_or_default();
        Err(ClientError::Api {
            status: status.as_u16(),
            message: error_message(&text),
        })
    }
}

fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// The backend reports errors as `{"detail": "..."}`
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::{SimulatedTransaction, UserPosition};
    use axum::extract::Path;
    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{Json, Router};

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/api", addr)
    }

    fn client(base_url: String) -> LendingClient {
        LendingClient::new(ClientConfig {
            base_url,
            request_timeout_ms: 2_000,
        })
        .unwrap()
    }

    fn backend() -> Router {
        Router::new()
            .route(
                "/api/markets",
                get(|| async { Json(fallback_markets().into_iter().take(2).collect::<Vec<_>>()) }),
            )
            .route(
                "/api/markets/stats/overview",
                get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "db down") }),
            )
            .route(
                "/api/markets/:id",
                get(|Path(id): Path<String>| async move {
                    match fallback_market(&id) {
                        Some(market) => Ok(Json(market)),
                        None => Err((
                            StatusCode::NOT_FOUND,
                            Json(serde_json::json!({
                                "detail": format!("Market with ID {} not found", id)
                            })),
                        )),
                    }
                }),
            )
            .route(
                "/api/users/simulate-supply/:address/:asset/:amount",
                post(
                    |Path((address, asset, amount)): Path<(String, String, String)>| async move {
                        Json(SimulationResponse {
                            success: true,
                            simulated_position: UserPosition::empty(address),
                            transaction: SimulatedTransaction {
                                action: SimulationAction::Supply,
                                asset_id: asset,
                                amount,
                                amount_usd: 48.0,
                                health_factor_before: None,
                                health_factor_after: None,
                                timestamp: chrono::Utc::now().naive_utc(),
                            },
                        })
                    },
                ),
            )
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8001/api");

        let client = LendingClient::new(ClientConfig {
            base_url: "http://example.test/api/".to_string(),
            ..ClientConfig::default()
        })
        .unwrap();
        assert_eq!(client.base_url(), "http://example.test/api");
    }

    #[test]
    fn test_error_message_prefers_detail() {
        assert_eq!(error_message(r#"{"detail":"Borrow would exceed borrow limit"}"#), "Borrow would exceed borrow limit");
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
    }

    #[tokio::test]
    async fn test_live_markets() {
        let client = client(serve(backend()).await);

        let fetched = client.markets_or_fallback().await;
        assert!(!fetched.is_fallback());
        assert_eq!(fetched.data.len(), 2);
    }

    #[tokio::test]
    async fn test_market_not_found_is_live_none() {
        let client = client(serve(backend()).await);

        let err = client.market("doge").await.unwrap_err();
        match &err {
            ClientError::Api { status, message } => {
                assert_eq!(*status, 404);
                assert_eq!(message, "Market with ID doge not found");
            }
            other => panic!("unexpected error: {:?}", other),
        }

        let fetched = client.market_or_fallback("doge").await;
        assert!(!fetched.is_fallback());
        assert!(fetched.data.is_none());
    }

    #[tokio::test]
    async fn test_server_error_falls_back() {
        let client = client(serve(backend()).await);

        let fetched = client.market_stats_or_fallback().await;
        assert!(fetched.is_fallback());
        assert_eq!(fetched.data.markets_count, 8);
        assert!(fetched.notice().unwrap().contains("500"));
    }

    #[tokio::test]
    async fn test_simulation_encodes_path_segments() {
        let client = client(serve(backend()).await);

        let response = client
            .simulate_supply("addr test", "policy.asset name", "100")
            .await
            .unwrap();
        assert!(response.success);
        assert_eq!(response.simulated_position.user_address, "addr test");
        assert_eq!(response.transaction.asset_id, "policy.asset name");
    }

    #[tokio::test]
    async fn test_unreachable_backend_uses_fallback() {
        let client = client("http://127.0.0.1:1/api".to_string());

        assert!(matches!(
            client.markets().await,
            Err(ClientError::Unavailable)
        ));

        let markets = client.markets_or_fallback().await;
        assert!(markets.is_fallback());
        assert_eq!(markets.data, fallback_markets());
        assert!(markets.notice().is_some());

        let market = client.market_or_fallback("ada").await;
        assert!(market.is_fallback());
        assert_eq!(market.data.map(|m| m.symbol), Some("ADA".to_string()));

        let position = client.user_position_or_fallback("addr1xyz").await;
        assert!(position.is_fallback());
        assert_eq!(position.data.position.user_address, "addr1xyz");

        assert!(client.simulate_borrow("addr1xyz", "lovelace", "5").await.is_err());
    }
}
