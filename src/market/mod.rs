//! Market Data
//!
//! Typed DTOs for the lending backend, static fallback data, and the
//! statistics/recommendations derived from it.
//!
//! Every read endpoint has a fallback: a failed fetch is never an error
//! for the page, it is a [`Fetched`] value whose [`DataSource`] says the
//! data is not live so the caller can show a notice.

mod display;
mod fallback;
mod summary;
mod types;

pub use display::{format_apy, format_compact, format_health_factor, format_ratio, format_usd};
pub use fallback::{
    fallback_market, fallback_markets, fallback_position, fallback_recommendations,
    fallback_stats,
};
pub use summary::overall_recommendation;
pub use types::{
    scale_amount, AddressBalance, AddressInfo, BorrowOpportunity, BorrowPosition, Market,
    MarketStats, PositionResponse, Recommendations, SafeMarket, SimulatedTransaction,
    SimulationAction, SimulationResponse, SupplyOpportunity, SupplyPosition, TopMarket,
    UserPosition,
};

use std::fmt;

/// Where a piece of data came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// Returned by the backend
    Live,
    /// Substituted after a failed fetch
    Fallback { reason: String },
}

/// Data plus its provenance
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub data: T,
    pub source: DataSource,
}

impl<T> Fetched<T> {
    pub fn live(data: T) -> Self {
        Self {
            data,
            source: DataSource::Live,
        }
    }

    pub fn fallback(data: T, reason: impl fmt::Display) -> Self {
        Self {
            data,
            source: DataSource::Fallback {
                reason: reason.to_string(),
            },
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.source, DataSource::Fallback { .. })
    }

    /// Non-blocking notice to show next to fallback data
    pub fn notice(&self) -> Option<String> {
        match &self.source {
            DataSource::Live => None,
            DataSource::Fallback { reason } => Some(format!(
                "Could not reach the lending API ({}). Showing fallback data instead.",
                reason
            )),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetched<U> {
        Fetched {
            data: f(self.data),
            source: self.source,
        }
    }
}
