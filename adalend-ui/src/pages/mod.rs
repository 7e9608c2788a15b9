//! Pages
//!
//! Top-level page components for each route.

pub mod dashboard;
pub mod markets;
pub mod asset_detail;

pub use dashboard::Dashboard;
pub use markets::Markets;
pub use asset_detail::AssetDetail;

use leptos::*;

use crate::api;
use crate::state::global::GlobalState;

/// Load markets, statistics and recommendations into the global state
pub(crate) fn load_market_data(state: GlobalState) {
    spawn_local(async move {
        state.loading.set(true);
        state.using_fallback.set(false);

        let markets = api::fetch_markets().await;
        state.markets.set(state.accept(markets));

        let stats = api::fetch_stats().await;
        state.stats.set(Some(state.accept(stats)));

        let recommendations = api::fetch_recommendations().await;
        state.recommendations.set(Some(state.accept(recommendations)));

        state.mark_refreshed();
        state.loading.set(false);
    });
}
