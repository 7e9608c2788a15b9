//! Markets Page
//!
//! Every lending market with protocol totals.

use leptos::*;

use adalend::market::{format_apy, format_usd};

use crate::components::{Loading, MarketTable};
use crate::pages::load_market_data;
use crate::state::global::GlobalState;

/// Markets page component
#[component]
pub fn Markets() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    load_market_data(state.clone());

    let markets = state.markets;
    let stats = state.stats;
    let loading = state.loading;

    let state_for_refresh = state.clone();
    let refresh = move |_| load_market_data(state_for_refresh.clone());

    view! {
        <div class="space-y-8">
            // Page header
            <div class="flex items-center justify-between">
                <div>
                    <h1 class="text-3xl font-bold">"Markets"</h1>
                    <p class="text-gray-400 mt-1">"Supply and borrow rates across all assets"</p>
                </div>

                <button
                    on:click=refresh
                    disabled=move || loading.get()
                    class="px-4 py-2 bg-gray-700 hover:bg-gray-600 disabled:opacity-50
                           rounded-lg font-medium transition-colors"
                >
                    {move || if loading.get() { "Refreshing..." } else { "Refresh" }}
                </button>
            </div>

            // Totals
            {move || stats.get().map(|stats| view! {
                <div class="flex flex-wrap gap-8 text-sm">
                    <div>
                        <span class="text-gray-400">"Total supply "</span>
                        <span class="font-semibold">{format_usd(stats.total_supply)}</span>
                    </div>
                    <div>
                        <span class="text-gray-400">"Total borrowed "</span>
                        <span class="font-semibold">{format_usd(stats.total_borrow)}</span>
                    </div>
                    <div>
                        <span class="text-gray-400">"Avg borrow APY "</span>
                        <span class="font-semibold">{format_apy(stats.avg_borrow_rate)}</span>
                    </div>
                </div>
            })}

            {move || {
                if markets.with(|m| m.is_empty()) && loading.get() {
                    view! { <Loading label="Loading markets..." /> }.into_view()
                } else {
                    view! { <MarketTable title="Lending Markets" markets=markets /> }.into_view()
                }
            }}
        </div>
    }
}
