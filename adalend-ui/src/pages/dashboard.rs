//! Dashboard Page
//!
//! Protocol overview, the connected user's position and recommendations.

use leptos::*;

use adalend::market::{
    format_apy, format_health_factor, format_ratio, format_usd, PositionResponse,
    Recommendations,
};

use crate::api;
use crate::components::{CardSkeleton, MarketTable};
use crate::pages::load_market_data;
use crate::state::global::GlobalState;
use crate::state::wallet::WalletState;

/// Dashboard page component
#[component]
pub fn Dashboard() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let wallet = use_context::<WalletState>().expect("WalletState not found");

    // Fetch initial data on mount
    load_market_data(state.clone());

    // Reload the position whenever the connected address changes
    let state_for_position = state.clone();
    create_effect(move |_| {
        let state = state_for_position.clone();
        match wallet.address() {
            Some(address) => spawn_local(async move {
                let position = api::fetch_position(&address).await;
                state.position.set(Some(state.accept(position)));
            }),
            None => state.position.set(None),
        }
    });

    let markets = state.markets;
    let stats = state.stats;
    let recommendations = state.recommendations;

    view! {
        <div class="space-y-8">
            // Page header
            <div>
                <h1 class="text-3xl font-bold">"Dashboard"</h1>
                <p class="text-gray-400 mt-1">"Cardano lending markets at a glance"</p>
            </div>

            // Protocol statistics
            <section>
                <h2 class="text-lg font-semibold mb-4">"Protocol Overview"</h2>
                {move || match stats.get() {
                    Some(stats) => view! {
                        <div class="grid grid-cols-2 md:grid-cols-4 gap-4">
                            <StatCard label="Total Supply" value=format_usd(stats.total_supply) />
                            <StatCard label="Total Borrowed" value=format_usd(stats.total_borrow) />
                            <StatCard label="Markets" value=stats.markets_count.to_string() />
                            <StatCard label="Avg Supply APY" value=format_apy(stats.avg_supply_rate) />
                        </div>
                    }.into_view(),
                    None => view! {
                        <div class="grid grid-cols-2 md:grid-cols-4 gap-4">
                            <CardSkeleton />
                            <CardSkeleton />
                            <CardSkeleton />
                            <CardSkeleton />
                        </div>
                    }.into_view(),
                }}
            </section>

            // Two column layout for position and recommendations
            <div class="grid md:grid-cols-2 gap-8">
                <section class="bg-gray-800 rounded-xl p-6">
                    <h2 class="text-xl font-semibold mb-4">"Your Position"</h2>
                    <PositionPanel />
                </section>

                <section class="bg-gray-800 rounded-xl p-6">
                    <h2 class="text-xl font-semibold mb-4">"Recommendations"</h2>
                    {move || match recommendations.get() {
                        Some(recommendations) => view! {
                            <RecommendationList recommendations=recommendations />
                        }.into_view(),
                        None => view! { <CardSkeleton /> }.into_view(),
                    }}
                </section>
            </div>

            <MarketTable title="All Markets" markets=markets />
        </div>
    }
}

#[component]
fn StatCard(
    label: &'static str,
    #[prop(into)]
    value: String,
) -> impl IntoView {
    view! {
        <div class="bg-gray-800 rounded-lg p-4 border border-gray-700">
            <span class="text-gray-400 text-sm">{label}</span>
            <div class="text-2xl font-bold mt-2">{value}</div>
        </div>
    }
}

/// Position of the connected wallet, or a connect prompt
#[component]
fn PositionPanel() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let wallet = use_context::<WalletState>().expect("WalletState not found");

    move || {
        if !wallet.state.get().is_connected() {
            let wallet = wallet.clone();
            return view! {
                <div class="text-center py-8">
                    <p class="text-gray-400 mb-4">"Connect a wallet to see your supplies and borrows."</p>
                    <button
                        on:click=move |_| wallet.open_picker()
                        class="px-5 py-2 bg-primary-600 hover:bg-primary-700 rounded-lg font-medium transition-colors"
                    >
                        "Connect Wallet"
                    </button>
                </div>
            }.into_view();
        }

        match state.position.get() {
            Some(response) => view! { <PositionSummary response=response /> }.into_view(),
            None => view! { <CardSkeleton /> }.into_view(),
        }
    }
}

#[component]
fn PositionSummary(response: PositionResponse) -> impl IntoView {
    let position = response.position;
    let info = response.address_info;

    view! {
        <div class="space-y-4">
            <div class="grid grid-cols-2 gap-4">
                <div>
                    <span class="text-gray-400 text-sm">"Supplied"</span>
                    <div class="text-xl font-semibold">{format_usd(position.total_supplied_usd)}</div>
                </div>
                <div>
                    <span class="text-gray-400 text-sm">"Borrowed"</span>
                    <div class="text-xl font-semibold">{format_usd(position.total_borrowed_usd)}</div>
                </div>
                <div>
                    <span class="text-gray-400 text-sm">"Health Factor"</span>
                    <div class="text-xl font-semibold">{format_health_factor(position.health_factor)}</div>
                </div>
                <div>
                    <span class="text-gray-400 text-sm">"Borrow Limit Used"</span>
                    <div class="text-xl font-semibold">{format_ratio(position.borrow_limit_used())}</div>
                </div>
            </div>

            <div class="text-sm text-gray-400 border-t border-gray-700 pt-4">
                {format!(
                    "{:.2} ADA on chain · {} transactions",
                    info.balance.ada, info.transaction_count
                )}
            </div>

            {(position.supplies.is_empty() && position.borrows.is_empty()).then(|| view! {
                <p class="text-gray-400">"No supplies or borrows yet."</p>
            })}

            <ul class="space-y-2">
                {position.supplies.into_iter().map(|supply| view! {
                    <li class="flex justify-between">
                        <span>{format!("Supplied {}", supply.asset_id)}</span>
                        <span class="text-green-400">{format_usd(supply.amount_usd)}</span>
                    </li>
                }).collect_view()}
                {position.borrows.into_iter().map(|borrow| view! {
                    <li class="flex justify-between">
                        <span>{format!("Borrowed {}", borrow.asset_id)}</span>
                        <span class="text-purple-400">{format_usd(borrow.amount_usd)}</span>
                    </li>
                }).collect_view()}
            </ul>
        </div>
    }
}

#[component]
fn RecommendationList(recommendations: Recommendations) -> impl IntoView {
    view! {
        <div class="space-y-4">
            {recommendations.overall_recommendation.map(|text| view! {
                <p class="text-gray-300">{text}</p>
            })}

            <div>
                <h3 class="text-sm text-gray-400 mb-2">"Best to supply"</h3>
                <ul class="space-y-1">
                    {recommendations.best_supply_opportunities.into_iter().map(|m| view! {
                        <li class="flex justify-between">
                            <span>{m.name}</span>
                            <span class="text-green-400">{format_apy(m.supply_apy)}</span>
                        </li>
                    }).collect_view()}
                </ul>
            </div>

            <div>
                <h3 class="text-sm text-gray-400 mb-2">"Cheapest to borrow"</h3>
                <ul class="space-y-1">
                    {recommendations.best_borrow_opportunities.into_iter().map(|m| view! {
                        <li class="flex justify-between">
                            <span>{m.name}</span>
                            <span class="text-purple-400">{format_apy(m.borrow_apy)}</span>
                        </li>
                    }).collect_view()}
                </ul>
            </div>

            <div>
                <h3 class="text-sm text-gray-400 mb-2">"Safest collateral"</h3>
                <ul class="space-y-1">
                    {recommendations.safest_supply_markets.into_iter().map(|m| view! {
                        <li class="flex justify-between">
                            <span>{m.name}</span>
                            <span>{format_ratio(m.collateral_factor)}</span>
                        </li>
                    }).collect_view()}
                </ul>
            </div>
        </div>
    }
}
