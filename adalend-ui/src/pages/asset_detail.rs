//! Asset Detail Page
//!
//! Parameters of a single market and a supply/borrow simulator for the
//! connected wallet.

use leptos::*;
use leptos_router::*;

use adalend::market::{
    format_apy, format_compact, format_health_factor, format_ratio, format_usd, Market,
    SimulationAction, SimulationResponse,
};

use crate::api;
use crate::components::Loading;
use crate::state::global::GlobalState;
use crate::state::wallet::WalletState;

/// Asset detail page component
#[component]
pub fn AssetDetail() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let params = use_params_map();
    let id = move || params.with(|p| p.get("id").cloned().unwrap_or_default());

    // `None` while loading, `Some(None)` for an unknown market
    let market = create_rw_signal(None::<Option<Market>>);

    create_effect(move |_| {
        let id = id();
        let state = state.clone();
        market.set(None);
        spawn_local(async move {
            let fetched = api::fetch_market(&id).await;
            market.set(Some(state.accept(fetched)));
        });
    });

    view! {
        <div class="space-y-8">
            <A href="/markets" class="text-gray-400 hover:text-white">"← Back to Markets"</A>

            {move || match market.get() {
                None => view! { <Loading label="Loading market..." /> }.into_view(),
                Some(None) => view! {
                    <div class="text-center py-12">
                        <h1 class="text-2xl font-bold mb-2">"Market not found"</h1>
                        <p class="text-gray-400">{format!("There is no market with id \"{}\".", id())}</p>
                    </div>
                }.into_view(),
                Some(Some(market)) => view! { <MarketDetail market=market /> }.into_view(),
            }}
        </div>
    }
}

#[component]
fn MarketDetail(market: Market) -> impl IntoView {
    let utilization = format_ratio(market.utilization_rate);
    let supply_tokens = format_compact(market.total_supply_tokens());
    let borrow_tokens = format_compact(market.total_borrow_tokens());
    let liquidity_tokens = format_compact(market.liquidity_tokens());

    view! {
        <div class="space-y-8">
            // Header
            <div class="flex items-center space-x-4">
                {market.logo_url.clone().map(|url| view! {
                    <img src=url alt=market.name.clone() class="w-12 h-12 rounded-full" />
                })}
                <div>
                    <h1 class="text-3xl font-bold">{market.name.clone()}</h1>
                    <p class="text-gray-400">{market.symbol.clone()}</p>
                </div>
                {(!market.is_active).then(|| view! {
                    <span class="px-3 py-1 bg-red-600 rounded-full text-sm">"Inactive"</span>
                })}
            </div>

            // Key figures
            <div class="grid grid-cols-2 md:grid-cols-4 gap-4">
                <Figure label="Price" value=format!("${:.4}", market.price_usd) />
                <Figure label="Supply APY" value=format_apy(market.supply_apy) />
                <Figure label="Borrow APY" value=format_apy(market.borrow_apy) />
                <Figure label="Utilization" value=utilization />
            </div>

            <div class="grid md:grid-cols-2 gap-8">
                // Market size
                <section class="bg-gray-800 rounded-xl p-6">
                    <h2 class="text-xl font-semibold mb-4">"Market Size"</h2>
                    <dl class="space-y-3">
                        <Row label="Total supply" value=format!("{} {} ({})", supply_tokens, market.symbol, format_usd(market.total_supply_usd)) />
                        <Row label="Total borrowed" value=format!("{} {} ({})", borrow_tokens, market.symbol, format_usd(market.total_borrow_usd)) />
                        <Row label="Available liquidity" value=format!("{} {} ({})", liquidity_tokens, market.symbol, format_usd(market.liquidity_usd)) />
                    </dl>
                </section>

                // Risk parameters
                <section class="bg-gray-800 rounded-xl p-6">
                    <h2 class="text-xl font-semibold mb-4">"Risk Parameters"</h2>
                    <dl class="space-y-3">
                        <Row label="Collateral factor" value=format_ratio(market.collateral_factor) />
                        <Row label="Liquidation threshold" value=format_ratio(market.liquidation_threshold) />
                        <Row label="Liquidation penalty" value=format_ratio(market.liquidation_penalty) />
                        <Row label="Reserve factor" value=format_ratio(market.reserve_factor) />
                        <Row label="Usable as collateral" value=if market.can_use_as_collateral { "Yes" } else { "No" } />
                    </dl>
                </section>
            </div>

            <Simulator market=market />
        </div>
    }
}

#[component]
fn Figure(
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

#[component]
fn Row(
    label: &'static str,
    #[prop(into)]
    value: String,
) -> impl IntoView {
    view! {
        <div class="flex justify-between">
            <dt class="text-gray-400">{label}</dt>
            <dd class="font-medium">{value}</dd>
        </div>
    }
}

/// Supply/borrow simulation for the connected wallet
#[component]
fn Simulator(market: Market) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let wallet = use_context::<WalletState>().expect("WalletState not found");

    let (action, set_action) = create_signal(SimulationAction::Supply);
    let (amount, set_amount) = create_signal(String::new());
    let (running, set_running) = create_signal(false);
    let result = create_rw_signal(None::<SimulationResponse>);

    let can_supply = market.is_active && market.can_supply;
    let can_borrow = market.is_active && market.can_borrow;
    let asset_id = market.asset_id.clone();

    let wallet_for_run = wallet.clone();
    let run = move |_| {
        let Some(address) = wallet_for_run.address() else {
            wallet_for_run.open_picker();
            return;
        };

        let amount = amount.get().trim().to_string();
        if amount.is_empty() {
            state.show_error("Enter an amount to simulate");
            return;
        }

        let action = action.get();
        let asset_id = asset_id.clone();
        let state = state.clone();
        set_running.set(true);
        spawn_local(async move {
            match api::simulate(action, &address, &asset_id, &amount).await {
                Ok(response) => result.set(Some(response)),
                Err(e) => {
                    result.set(None);
                    state.show_error(&format!("Simulation failed: {}", e));
                }
            }
            set_running.set(false);
        });
    };

    let tab = move |tab_action: SimulationAction, label: &'static str, enabled: bool| view! {
        <button
            on:click=move |_| {
                set_action.set(tab_action);
                result.set(None);
            }
            disabled=!enabled
            class=move || if action.get() == tab_action {
                "px-4 py-2 font-medium text-primary-400 border-b-2 border-primary-400"
            } else {
                "px-4 py-2 font-medium text-gray-400 hover:text-white disabled:opacity-50"
            }
        >
            {label}
        </button>
    };

    view! {
        <section class="bg-gray-800 rounded-xl p-6">
            <h2 class="text-xl font-semibold mb-4">"Simulate"</h2>

            <div class="flex space-x-2 border-b border-gray-700 mb-4">
                {tab(SimulationAction::Supply, "Supply", can_supply)}
                {tab(SimulationAction::Borrow, "Borrow", can_borrow)}
            </div>

            <div class="flex space-x-2">
                <input
                    type="text"
                    inputmode="decimal"
                    placeholder=format!("Amount in {}", market.symbol)
                    prop:value=move || amount.get()
                    on:input=move |ev| set_amount.set(event_target_value(&ev))
                    class="flex-1 bg-gray-700 rounded-lg px-4 py-3
                           border border-gray-600 focus:border-primary-500 focus:outline-none"
                />
                <button
                    on:click=run
                    disabled=move || running.get()
                    class="px-6 py-3 bg-primary-600 hover:bg-primary-700 disabled:bg-gray-700
                           rounded-lg font-medium transition-colors"
                >
                    {move || {
                        if running.get() {
                            "Simulating..."
                        } else if wallet.state.get().is_connected() {
                            "Simulate"
                        } else {
                            "Connect Wallet"
                        }
                    }}
                </button>
            </div>

            {move || result.get().map(|response| view! { <SimulationResult response=response /> })}
        </section>
    }
}

#[component]
fn SimulationResult(response: SimulationResponse) -> impl IntoView {
    let tx = response.transaction;
    let position = response.simulated_position;

    view! {
        <div class="mt-6 space-y-3 border-t border-gray-700 pt-4">
            <p class="text-gray-300">
                {format!(
                    "Simulated {} of {} {} ({})",
                    tx.action.as_str(),
                    tx.amount,
                    tx.asset_id,
                    format_usd(tx.amount_usd)
                )}
            </p>
            <dl class="space-y-2">
                <Row
                    label="Health factor"
                    value=format!(
                        "{} → {}",
                        format_health_factor(tx.health_factor_before),
                        format_health_factor(tx.health_factor_after)
                    )
                />
                <Row label="Supplied after" value=format_usd(position.total_supplied_usd) />
                <Row label="Borrowed after" value=format_usd(position.total_borrowed_usd) />
                <Row label="Borrow limit used" value=format_ratio(position.borrow_limit_used()) />
            </dl>
        </div>
    }
}
