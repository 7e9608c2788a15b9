//! Market Table Component
//!
//! Sortable table of lending markets. Rows link to the asset page.

use leptos::*;
use leptos_router::use_navigate;
use std::cmp::Ordering;

use adalend::market::{format_apy, format_usd, Market};

/// Sortable column
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortKey {
    TotalSupply,
    SupplyApy,
    TotalBorrow,
    BorrowApy,
}

impl SortKey {
    fn value(&self, market: &Market) -> f64 {
        match self {
            SortKey::TotalSupply => market.total_supply_usd,
            SortKey::SupplyApy => market.supply_apy,
            SortKey::TotalBorrow => market.total_borrow_usd,
            SortKey::BorrowApy => market.borrow_apy,
        }
    }
}

/// Sort markets in place by a column
pub fn sort_markets(markets: &mut [Market], key: SortKey, ascending: bool) {
    markets.sort_by(|a, b| {
        let ordering = key
            .value(a)
            .partial_cmp(&key.value(b))
            .unwrap_or(Ordering::Equal);
        if ascending {
            ordering
        } else {
            ordering.reverse()
        }
    });
}

/// Market table component
#[component]
pub fn MarketTable(
    #[prop(into)]
    title: String,
    #[prop(into)]
    markets: Signal<Vec<Market>>,
) -> impl IntoView {
    let (sort, set_sort) = create_signal((SortKey::TotalSupply, false));

    let sorted = create_memo(move |_| {
        let (key, ascending) = sort.get();
        let mut markets = markets.get();
        sort_markets(&mut markets, key, ascending);
        markets
    });

    // Clicking the active column flips direction
    let request_sort = move |key: SortKey| {
        set_sort.update(|(current, ascending)| {
            if *current == key {
                *ascending = !*ascending;
            } else {
                *current = key;
                *ascending = false;
            }
        });
    };

    let indicator = move |key: SortKey| {
        let (current, ascending) = sort.get();
        match (current == key, ascending) {
            (false, _) => "",
            (true, true) => " ↑",
            (true, false) => " ↓",
        }
    };

    let header = move |key: SortKey, label: &'static str| view! {
        <th
            class="px-6 py-3 text-right text-xs font-medium text-gray-400 uppercase tracking-wider cursor-pointer hover:text-white"
            on:click=move |_| request_sort(key)
        >
            {label}{move || indicator(key)}
        </th>
    };

    view! {
        <section class="bg-gray-800 rounded-xl overflow-hidden">
            <div class="border-b border-gray-700 px-6 py-4">
                <h2 class="text-lg font-semibold">{title}</h2>
            </div>
            <div class="overflow-x-auto">
                <table class="min-w-full">
                    <thead>
                        <tr class="border-b border-gray-700">
                            <th class="px-6 py-3 text-left text-xs font-medium text-gray-400 uppercase tracking-wider">
                                "Asset"
                            </th>
                            {header(SortKey::TotalSupply, "Total Supply")}
                            {header(SortKey::SupplyApy, "Supply APY")}
                            {header(SortKey::TotalBorrow, "Total Borrowed")}
                            {header(SortKey::BorrowApy, "Borrow APY")}
                        </tr>
                    </thead>
                    <tbody>
                        <For
                            each=move || sorted.get()
                            key=|market| market.id.clone()
                            children=move |market| view! { <MarketRow market=market /> }
                        />
                    </tbody>
                </table>
            </div>
        </section>
    }
}

#[component]
fn MarketRow(market: Market) -> impl IntoView {
    let navigate = use_navigate();
    let href = format!("/asset/{}", market.id);

    view! {
        <tr
            class="border-b border-gray-700 hover:bg-gray-750 cursor-pointer transition"
            on:click=move |_| navigate(&href, Default::default())
        >
            <td class="px-6 py-4">
                <div class="flex items-center space-x-3">
                    {market.logo_url.clone().map(|url| view! {
                        <img src=url alt=market.symbol.clone() class="w-8 h-8 rounded-full" />
                    })}
                    <div>
                        <div class="font-medium">{market.name.clone()}</div>
                        <div class="text-sm text-gray-400">{market.symbol.clone()}</div>
                    </div>
                </div>
            </td>
            <td class="px-6 py-4 text-right">{format_usd(market.total_supply_usd)}</td>
            <td class="px-6 py-4 text-right text-green-400">{format_apy(market.supply_apy)}</td>
            <td class="px-6 py-4 text-right">{format_usd(market.total_borrow_usd)}</td>
            <td class="px-6 py-4 text-right text-purple-400">{format_apy(market.borrow_apy)}</td>
        </tr>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adalend::market::fallback_markets;

    #[test]
    fn test_sort_by_supply_apy() {
        let mut markets = fallback_markets();

        sort_markets(&mut markets, SortKey::SupplyApy, false);
        let rates: Vec<f64> = markets.iter().map(|m| m.supply_apy).collect();
        assert!(rates.windows(2).all(|w| w[0] >= w[1]));

        sort_markets(&mut markets, SortKey::SupplyApy, true);
        let rates: Vec<f64> = markets.iter().map(|m| m.supply_apy).collect();
        assert!(rates.windows(2).all(|w| w[0] <= w[1]));
    }
}
