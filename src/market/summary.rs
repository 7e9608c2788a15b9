//! Market statistics and recommendations
//!
//! The same aggregation the backend performs, run locally over the
//! fallback market set when the backend is unreachable.

use std::cmp::Ordering;

use super::types::{
    BorrowOpportunity, Market, MarketStats, Recommendations, SafeMarket, SupplyOpportunity,
    TopMarket,
};

const TOP_MARKETS: usize = 5;
const RECOMMENDATIONS_PER_LIST: usize = 3;

const HIGH_SUPPLY_RATE: f64 = 5.0;
const LOW_SUPPLY_RATE: f64 = 2.0;

fn amount(value: &str) -> f64 {
    value.trim().parse::<f64>().unwrap_or(0.0)
}

fn ascending(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

fn descending(a: f64, b: f64) -> Ordering {
    ascending(b, a)
}

/// Mean supply APY over markets with a non-zero supply
fn average_supply_rate(markets: &[Market]) -> f64 {
    average(
        markets
            .iter()
            .filter(|m| amount(&m.total_supply) > 0.0)
            .map(|m| m.supply_apy),
    )
}

fn average(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

impl MarketStats {
    pub fn from_markets(markets: &[Market]) -> Self {
        if markets.is_empty() {
            return Self::default();
        }

        let mut by_supply: Vec<&Market> = markets.iter().collect();
        by_supply.sort_by(|a, b| descending(amount(&a.total_supply), amount(&b.total_supply)));

        Self {
            total_supply: markets.iter().map(|m| amount(&m.total_supply)).sum(),
            total_borrow: markets.iter().map(|m| amount(&m.total_borrow)).sum(),
            markets_count: markets.len(),
            avg_supply_rate: average_supply_rate(markets),
            avg_borrow_rate: average(
                markets
                    .iter()
                    .filter(|m| amount(&m.total_borrow) > 0.0)
                    .map(|m| m.borrow_apy),
            ),
            top_markets: by_supply
                .into_iter()
                .take(TOP_MARKETS)
                .map(|m| TopMarket {
                    id: m.id.clone(),
                    asset_id: m.asset_id.clone(),
                    name: m.name.clone(),
                    total_supply: m.total_supply.clone(),
                })
                .collect(),
        }
    }
}

impl Recommendations {
    pub fn from_markets(markets: &[Market]) -> Self {
        if markets.is_empty() {
            return Self::default();
        }

        let mut suppliable: Vec<&Market> = markets
            .iter()
            .filter(|m| m.is_active && m.can_supply)
            .collect();
        let mut borrowable: Vec<&Market> = markets
            .iter()
            .filter(|m| m.is_active && m.can_borrow)
            .collect();

        suppliable.sort_by(|a, b| descending(a.supply_apy, b.supply_apy));
        let best_supply_opportunities = suppliable
            .iter()
            .take(RECOMMENDATIONS_PER_LIST)
            .map(|m| SupplyOpportunity {
                id: m.id.clone(),
                name: m.name.clone(),
                supply_apy: m.supply_apy,
                total_supply: m.total_supply.clone(),
                liquidity: m.liquidity.clone(),
            })
            .collect();

        borrowable.sort_by(|a, b| ascending(a.borrow_apy, b.borrow_apy));
        let best_borrow_opportunities = borrowable
            .iter()
            .take(RECOMMENDATIONS_PER_LIST)
            .map(|m| BorrowOpportunity {
                id: m.id.clone(),
                name: m.name.clone(),
                borrow_apy: m.borrow_apy,
                total_borrow: m.total_borrow.clone(),
                liquidity: m.liquidity.clone(),
            })
            .collect();

        suppliable.sort_by(|a, b| descending(a.collateral_factor, b.collateral_factor));
        let safest_supply_markets = suppliable
            .iter()
            .take(RECOMMENDATIONS_PER_LIST)
            .map(|m| SafeMarket {
                id: m.id.clone(),
                name: m.name.clone(),
                collateral_factor: m.collateral_factor,
                supply_apy: m.supply_apy,
                liquidity: m.liquidity.clone(),
            })
            .collect();

        Self {
            best_supply_opportunities,
            best_borrow_opportunities,
            safest_supply_markets,
            overall_recommendation: Some(overall_recommendation(average_supply_rate(markets))),
        }
    }
}

/// One-line market outlook for an average supply APY
pub fn overall_recommendation(avg_supply_rate: f64) -> String {
    if avg_supply_rate > HIGH_SUPPLY_RATE {
        "Market supply rates are high - good time to supply assets".to_string()
    } else if avg_supply_rate < LOW_SUPPLY_RATE {
        "Market supply rates are low - might be better to look for other opportunities".to_string()
    } else {
        "Market conditions are balanced - consider both supply and borrow options".to_string()
    }
}
