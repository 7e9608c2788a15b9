//! Fallback market data
//!
//! A static snapshot of the protocol's markets, shown when the backend
//! cannot be reached. Statistics and recommendations are derived from it
//! with the same rules the backend uses.

use super::types::{
    AddressInfo, Market, MarketStats, PositionResponse, Recommendations, UserPosition,
};

struct Seed {
    id: &'static str,
    asset_id: &'static str,
    name: &'static str,
    symbol: &'static str,
    decimals: u32,
    supply_apy: f64,
    borrow_apy: f64,
    total_supply: (&'static str, f64),
    total_borrow: (&'static str, f64),
    liquidity: (&'static str, f64),
    utilization_rate: f64,
    /// collateral factor, liquidation threshold, liquidation penalty, reserve factor
    risk: [f64; 4],
    price_usd: f64,
    price_oracle: &'static str,
}

const SEEDS: &[Seed] = &[
    Seed {
        id: "ada",
        asset_id: "lovelace",
        name: "Cardano",
        symbol: "ADA",
        decimals: 6,
        supply_apy: 3.25,
        borrow_apy: 5.45,
        total_supply: ("25000000000000", 12_000_000.0),
        total_borrow: ("15000000000000", 7_200_000.0),
        liquidity: ("10000000000000", 4_800_000.0),
        utilization_rate: 0.6,
        risk: [0.75, 0.8, 0.05, 0.1],
        price_usd: 0.48,
        price_oracle: "chainlink",
    },
    Seed {
        id: "djed",
        asset_id: "d894897411707efa755a76deb66d26dfd50593f2e70863e1661e98a0.tokenname",
        name: "DJED Stablecoin",
        symbol: "DJED",
        decimals: 6,
        supply_apy: 2.85,
        borrow_apy: 4.75,
        total_supply: ("10000000000000", 10_000_000.0),
        total_borrow: ("6000000000000", 6_000_000.0),
        liquidity: ("4000000000000", 4_000_000.0),
        utilization_rate: 0.6,
        risk: [0.9, 0.95, 0.03, 0.05],
        price_usd: 1.0,
        price_oracle: "chainlink",
    },
    Seed {
        id: "shen",
        asset_id: "d894897411707efa755a76deb66d26dfd50593f2e70863e1661e98a0.shen",
        name: "SHEN",
        symbol: "SHEN",
        decimals: 6,
        supply_apy: 4.15,
        borrow_apy: 6.25,
        total_supply: ("8000000000000", 7_600_000.0),
        total_borrow: ("3500000000000", 3_325_000.0),
        liquidity: ("4500000000000", 4_275_000.0),
        utilization_rate: 0.4375,
        risk: [0.6, 0.65, 0.08, 0.15],
        price_usd: 0.95,
        price_oracle: "chainlink",
    },
    Seed {
        id: "iusd",
        asset_id: "f66d78b4a3cb3d37afa0ec36461e51ecbde00f26c8f0a68f94b69880.iUSD",
        name: "Indigo USD",
        symbol: "iUSD",
        decimals: 6,
        supply_apy: 3.0,
        borrow_apy: 4.8,
        total_supply: ("5000000000000", 5_000_000.0),
        total_borrow: ("2500000000000", 2_500_000.0),
        liquidity: ("2500000000000", 2_500_000.0),
        utilization_rate: 0.5,
        risk: [0.85, 0.9, 0.04, 0.08],
        price_usd: 1.0,
        price_oracle: "chainlink",
    },
    Seed {
        id: "hosky",
        asset_id: "a0028f350aaabe0545fdcb56b039bfb08e4bb4d8c4d7c3c7d481c235.HOSKY",
        name: "Hosky Token",
        symbol: "HOSKY",
        decimals: 6,
        supply_apy: 7.5,
        borrow_apy: 9.25,
        total_supply: ("1000000000000000", 100_000.0),
        total_borrow: ("300000000000000", 30_000.0),
        liquidity: ("700000000000000", 70_000.0),
        utilization_rate: 0.3,
        risk: [0.3, 0.35, 0.15, 0.2],
        price_usd: 0.0001,
        price_oracle: "dex",
    },
    Seed {
        id: "milk",
        asset_id: "8a1cfae21368b8bebbbed9800fec304e95cce39a2a57dc35e2e3ebaa.MILK",
        name: "Milk Coin",
        symbol: "MILK",
        decimals: 6,
        supply_apy: 5.85,
        borrow_apy: 7.95,
        total_supply: ("15000000000000", 1_800_000.0),
        total_borrow: ("7500000000000", 900_000.0),
        liquidity: ("7500000000000", 900_000.0),
        utilization_rate: 0.5,
        risk: [0.5, 0.55, 0.1, 0.15],
        price_usd: 0.12,
        price_oracle: "dex",
    },
    Seed {
        id: "wbtc",
        asset_id: "57fca08abbaddee36da742a839f7d83a7e1d2419f1507fcbf39165724c53454c.WBTC",
        name: "Wrapped Bitcoin",
        symbol: "WBTC",
        decimals: 8,
        supply_apy: 1.85,
        borrow_apy: 3.95,
        total_supply: ("50000000000", 26_000_000.0),
        total_borrow: ("20000000000", 10_400_000.0),
        liquidity: ("30000000000", 15_600_000.0),
        utilization_rate: 0.4,
        risk: [0.8, 0.85, 0.05, 0.1],
        price_usd: 52_000.0,
        price_oracle: "chainlink",
    },
    Seed {
        id: "weth",
        asset_id: "57fca08abbaddee36da742a839f7d83a7e1d2419f1507fcbf39165724c53454c.WETH",
        name: "Wrapped Ethereum",
        symbol: "WETH",
        decimals: 18,
        supply_apy: 2.25,
        borrow_apy: 4.25,
        total_supply: ("2500000000000000000000", 7_500_000.0),
        total_borrow: ("1000000000000000000000", 3_000_000.0),
        liquidity: ("1500000000000000000000", 4_500_000.0),
        utilization_rate: 0.4,
        risk: [0.75, 0.8, 0.05, 0.1],
        price_usd: 3000.0,
        price_oracle: "chainlink",
    },
];

impl Seed {
    fn to_market(&self) -> Market {
        let [collateral_factor, liquidation_threshold, liquidation_penalty, reserve_factor] =
            self.risk;

        Market {
            id: self.id.to_string(),
            asset_id: self.asset_id.to_string(),
            name: self.name.to_string(),
            symbol: self.symbol.to_string(),
            decimals: self.decimals,
            logo_url: None,
            supply_apy: self.supply_apy,
            borrow_apy: self.borrow_apy,
            total_supply: self.total_supply.0.to_string(),
            total_supply_usd: self.total_supply.1,
            total_borrow: self.total_borrow.0.to_string(),
            total_borrow_usd: self.total_borrow.1,
            liquidity: self.liquidity.0.to_string(),
            liquidity_usd: self.liquidity.1,
            utilization_rate: self.utilization_rate,
            collateral_factor,
            liquidation_threshold,
            liquidation_penalty,
            reserve_factor,
            is_active: true,
            can_supply: true,
            can_borrow: true,
            can_use_as_collateral: true,
            price_usd: self.price_usd,
            price_oracle: self.price_oracle.to_string(),
            created_at: None,
            updated_at: None,
        }
    }
}

/// All fallback markets
pub fn fallback_markets() -> Vec<Market> {
    SEEDS.iter().map(Seed::to_market).collect()
}

/// A fallback market by id
pub fn fallback_market(id: &str) -> Option<Market> {
    SEEDS.iter().find(|s| s.id == id).map(Seed::to_market)
}

pub fn fallback_stats() -> MarketStats {
    MarketStats::from_markets(&fallback_markets())
}

pub fn fallback_recommendations() -> Recommendations {
    Recommendations::from_markets(&fallback_markets())
}

/// Empty position and unknown chain data for an address
pub fn fallback_position(address: &str) -> PositionResponse {
    PositionResponse {
        position: UserPosition::empty(address),
        address_info: AddressInfo::unknown(address),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_fallback_markets_are_consistent() {
        let markets = fallback_markets();
        assert_eq!(markets.len(), 8);

        let ids: HashSet<&str> = markets.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids.len(), markets.len());

        for market in &markets {
            assert!(market.collateral_factor < market.liquidation_threshold);
            assert!((0.0..=1.0).contains(&market.utilization_rate));
        }
    }

    #[test]
    fn test_fallback_market_lookup() {
        let ada = fallback_market("ada").unwrap();
        assert_eq!(ada.asset_id, "lovelace");
        assert_eq!(ada.total_supply_tokens(), 25_000_000.0);
        assert!(fallback_market("doge").is_none());
    }

    #[test]
    fn test_fallback_summaries() {
        assert_eq!(fallback_stats().markets_count, 8);
        assert_eq!(
            fallback_recommendations().overall_recommendation.as_deref(),
            Some("Market conditions are balanced - consider both supply and borrow options")
        );
    }

    #[test]
    fn test_fallback_position_is_empty() {
        let response = fallback_position("addr1xyz");
        assert_eq!(response.position.user_address, "addr1xyz");
        assert!(response.position.supplies.is_empty());
        assert!(response.position.health_factor.is_none());
        assert_eq!(response.address_info.balance.lovelace, 0);
    }
}
