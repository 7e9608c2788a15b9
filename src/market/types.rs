//! Lending market data types
//!
//! Shapes of the REST backend's JSON. Token amounts travel as decimal
//! strings in the asset's smallest unit; USD values and rates as floats.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ============================================
// MARKETS
// ============================================

/// A lending/borrowing market for one asset
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Market {
    pub id: String,
    /// Policy id + asset name, or `lovelace` for ADA
    pub asset_id: String,
    pub name: String,
    pub symbol: String,
    pub decimals: u32,
    #[serde(default)]
    pub logo_url: Option<String>,

    pub supply_apy: f64,
    pub borrow_apy: f64,
    pub total_supply: String,
    pub total_supply_usd: f64,
    pub total_borrow: String,
    pub total_borrow_usd: f64,
    pub liquidity: String,
    pub liquidity_usd: f64,
    /// 0-1
    pub utilization_rate: f64,

    /// 0-1
    pub collateral_factor: f64,
    /// 0-1
    pub liquidation_threshold: f64,
    /// 0-1
    pub liquidation_penalty: f64,
    /// 0-1
    pub reserve_factor: f64,

    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default = "default_true")]
    pub can_supply: bool,
    #[serde(default = "default_true")]
    pub can_borrow: bool,
    #[serde(default = "default_true")]
    pub can_use_as_collateral: bool,

    pub price_usd: f64,
    pub price_oracle: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDateTime>,
}

fn default_true() -> bool {
    true
}

impl Market {
    /// Total supplied, in whole tokens
    pub fn total_supply_tokens(&self) -> f64 {
        scale_amount(&self.total_supply, self.decimals)
    }

    /// Total borrowed, in whole tokens
    pub fn total_borrow_tokens(&self) -> f64 {
        scale_amount(&self.total_borrow, self.decimals)
    }

    /// Available liquidity, in whole tokens
    pub fn liquidity_tokens(&self) -> f64 {
        scale_amount(&self.liquidity, self.decimals)
    }
}

/// Convert a smallest-unit amount string to whole tokens.
///
/// Unparseable amounts count as zero.
pub fn scale_amount(amount: &str, decimals: u32) -> f64 {
    let raw = amount.trim().parse::<f64>().unwrap_or(0.0);
    raw / 10f64.powi(decimals as i32)
}

/// Aggregate statistics over all markets
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MarketStats {
    pub total_supply: f64,
    pub total_borrow: f64,
    pub markets_count: usize,
    pub avg_supply_rate: f64,
    pub avg_borrow_rate: f64,
    #[serde(default)]
    pub top_markets: Vec<TopMarket>,
}

/// Entry in [`MarketStats::top_markets`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopMarket {
    pub id: String,
    pub asset_id: String,
    pub name: String,
    pub total_supply: String,
}

/// Supply/borrow suggestions derived from current market conditions
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Recommendations {
    #[serde(default)]
    pub best_supply_opportunities: Vec<SupplyOpportunity>,
    #[serde(default)]
    pub best_borrow_opportunities: Vec<BorrowOpportunity>,
    #[serde(default)]
    pub safest_supply_markets: Vec<SafeMarket>,
    #[serde(default)]
    pub overall_recommendation: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SupplyOpportunity {
    pub id: String,
    pub name: String,
    pub supply_apy: f64,
    pub total_supply: String,
    pub liquidity: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BorrowOpportunity {
    pub id: String,
    pub name: String,
    pub borrow_apy: f64,
    pub total_borrow: String,
    pub liquidity: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SafeMarket {
    pub id: String,
    pub name: String,
    pub collateral_factor: f64,
    pub supply_apy: f64,
    pub liquidity: String,
}

// ============================================
// USERS
// ============================================

/// A user's supplies and borrows across all markets
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserPosition {
    pub user_address: String,
    #[serde(default)]
    pub total_supplied_usd: f64,
    #[serde(default)]
    pub total_borrowed_usd: f64,
    #[serde(default)]
    pub borrow_limit_usd: f64,
    /// `None` means infinite (no borrows)
    #[serde(default)]
    pub health_factor: Option<f64>,
    #[serde(default)]
    pub supplies: Vec<SupplyPosition>,
    #[serde(default)]
    pub borrows: Vec<BorrowPosition>,
}

impl UserPosition {
    /// Empty position for an address with no activity
    pub fn empty(address: impl Into<String>) -> Self {
        Self {
            user_address: address.into(),
            ..Self::default()
        }
    }

    /// Share of the borrow limit in use, 0-1
    pub fn borrow_limit_used(&self) -> f64 {
        if self.borrow_limit_usd > 0.0 {
            self.total_borrowed_usd / self.borrow_limit_usd
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SupplyPosition {
    pub asset_id: String,
    pub amount: String,
    pub amount_usd: f64,
    pub apy: f64,
    #[serde(default)]
    pub used_as_collateral: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BorrowPosition {
    pub asset_id: String,
    pub amount: String,
    pub amount_usd: f64,
    pub apy: f64,
}

/// On-chain summary of an address
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AddressInfo {
    pub address: String,
    #[serde(default)]
    pub balance: AddressBalance,
    #[serde(default)]
    pub transaction_count: u64,
    #[serde(default)]
    pub utxo_count: u64,
    #[serde(default)]
    pub stake_address: Option<String>,
}

impl AddressInfo {
    /// Placeholder used when the chain cannot be queried
    pub fn unknown(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AddressBalance {
    pub lovelace: u64,
    pub ada: f64,
}

/// `GET /users/{address}` response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PositionResponse {
    pub position: UserPosition,
    pub address_info: AddressInfo,
}

// ============================================
// SIMULATIONS
// ============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimulationAction {
    Supply,
    Borrow,
}

impl SimulationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SimulationAction::Supply => "supply",
            SimulationAction::Borrow => "borrow",
        }
    }
}

/// Result of a simulated supply or borrow
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationResponse {
    pub success: bool,
    pub simulated_position: UserPosition,
    pub transaction: SimulatedTransaction,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulatedTransaction {
    pub action: SimulationAction,
    pub asset_id: String,
    pub amount: String,
    pub amount_usd: f64,
    #[serde(default)]
    pub health_factor_before: Option<f64>,
    #[serde(default)]
    pub health_factor_after: Option<f64>,
    pub timestamp: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_from_backend_json() {
        let json = r#"{
            "id": "ada",
            "asset_id": "lovelace",
            "name": "Cardano",
            "symbol": "ADA",
            "decimals": 6,
            "logo_url": null,
            "supply_apy": 3.25,
            "borrow_apy": 5.45,
            "total_supply": "25000000000000",
            "total_supply_usd": 12000000,
            "total_borrow": "15000000000000",
            "total_borrow_usd": 7200000,
            "liquidity": "10000000000000",
            "liquidity_usd": 4800000,
            "utilization_rate": 0.6,
            "collateral_factor": 0.75,
            "liquidation_threshold": 0.8,
            "liquidation_penalty": 0.05,
            "reserve_factor": 0.1,
            "price_usd": 0.48,
            "price_oracle": "chainlink",
            "created_at": "2024-05-01T10:15:30.123456"
        }"#;

        let market: Market = serde_json::from_str(json).unwrap();
        assert_eq!(market.symbol, "ADA");
        assert!(market.is_active && market.can_borrow);
        assert_eq!(market.total_supply_tokens(), 25_000_000.0);
        assert!(market.created_at.is_some());
        assert!(market.updated_at.is_none());
    }

    #[test]
    fn test_null_health_factor_is_infinite() {
        let json = r#"{
            "position": {"user_address": "addr1x", "health_factor": null, "supplies": [], "borrows": []},
            "address_info": {"address": "addr1x", "balance": {"lovelace": 2500000, "ada": 2.5},
                             "transaction_count": 4, "utxo_count": 2, "stake_address": null}
        }"#;

        let response: PositionResponse = serde_json::from_str(json).unwrap();
        assert!(response.position.health_factor.is_none());
        assert_eq!(response.position.borrow_limit_used(), 0.0);
        assert_eq!(response.address_info.balance.lovelace, 2_500_000);
    }

    #[test]
    fn test_simulation_response() {
        let json = r#"{
            "success": true,
            "simulated_position": {
                "user_address": "addr1x",
                "total_supplied_usd": 48.0,
                "borrow_limit_usd": 36.0,
                "supplies": [{"asset_id": "lovelace", "amount": "100", "amount_usd": 48.0,
                              "apy": 3.25, "used_as_collateral": true}]
            },
            "transaction": {
                "action": "supply",
                "asset_id": "lovelace",
                "amount": "100",
                "amount_usd": 48.0,
                "health_factor_before": null,
                "health_factor_after": null,
                "timestamp": "2024-05-01T10:15:30.123456"
            }
        }"#;

        let response: SimulationResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.transaction.action, SimulationAction::Supply);
        assert_eq!(response.simulated_position.supplies.len(), 1);
        assert!(response.simulated_position.borrows.is_empty());
    }

    #[test]
    fn test_scale_amount() {
        assert_eq!(scale_amount("2500000000000000000000", 18), 2500.0);
        assert_eq!(scale_amount("garbage", 6), 0.0);
    }
}
