//! UI Components
//!
//! Reusable Leptos components for the dashboard.

pub mod nav;
pub mod wallet_modal;
pub mod market_table;
pub mod loading;
pub mod toast;

pub use nav::Nav;
pub use wallet_modal::WalletModal;
pub use market_table::MarketTable;
pub use loading::{CardSkeleton, Loading};
pub use toast::Toast;
