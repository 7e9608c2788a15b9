//! State Management
//!
//! Market data signals and the wallet connection holder.

pub mod global;
pub mod wallet;

pub use global::{provide_global_state, GlobalState};
pub use wallet::{provide_wallet_state, WalletState};
