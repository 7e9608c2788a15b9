//! Wallet Adapter
//!
//! Connects the dashboard to CIP-30 wallets injected by browser
//! extensions under `window.cardano`.
//!
//! ## Components
//!
//! - **provider**: `WalletProvider` / `WalletApi` / `ProviderRegistry` traits and the allow-list
//! - **adapter**: `WalletAdapter`, which enumerates, authorizes and disconnects providers
//! - **session**: the live `WalletSession` and its persistable `SessionProjection`
//! - **connection**: `WalletConnection`, the state holder the UI reads
//! - **format**: address and balance display formatting
//! - **balance**: CIP-30 CBOR balance decoding
//! - **dev**: simulated wallets for the CLI and tests
//!
//! ## Lifecycle
//!
//! ```text
//! Disconnected --authorize--> Authorizing --ok--> Connected --disconnect--> Disconnected
//!                                  |
//!                                  +--error--> Disconnected
//! ```

mod adapter;
mod balance;
mod connection;
mod dev;
mod error;
mod format;
mod provider;
mod session;

pub use adapter::WalletAdapter;
pub use balance::{decode_cbor_coin, normalize_cip30_balance};
pub use connection::WalletConnection;
pub use dev::{DevFailure, DevRegistry, DevWallet};
pub use error::{ProviderCall, ProviderError, WalletError, WalletResult};
pub use format::{format_address, format_balance, MINOR_UNITS_PER_MAJOR};
pub use provider::{
    known_wallet, list_available_providers, supported_wallet_ids, wallet_display_name,
    KnownWallet, ProviderRegistry, WalletApi, WalletProvider, SUPPORTED_WALLETS,
};
pub use session::{ConnectionState, SessionProjection, WalletSession};
