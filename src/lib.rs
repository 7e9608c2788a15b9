//! # AdaLend
//!
//! Dashboard core for a Cardano lending protocol: market listings, user
//! positions and a CIP-30 wallet connection that survives a reload.
//!
//! ## Features
//!
//! - **Wallet adapter**: enumerate, authorize and disconnect injected wallets
//! - **Session persistence**: display-only projection in a `localStorage`-shaped store
//! - **Market data**: typed DTOs for the lending API with static fallback data
//! - **REST client** (`native`): `reqwest` client with per-endpoint fallback
//!
//! ## Modules
//!
//! - [`wallet`]: provider seam, adapter, session and connection holder
//! - [`store`]: key/value backends and the session store
//! - [`market`]: DTOs, fallback data, statistics and recommendations
//! - [`client`]: lending API client (native only)
//! - [`config`]: TOML configuration (native only)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use adalend::store::{FileStore, SessionStore};
//! use adalend::wallet::{DevRegistry, DevWallet, WalletAdapter, WalletConnection};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = DevRegistry::new(vec![DevWallet::new("nami", "addr1qx2f...", "12500000")]);
//!     let store = SessionStore::new(FileStore::in_dir("./data"));
//!
//!     // Picks up a connection persisted by an earlier run
//!     let connection = WalletConnection::restore(WalletAdapter::new(registry), store);
//!
//!     let projection = connection.connect("nami").await?;
//!     println!("{} {} ADA", projection.display_address, projection.display_balance);
//!
//!     connection.disconnect().await?;
//!     Ok(())
//! }
//! ```

pub mod market;
pub mod store;
pub mod wallet;

#[cfg(feature = "native")]
pub mod client;
#[cfg(feature = "native")]
pub mod config;

// Re-export top-level types for convenience
pub use wallet::{
    format_address, format_balance, list_available_providers, ConnectionState, ProviderError,
    ProviderRegistry, SessionProjection, WalletAdapter, WalletApi, WalletConnection,
    WalletError, WalletProvider, WalletResult, WalletSession,
};

pub use store::{KeyValueStore, MemoryStore, SessionStore, StoreError, StoreResult, SESSION_KEY};

pub use market::{
    DataSource, Fetched, Market, MarketStats, PositionResponse, Recommendations,
    SimulationResponse, UserPosition,
};

#[cfg(feature = "native")]
pub use store::FileStore;

#[cfg(feature = "native")]
pub use client::{ClientConfig, ClientError, ClientResult, LendingClient};

#[cfg(feature = "native")]
pub use config::{Config, ConfigError};
