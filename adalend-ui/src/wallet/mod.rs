//! Browser Bridge
//!
//! Implementations of the core wallet and storage seams over the
//! browser globals: `window.cardano` and `window.localStorage`. No other
//! module reads those globals directly.

pub mod injected;
pub mod local_storage;

pub use injected::BrowserRegistry;
pub use local_storage::LocalStorage;
