//! Wallet error types
//!
//! Errors raised while enumerating, authorizing and disconnecting
//! browser-injected wallet providers.

use std::fmt;
use thiserror::Error;

/// Failure reported by a provider call itself
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The provider rejected the call (user dismissed the popup, wallet locked, ...)
    #[error("rejected: {0}")]
    Rejected(String),

    /// The provider answered with something we cannot interpret
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// The provider call that failed during a wallet operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderCall {
    Enable,
    UsedAddresses,
    Balance,
    Disconnect,
}

impl fmt::Display for ProviderCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProviderCall::Enable => "enable",
            ProviderCall::UsedAddresses => "getUsedAddresses",
            ProviderCall::Balance => "getBalance",
            ProviderCall::Disconnect => "disconnect",
        };
        f.write_str(name)
    }
}

/// Errors surfaced to the user by the wallet adapter
#[derive(Error, Debug)]
pub enum WalletError {
    /// Requested provider is not in the allow-list or not injected
    #[error("{0} wallet is not available")]
    ProviderUnavailable(String),

    /// Authorization, address or balance call was rejected
    #[error("{provider} wallet {call} failed: {source}")]
    Communication {
        provider: String,
        call: ProviderCall,
        #[source]
        source: ProviderError,
    },

    /// Disconnect requested with no active session
    #[error("Wallet is already disconnected")]
    AlreadyDisconnected,

    /// An authorization request is still waiting on the provider popup
    #[error("Authorization with {0} is already in progress")]
    AuthorizationInProgress(String),
}

impl WalletError {
    pub(crate) fn communication(provider: &str, call: ProviderCall, source: ProviderError) -> Self {
        WalletError::Communication {
            provider: provider.to_string(),
            call,
            source,
        }
    }
}

/// Result type alias for wallet operations
pub type WalletResult<T> = Result<T, WalletError>;
