//! Wallet Session
//!
//! The in-memory record of an authorized wallet and the display-only
//! projection of it that survives a reload.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::format::{format_address, format_balance};
use super::provider::WalletApi;

/// Connection lifecycle: `Disconnected -> Authorizing -> Connected -> Disconnected`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Authorizing { provider_id: String },
    Connected { provider_id: String },
}

impl ConnectionState {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected { .. })
    }

    pub fn is_authorizing(&self) -> bool {
        matches!(self, ConnectionState::Authorizing { .. })
    }

    /// Provider involved in the current state, if any
    pub fn provider_id(&self) -> Option<&str> {
        match self {
            ConnectionState::Disconnected => None,
            ConnectionState::Authorizing { provider_id }
            | ConnectionState::Connected { provider_id } => Some(provider_id),
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Disconnected => write!(f, "disconnected"),
            ConnectionState::Authorizing { provider_id } => {
                write!(f, "authorizing with {}", provider_id)
            }
            ConnectionState::Connected { provider_id } => write!(f, "connected to {}", provider_id),
        }
    }
}

/// An authorized wallet connection.
///
/// Holds the provider's account capability, so it is deliberately not
/// `Serialize`. Persist [`WalletSession::projection`] instead.
pub struct WalletSession {
    id: u64,
    provider_id: String,
    api: Box<dyn WalletApi>,
    address: Option<String>,
    balance_minor_units: String,
}

impl WalletSession {
    pub(crate) fn new(
        id: u64,
        provider_id: String,
        api: Box<dyn WalletApi>,
        address: Option<String>,
        balance_minor_units: String,
    ) -> Self {
        Self {
            id,
            provider_id,
            api,
            address,
            balance_minor_units,
        }
    }

    /// Adapter-assigned id, unique per authorization
    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    pub fn provider_id(&self) -> &str {
        &self.provider_id
    }

    /// First used address reported by the wallet
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    /// Raw balance in minor units
    pub fn balance_minor_units(&self) -> &str {
        &self.balance_minor_units
    }

    pub(crate) fn api(&self) -> &dyn WalletApi {
        self.api.as_ref()
    }

    /// Display fields that may be written to persistent storage
    pub fn projection(&self) -> SessionProjection {
        SessionProjection {
            connected: true,
            address: self.address.clone(),
            display_address: self.address.as_deref().map(format_address).unwrap_or_default(),
            display_balance: format_balance(Some(&self.balance_minor_units)),
            name: self.provider_id.clone(),
        }
    }
}

impl fmt::Debug for WalletSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletSession")
            .field("id", &self.id)
            .field("provider_id", &self.provider_id)
            .field("address", &self.address)
            .field("balance_minor_units", &self.balance_minor_units)
            .finish_non_exhaustive()
    }
}

/// The persisted record of a connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionProjection {
    pub connected: bool,
    pub address: Option<String>,
    pub display_address: String,
    pub display_balance: String,
    /// Provider id
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::error::ProviderError;
    use async_trait::async_trait;

    struct NullApi;

    #[async_trait(?Send)]
    impl WalletApi for NullApi {
        async fn get_used_addresses(&self) -> Result<Vec<String>, ProviderError> {
            Ok(Vec::new())
        }

        async fn get_balance(&self) -> Result<String, ProviderError> {
            Ok("0".to_string())
        }
    }

    #[test]
    fn test_projection_fields() {
        let session = WalletSession::new(
            1,
            "nami".to_string(),
            Box::new(NullApi),
            Some("addr1q9ld7tzqxyzabc0123456789lmnop7tzq".to_string()),
            "2500000".to_string(),
        );

        let projection = session.projection();
        assert!(projection.connected);
        assert_eq!(projection.display_address, "addr1q...op7tzq");
        assert_eq!(projection.display_balance, "2.50");
        assert_eq!(projection.name, "nami");
    }

    #[test]
    fn test_projection_serializes_display_fields_only() {
        let session = WalletSession::new(
            2,
            "eternl".to_string(),
            Box::new(NullApi),
            None,
            "0".to_string(),
        );

        let json = serde_json::to_value(session.projection()).unwrap();
        let object = json.as_object().unwrap();
        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();

        assert_eq!(
            keys,
            vec!["address", "connected", "displayAddress", "displayBalance", "name"]
        );
        assert!(object["address"].is_null());
        assert_eq!(object["displayAddress"], "");
        assert_eq!(object["displayBalance"], "0");
    }

    #[test]
    fn test_state_display() {
        let state = ConnectionState::Authorizing {
            provider_id: "flint".to_string(),
        };
        assert!(state.is_authorizing());
        assert_eq!(state.provider_id(), Some("flint"));
        assert_eq!(state.to_string(), "authorizing with flint");
        assert_eq!(ConnectionState::default(), ConnectionState::Disconnected);
    }
}
