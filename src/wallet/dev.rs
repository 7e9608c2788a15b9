//! In-process development wallets
//!
//! A registry of simulated CIP-30 wallets for the CLI and tests. Each
//! wallet can be told to reject one of its calls, and counts every call
//! made against it.

use async_trait::async_trait;
use serde::Deserialize;
use std::cell::Cell;
use std::rc::Rc;

use super::error::ProviderError;
use super::provider::{ProviderRegistry, WalletApi, WalletProvider};

/// Which call a dev wallet rejects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DevFailure {
    Enable,
    Addresses,
    Balance,
    Disconnect,
}

/// A simulated wallet
#[derive(Debug)]
pub struct DevWallet {
    id: String,
    addresses: Vec<String>,
    balance: String,
    failure: Option<DevFailure>,
    native_disconnect: bool,
    calls: Cell<usize>,
    disconnects: Cell<usize>,
}

impl DevWallet {
    pub fn new(id: impl Into<String>, address: impl Into<String>, balance: impl Into<String>) -> Self {
        let address = address.into();
        Self {
            id: id.into(),
            addresses: if address.is_empty() { Vec::new() } else { vec![address] },
            balance: balance.into(),
            failure: None,
            native_disconnect: false,
            calls: Cell::new(0),
            disconnects: Cell::new(0),
        }
    }

    /// Reject the given call
    pub fn failing(mut self, failure: DevFailure) -> Self {
        self.failure = Some(failure);
        self
    }

    pub fn with_native_disconnect(mut self) -> Self {
        self.native_disconnect = true;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    fn record(&self, call: DevFailure) -> Result<(), ProviderError> {
        self.calls.set(self.calls.get() + 1);
        if self.failure == Some(call) {
            return Err(ProviderError::Rejected(format!(
                "{} rejected the request",
                self.id
            )));
        }
        Ok(())
    }
}

/// Registry over a fixed set of dev wallets
#[derive(Debug, Clone, Default)]
pub struct DevRegistry {
    wallets: Vec<Rc<DevWallet>>,
}

impl DevRegistry {
    pub fn new(wallets: Vec<DevWallet>) -> Self {
        Self {
            wallets: wallets.into_iter().map(Rc::new).collect(),
        }
    }

    fn find(&self, id: &str) -> Option<&Rc<DevWallet>> {
        self.wallets.iter().find(|w| w.id == id)
    }

    /// Calls made against one wallet
    pub fn calls(&self, id: &str) -> usize {
        self.find(id).map_or(0, |w| w.calls.get())
    }

    /// Calls made against all wallets
    pub fn total_calls(&self) -> usize {
        self.wallets.iter().map(|w| w.calls.get()).sum()
    }

    /// Native disconnects that reached a wallet
    pub fn native_disconnects(&self, id: &str) -> usize {
        self.find(id).map_or(0, |w| w.disconnects.get())
    }
}

impl ProviderRegistry for DevRegistry {
    fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    fn lookup(&self, id: &str) -> Option<Box<dyn WalletProvider>> {
        self.find(id)
            .map(|w| Box::new(DevProvider(Rc::clone(w))) as Box<dyn WalletProvider>)
    }
}

struct DevProvider(Rc<DevWallet>);

#[async_trait(?Send)]
impl WalletProvider for DevProvider {
    fn id(&self) -> &str {
        &self.0.id
    }

    async fn enable(&self) -> Result<Box<dyn WalletApi>, ProviderError> {
        self.0.record(DevFailure::Enable)?;
        Ok(Box::new(DevApi(Rc::clone(&self.0))))
    }
}

struct DevApi(Rc<DevWallet>);

#[async_trait(?Send)]
impl WalletApi for DevApi {
    async fn get_used_addresses(&self) -> Result<Vec<String>, ProviderError> {
        self.0.record(DevFailure::Addresses)?;
        Ok(self.0.addresses.clone())
    }

    async fn get_balance(&self) -> Result<String, ProviderError> {
        self.0.record(DevFailure::Balance)?;
        Ok(self.0.balance.clone())
    }

    fn supports_disconnect(&self) -> bool {
        self.0.native_disconnect
    }

    async fn disconnect(&self) -> Result<(), ProviderError> {
        self.0.record(DevFailure::Disconnect)?;
        self.0.disconnects.set(self.0.disconnects.get() + 1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dev_wallet_answers() {
        let registry = DevRegistry::new(vec![DevWallet::new("nami", "addr1test", "42")]);
        assert!(registry.contains("nami"));
        assert!(!registry.contains("eternl"));

        let provider = registry.lookup("nami").unwrap();
        assert_eq!(provider.id(), "nami");

        let api = provider.enable().await.unwrap();
        assert_eq!(api.get_used_addresses().await.unwrap(), vec!["addr1test".to_string()]);
        assert_eq!(api.get_balance().await.unwrap(), "42");
        assert!(!api.supports_disconnect());
        assert_eq!(registry.calls("nami"), 3);
    }

    #[tokio::test]
    async fn test_empty_address_means_unused_account() {
        let registry = DevRegistry::new(vec![DevWallet::new("typhon", "", "0")]);
        let api = registry.lookup("typhon").unwrap().enable().await.unwrap();
        assert!(api.get_used_addresses().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let registry = DevRegistry::new(vec![
            DevWallet::new("flint", "addr1", "1").failing(DevFailure::Addresses)
        ]);
        let api = registry.lookup("flint").unwrap().enable().await.unwrap();
        assert!(matches!(
            api.get_used_addresses().await,
            Err(ProviderError::Rejected(_))
        ));
        assert!(api.get_balance().await.is_ok());
    }
}
