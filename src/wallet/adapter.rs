//! Wallet Adapter
//!
//! Bridges the provider registry and the application's connection state.
//! All provider calls are awaited sequentially; the adapter's own state is
//! only borrowed between awaits, never across one.

use std::cell::{Cell, RefCell};

use super::error::{ProviderCall, WalletError, WalletResult};
use super::provider::{
    list_available_providers, supported_wallet_ids, ProviderRegistry, WalletProvider,
};
use super::session::{ConnectionState, WalletSession};

/// Enumerates, authorizes and disconnects injected wallet providers
pub struct WalletAdapter<R> {
    registry: R,
    allow_list: Vec<String>,
    state: RefCell<ConnectionState>,
    /// Id of the session that owns the `Connected` state
    live_session: Cell<Option<u64>>,
    next_session: Cell<u64>,
}

impl<R: ProviderRegistry> WalletAdapter<R> {
    /// Create an adapter over the default allow-list
    pub fn new(registry: R) -> Self {
        Self::with_allow_list(registry, supported_wallet_ids())
    }

    /// Create an adapter that only considers the given provider ids
    pub fn with_allow_list(registry: R, allow_list: Vec<String>) -> Self {
        Self {
            registry,
            allow_list,
            state: RefCell::new(ConnectionState::Disconnected),
            live_session: Cell::new(None),
            next_session: Cell::new(1),
        }
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn allow_list(&self) -> &[String] {
        &self.allow_list
    }

    /// Current lifecycle state
    pub fn state(&self) -> ConnectionState {
        self.state.borrow().clone()
    }

    /// Allow-listed providers that are currently injected
    pub fn list_available_providers(&self) -> Vec<String> {
        list_available_providers(&self.registry, &self.allow_list)
    }

    /// Request authorization from a provider and read its account.
    ///
    /// No provider method is invoked when `provider_id` is unavailable.
    /// Any failed provider call leaves the adapter `Disconnected`. A
    /// successful one supersedes any earlier session.
    pub async fn authorize(&self, provider_id: &str) -> WalletResult<WalletSession> {
        if let ConnectionState::Authorizing { provider_id: pending } = &*self.state.borrow() {
            return Err(WalletError::AuthorizationInProgress(pending.clone()));
        }

        if !self.list_available_providers().iter().any(|id| id == provider_id) {
            tracing::warn!(provider = provider_id, "Wallet provider not available");
            return Err(WalletError::ProviderUnavailable(provider_id.to_string()));
        }

        let provider = self
            .registry
            .lookup(provider_id)
            .ok_or_else(|| WalletError::ProviderUnavailable(provider_id.to_string()))?;

        self.set_state(ConnectionState::Authorizing {
            provider_id: provider_id.to_string(),
        });

        match self.establish(provider_id, provider.as_ref()).await {
            Ok(session) => {
                self.live_session.set(Some(session.id()));
                self.set_state(ConnectionState::Connected {
                    provider_id: provider_id.to_string(),
                });
                tracing::info!(
                    provider = provider_id,
                    address = session.address().unwrap_or("-"),
                    "Wallet connected"
                );
                Ok(session)
            }
            Err(e) => {
                self.live_session.set(None);
                self.set_state(ConnectionState::Disconnected);
                tracing::warn!(provider = provider_id, error = %e, "Wallet authorization failed");
                Err(e)
            }
        }
    }

    async fn establish(
        &self,
        provider_id: &str,
        provider: &dyn WalletProvider,
    ) -> WalletResult<WalletSession> {
        tracing::debug!(provider = provider_id, "Requesting wallet authorization");
        let api = provider
            .enable()
            .await
            .map_err(|e| WalletError::communication(provider_id, ProviderCall::Enable, e))?;

        tracing::debug!(provider = provider_id, "Fetching used addresses");
        let address = api
            .get_used_addresses()
            .await
            .map_err(|e| WalletError::communication(provider_id, ProviderCall::UsedAddresses, e))?
            .into_iter()
            .next();

        tracing::debug!(provider = provider_id, "Fetching balance");
        let balance = api
            .get_balance()
            .await
            .map_err(|e| WalletError::communication(provider_id, ProviderCall::Balance, e))?;

        let id = self.next_session.get();
        self.next_session.set(id + 1);

        Ok(WalletSession::new(
            id,
            provider_id.to_string(),
            api,
            address,
            balance,
        ))
    }

    /// End a session.
    ///
    /// Calls the provider's native disconnect when it has one; a failure
    /// there is logged and the local state is cleared anyway.
    ///
    /// A session superseded by a later `authorize` is dropped locally and
    /// leaves the live session untouched. Fails with `AlreadyDisconnected`
    /// when no session is established.
    pub async fn disconnect(&self, session: WalletSession) -> WalletResult<()> {
        match self.live_session.get() {
            None => return Err(WalletError::AlreadyDisconnected),
            Some(live) if live != session.id() => {
                tracing::debug!(
                    provider = session.provider_id(),
                    "Dropped superseded wallet session"
                );
                return Ok(());
            }
            Some(_) => {}
        }

        let api = session.api();
        if api.supports_disconnect() {
            if let Err(e) = api.disconnect().await {
                let err = WalletError::communication(
                    session.provider_id(),
                    ProviderCall::Disconnect,
                    e,
                );
                tracing::warn!(error = %err, "Native wallet disconnect failed");
            }
        } else {
            tracing::debug!(
                provider = session.provider_id(),
                "Provider has no native disconnect; clearing local state"
            );
        }

        self.live_session.set(None);
        self.set_state(ConnectionState::Disconnected);
        tracing::info!(provider = session.provider_id(), "Wallet disconnected");
        Ok(())
    }

    fn set_state(&self, state: ConnectionState) {
        *self.state.borrow_mut() = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::dev::{DevFailure, DevRegistry, DevWallet};
    use crate::wallet::error::ProviderError;

    fn registry() -> DevRegistry {
        DevRegistry::new(vec![
            DevWallet::new("nami", "addr1q9ld7tzqxyzabc0123456789lmnop7tzq", "12500000"),
            DevWallet::new("eternl", "addr1eternl00000000000000000000000001", "0")
                .failing(DevFailure::Balance),
            DevWallet::new("flint", "addr1flint", "1").with_native_disconnect(),
        ])
    }

    #[test]
    fn test_lists_injected_providers_in_allow_list_order() {
        let adapter = WalletAdapter::new(registry());
        assert_eq!(
            adapter.list_available_providers(),
            vec!["nami".to_string(), "eternl".to_string(), "flint".to_string()]
        );

        let adapter = WalletAdapter::with_allow_list(registry(), vec!["flint".to_string()]);
        assert_eq!(adapter.list_available_providers(), vec!["flint".to_string()]);
    }

    #[test]
    fn test_absent_registry_lists_nothing() {
        let adapter = WalletAdapter::new(None::<DevRegistry>);
        assert!(adapter.list_available_providers().is_empty());
    }

    #[tokio::test]
    async fn test_authorize_success() {
        let adapter = WalletAdapter::new(registry());

        let session = adapter.authorize("nami").await.unwrap();
        assert_eq!(session.provider_id(), "nami");
        assert_eq!(session.address(), Some("addr1q9ld7tzqxyzabc0123456789lmnop7tzq"));
        assert_eq!(session.balance_minor_units(), "12500000");
        assert_eq!(
            adapter.state(),
            ConnectionState::Connected {
                provider_id: "nami".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_unregistered_provider_invokes_nothing() {
        let registry = registry();
        let adapter = WalletAdapter::new(&registry);

        let err = adapter.authorize("typhon").await.unwrap_err();
        assert!(matches!(err, WalletError::ProviderUnavailable(ref id) if id == "typhon"));
        assert_eq!(registry.total_calls(), 0);
        assert_eq!(adapter.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn test_provider_outside_allow_list_is_unavailable() {
        let registry = registry();
        let adapter = WalletAdapter::with_allow_list(&registry, vec!["flint".to_string()]);

        let err = adapter.authorize("nami").await.unwrap_err();
        assert!(matches!(err, WalletError::ProviderUnavailable(_)));
        assert_eq!(registry.calls("nami"), 0);
    }

    #[tokio::test]
    async fn test_balance_failure_leaves_no_session() {
        let registry = registry();
        let adapter = WalletAdapter::new(&registry);

        let err = adapter.authorize("eternl").await.unwrap_err();
        match err {
            WalletError::Communication { provider, call, source } => {
                assert_eq!(provider, "eternl");
                assert_eq!(call, ProviderCall::Balance);
                assert!(matches!(source, ProviderError::Rejected(_)));
            }
            other => panic!("unexpected error: {:?}", other),
        }

        // enable + getUsedAddresses + getBalance
        assert_eq!(registry.calls("eternl"), 3);
        assert_eq!(adapter.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn test_rejected_popup_is_communication_error() {
        let registry = DevRegistry::new(vec![
            DevWallet::new("yoroi", "addr1yoroi", "5").failing(DevFailure::Enable)
        ]);
        let adapter = WalletAdapter::new(&registry);

        let err = adapter.authorize("yoroi").await.unwrap_err();
        assert!(matches!(
            err,
            WalletError::Communication {
                call: ProviderCall::Enable,
                ..
            }
        ));
        assert_eq!(registry.calls("yoroi"), 1);
        assert_eq!(adapter.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn test_disconnect_transitions_to_disconnected() {
        let registry = registry();
        let adapter = WalletAdapter::new(&registry);

        let session = adapter.authorize("flint").await.unwrap();
        adapter.disconnect(session).await.unwrap();
        assert_eq!(adapter.state(), ConnectionState::Disconnected);
        assert_eq!(registry.native_disconnects("flint"), 1);
    }

    #[tokio::test]
    async fn test_disconnect_without_native_support_is_local() {
        let registry = registry();
        let adapter = WalletAdapter::new(&registry);

        let session = adapter.authorize("nami").await.unwrap();
        adapter.disconnect(session).await.unwrap();
        assert_eq!(registry.native_disconnects("nami"), 0);
        assert_eq!(adapter.state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn test_superseded_session_leaves_live_one_connected() {
        let registry = registry();
        let adapter = WalletAdapter::new(&registry);

        let first = adapter.authorize("nami").await.unwrap();
        let second = adapter.authorize("flint").await.unwrap();

        adapter.disconnect(first).await.unwrap();
        assert_eq!(
            adapter.state(),
            ConnectionState::Connected {
                provider_id: "flint".to_string()
            }
        );

        adapter.disconnect(second).await.unwrap();
        assert_eq!(adapter.state(), ConnectionState::Disconnected);
        assert_eq!(registry.native_disconnects("flint"), 1);
    }

    #[tokio::test]
    async fn test_disconnect_without_established_session_fails() {
        let registry = registry();
        let adapter = WalletAdapter::new(&registry);

        let session = adapter.authorize("flint").await.unwrap();
        // eternl rejects getBalance, which drops the adapter to Disconnected
        adapter.authorize("eternl").await.unwrap_err();
        assert_eq!(adapter.state(), ConnectionState::Disconnected);

        let err = adapter.disconnect(session).await.unwrap_err();
        assert!(matches!(err, WalletError::AlreadyDisconnected));
        assert_eq!(registry.native_disconnects("flint"), 0);
    }
}
