//! Wallet Connection
//!
//! The state holder the UI talks to. Owns the live [`WalletSession`],
//! mirrors its projection into the [`SessionStore`] and restores that
//! projection after a reload. It is the only writer of the persisted record.

use std::cell::RefCell;

use super::adapter::WalletAdapter;
use super::error::{WalletError, WalletResult};
use super::provider::ProviderRegistry;
use super::session::{ConnectionState, SessionProjection, WalletSession};
use crate::store::{KeyValueStore, SessionStore};

/// Connection status plus the display fields shown in the header
pub struct WalletConnection<R, S> {
    adapter: WalletAdapter<R>,
    store: SessionStore<S>,
    session: RefCell<Option<WalletSession>>,
    restored: RefCell<Option<SessionProjection>>,
}

impl<R: ProviderRegistry, S: KeyValueStore> WalletConnection<R, S> {
    /// Build the holder and pick up a persisted projection, if any.
    ///
    /// Always resumes at `Connected` (display only) or `Disconnected`.
    pub fn restore(adapter: WalletAdapter<R>, store: SessionStore<S>) -> Self {
        let restored = match store.load() {
            Ok(projection) => projection,
            Err(e) => {
                tracing::warn!(error = %e, "Could not read persisted wallet record");
                None
            }
        };

        if let Some(projection) = &restored {
            tracing::info!(provider = %projection.name, "Restored wallet connection");
        }

        Self {
            adapter,
            store,
            session: RefCell::new(None),
            restored: RefCell::new(restored),
        }
    }

    pub fn adapter(&self) -> &WalletAdapter<R> {
        &self.adapter
    }

    pub fn available_providers(&self) -> Vec<String> {
        self.adapter.list_available_providers()
    }

    /// Lifecycle state as the UI should render it
    pub fn state(&self) -> ConnectionState {
        let state = self.adapter.state();
        if state == ConnectionState::Disconnected && self.session.borrow().is_none() {
            if let Some(projection) = &*self.restored.borrow() {
                return ConnectionState::Connected {
                    provider_id: projection.name.clone(),
                };
            }
        }
        state
    }

    /// Display fields of the live or restored connection
    pub fn projection(&self) -> Option<SessionProjection> {
        if let Some(session) = &*self.session.borrow() {
            return Some(session.projection());
        }
        self.restored.borrow().clone()
    }

    /// Whether a live session (not just a restored projection) is held
    pub fn has_live_session(&self) -> bool {
        self.session.borrow().is_some()
    }

    /// Authorize a provider and persist the projection.
    ///
    /// An existing connection (live or restored) is torn down first, so a
    /// failed attempt always ends `Disconnected` with nothing persisted.
    pub async fn connect(&self, provider_id: &str) -> WalletResult<SessionProjection> {
        let previous = self.session.borrow_mut().take();
        let restored = self.restored.borrow_mut().take();
        let had_connection = previous.is_some() || restored.is_some();

        if let Some(previous) = previous {
            if let Err(e) = self.adapter.disconnect(previous).await {
                tracing::debug!(error = %e, "Previous wallet session already closed");
            }
        }
        if had_connection {
            if let Err(e) = self.store.clear() {
                tracing::error!(error = %e, "Failed to clear persisted wallet connection");
            }
        }

        let session = self.adapter.authorize(provider_id).await?;
        let projection = session.projection();

        if let Err(e) = self.store.save(&projection) {
            tracing::error!(error = %e, "Failed to persist wallet connection");
        }

        *self.session.borrow_mut() = Some(session);
        Ok(projection)
    }

    /// Drop the connection and its persisted record
    pub async fn disconnect(&self) -> WalletResult<()> {
        let session = self.session.borrow_mut().take();
        let restored = self.restored.borrow_mut().take();

        match (session, restored) {
            (Some(session), _) => self.adapter.disconnect(session).await?,
            (None, Some(projection)) => {
                tracing::info!(provider = %projection.name, "Cleared restored wallet connection");
            }
            (None, None) => return Err(WalletError::AlreadyDisconnected),
        }

        if let Err(e) = self.store.clear() {
            tracing::error!(error = %e, "Failed to clear persisted wallet connection");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, SESSION_KEY};
    use crate::wallet::dev::{DevFailure, DevRegistry, DevWallet};

    const NAMI_ADDRESS: &str = "addr1q9ld7tzqxyzabc0123456789lmnop7tzq";

    fn registry() -> DevRegistry {
        DevRegistry::new(vec![
            DevWallet::new("nami", NAMI_ADDRESS, "12500000"),
            DevWallet::new("eternl", "addr1eternl00000000000000000000000001", "7")
                .failing(DevFailure::Balance),
            DevWallet::new("flint", "addr1flint", "1")
                .with_native_disconnect()
                .failing(DevFailure::Disconnect),
        ])
    }

    fn connection<'a>(
        registry: &'a DevRegistry,
        backend: &'a MemoryStore,
    ) -> WalletConnection<&'a DevRegistry, &'a MemoryStore> {
        WalletConnection::restore(WalletAdapter::new(registry), SessionStore::new(backend))
    }

    #[tokio::test]
    async fn test_connect_persists_projection() {
        let registry = registry();
        let backend = MemoryStore::new();
        let conn = connection(&registry, &backend);

        let projection = conn.connect("nami").await.unwrap();
        assert_eq!(projection.display_address, "addr1q...op7tzq");
        assert_eq!(projection.display_balance, "12.50");
        assert!(conn.has_live_session());

        let raw = backend.get(SESSION_KEY).unwrap().unwrap();
        assert!(raw.contains("\"displayBalance\":\"12.50\""));
        assert!(raw.contains(NAMI_ADDRESS));
    }

    #[tokio::test]
    async fn test_failed_balance_persists_nothing() {
        let registry = registry();
        let backend = MemoryStore::new();
        let conn = connection(&registry, &backend);

        let err = conn.connect("eternl").await.unwrap_err();
        assert!(matches!(err, WalletError::Communication { .. }));
        assert_eq!(conn.state(), ConnectionState::Disconnected);
        assert!(conn.projection().is_none());
        assert!(backend.is_empty());
    }

    #[tokio::test]
    async fn test_reload_resumes_connected_then_disconnect_clears() {
        let registry = registry();
        let backend = MemoryStore::new();

        {
            let conn = connection(&registry, &backend);
            conn.connect("nami").await.unwrap();
        }

        // Reload: capability is gone, display survives
        let conn = connection(&registry, &backend);
        assert!(!conn.has_live_session());
        assert_eq!(
            conn.state(),
            ConnectionState::Connected {
                provider_id: "nami".to_string()
            }
        );
        assert_eq!(
            conn.projection().map(|p| p.display_address),
            Some("addr1q...op7tzq".to_string())
        );

        conn.disconnect().await.unwrap();
        assert!(backend.get(SESSION_KEY).unwrap().is_none());

        // Reload again: starts disconnected
        let conn = connection(&registry, &backend);
        assert_eq!(conn.state(), ConnectionState::Disconnected);
        assert!(conn.projection().is_none());
    }

    #[tokio::test]
    async fn test_disconnect_without_connection_fails() {
        let registry = registry();
        let backend = MemoryStore::new();
        let conn = connection(&registry, &backend);

        let err = conn.disconnect().await.unwrap_err();
        assert!(matches!(err, WalletError::AlreadyDisconnected));

        conn.connect("nami").await.unwrap();
        conn.disconnect().await.unwrap();
        assert!(matches!(
            conn.disconnect().await,
            Err(WalletError::AlreadyDisconnected)
        ));
    }

    #[tokio::test]
    async fn test_native_disconnect_failure_still_clears() {
        let registry = registry();
        let backend = MemoryStore::new();
        let conn = connection(&registry, &backend);

        conn.connect("flint").await.unwrap();
        conn.disconnect().await.unwrap();

        assert_eq!(conn.state(), ConnectionState::Disconnected);
        assert!(backend.is_empty());
        assert_eq!(registry.native_disconnects("flint"), 0);
    }

    #[tokio::test]
    async fn test_failed_reconnect_after_reload_ends_disconnected() {
        let registry = registry();
        let backend = MemoryStore::new();
        connection(&registry, &backend).connect("nami").await.unwrap();

        let conn = connection(&registry, &backend);
        assert!(conn.state().is_connected());

        assert!(conn.connect("eternl").await.is_err());
        assert_eq!(conn.state(), ConnectionState::Disconnected);
        assert!(backend.get(SESSION_KEY).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_switching_wallets_replaces_record() {
        let registry = registry();
        let backend = MemoryStore::new();
        let conn = connection(&registry, &backend);

        conn.connect("nami").await.unwrap();
        conn.connect("flint").await.unwrap();

        assert_eq!(
            conn.state(),
            ConnectionState::Connected {
                provider_id: "flint".to_string()
            }
        );
        let stored = SessionStore::new(&backend).load().unwrap().unwrap();
        assert_eq!(stored.name, "flint");
    }

    #[cfg(feature = "native")]
    #[tokio::test]
    async fn test_connect_over_unreadable_store_file_survives_reload() {
        use crate::store::FileStore;

        let dir = tempfile::TempDir::new().unwrap();
        let registry = registry();
        let file = FileStore::in_dir(dir.path());
        std::fs::write(file.path(), "{truncated").unwrap();

        let conn = WalletConnection::restore(
            WalletAdapter::new(&registry),
            SessionStore::new(file.clone()),
        );
        assert_eq!(conn.state(), ConnectionState::Disconnected);
        conn.connect("nami").await.unwrap();
        drop(conn);

        let reloaded = WalletConnection::restore(
            WalletAdapter::new(&registry),
            SessionStore::new(file.clone()),
        );
        assert_eq!(
            reloaded.state(),
            ConnectionState::Connected {
                provider_id: "nami".to_string()
            }
        );

        reloaded.disconnect().await.unwrap();
        assert!(file.get(SESSION_KEY).unwrap().is_none());
    }
}
