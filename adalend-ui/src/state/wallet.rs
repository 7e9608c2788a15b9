//! Wallet Connection State
//!
//! Wraps the core [`WalletConnection`] in signals so the header, picker and
//! pages re-render when the connection changes. The connection itself is
//! the only writer of the persisted record.

use leptos::*;
use std::rc::Rc;

use adalend::wallet::{
    wallet_display_name, ConnectionState, SessionProjection, WalletAdapter, WalletConnection,
};
use adalend::SessionStore;

use crate::state::global::GlobalState;
use crate::wallet::{BrowserRegistry, LocalStorage};

type Connection = WalletConnection<BrowserRegistry, LocalStorage>;

/// Reactive view of the wallet connection
#[derive(Clone)]
pub struct WalletState {
    connection: Rc<Connection>,
    global: GlobalState,
    /// Lifecycle state
    pub state: RwSignal<ConnectionState>,
    /// Display fields of the live or restored connection
    pub projection: RwSignal<Option<SessionProjection>>,
    /// Providers offered by the picker
    pub providers: RwSignal<Vec<String>>,
    /// Whether the wallet picker is open
    pub picker_open: RwSignal<bool>,
}

/// Restore the persisted connection and provide it to the component tree.
///
/// Must run after [`provide_global_state`](crate::state::provide_global_state).
pub fn provide_wallet_state() {
    let global = use_context::<GlobalState>().expect("GlobalState not found");

    let connection = WalletConnection::restore(
        WalletAdapter::new(BrowserRegistry),
        SessionStore::new(LocalStorage),
    );

    let state = WalletState {
        state: create_rw_signal(connection.state()),
        projection: create_rw_signal(connection.projection()),
        providers: create_rw_signal(Vec::new()),
        picker_open: create_rw_signal(false),
        connection: Rc::new(connection),
        global,
    };

    provide_context(state);
}

impl WalletState {
    /// Open the picker with the wallets injected right now
    pub fn open_picker(&self) {
        self.providers.set(self.connection.available_providers());
        self.picker_open.set(true);
    }

    pub fn close_picker(&self) {
        self.picker_open.set(false);
    }

    /// Authorize a provider. Failures raise a blocking alert.
    pub fn connect(&self, provider_id: String) {
        self.close_picker();
        self.state.set(ConnectionState::Authorizing {
            provider_id: provider_id.clone(),
        });

        let this = self.clone();
        spawn_local(async move {
            let result = this.connection.connect(&provider_id).await;
            this.sync();

            match result {
                Ok(projection) => {
                    this.global.show_success(&format!(
                        "Connected to {}",
                        wallet_display_name(&projection.name)
                    ));
                }
                Err(e) => alert(&e.to_string()),
            }
        });
    }

    /// Drop the connection and its persisted record
    pub fn disconnect(&self) {
        let this = self.clone();
        spawn_local(async move {
            let result = this.connection.disconnect().await;
            this.sync();

            match result {
                Ok(()) => {
                    this.global.position.set(None);
                    this.global.show_success("Wallet disconnected");
                }
                Err(e) => alert(&e.to_string()),
            }
        });
    }

    /// Address of the connected account, if any
    pub fn address(&self) -> Option<String> {
        self.projection
            .with(|p| p.as_ref().and_then(|p| p.address.clone()))
    }

    fn sync(&self) {
        self.state.set(self.connection.state());
        self.projection.set(self.connection.projection());
    }
}

/// Blocking alert for wallet errors
fn alert(message: &str) {
    web_sys::console::error_1(&format!("Wallet error: {}", message).into());
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}
