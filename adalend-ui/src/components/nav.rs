//! Navigation Component
//!
//! Header with route links and the wallet button.

use leptos::*;
use leptos_router::*;

use adalend::wallet::{wallet_display_name, ConnectionState};

use crate::state::wallet::WalletState;

/// Main navigation header
#[component]
pub fn Nav() -> impl IntoView {
    let (menu_open, set_menu_open) = create_signal(false);

    view! {
        <header class="bg-gray-800 border-b border-gray-700 sticky top-0 z-40">
            <div class="container mx-auto px-4">
                <div class="flex items-center justify-between h-16">
                    // Logo
                    <A href="/" class="flex items-center space-x-2">
                        <span class="text-2xl">"₳"</span>
                        <span class="text-xl font-bold">"AdaLend"</span>
                    </A>

                    // Desktop navigation
                    <nav class="hidden md:flex items-center space-x-1">
                        <NavItem href="/" label="Dashboard" />
                        <NavItem href="/markets" label="Markets" />
                    </nav>

                    <div class="hidden md:block">
                        <WalletButton />
                    </div>

                    // Mobile menu button
                    <button
                        class="md:hidden p-2 rounded-lg hover:bg-gray-700"
                        on:click=move |_| set_menu_open.update(|open| *open = !*open)
                    >
                        {move || if menu_open.get() { "✕" } else { "☰" }}
                    </button>
                </div>

                // Mobile navigation
                {move || menu_open.get().then(|| view! {
                    <nav class="md:hidden pb-4 space-y-1" on:click=move |_| set_menu_open.set(false)>
                        <NavItem href="/" label="Dashboard" />
                        <NavItem href="/markets" label="Markets" />
                        <div class="pt-2">
                            <WalletButton />
                        </div>
                    </nav>
                })}
            </div>
        </header>
    }
}

#[component]
fn NavItem(
    href: &'static str,
    label: &'static str,
) -> impl IntoView {
    view! {
        <A
            href=href
            exact=true
            active_class="bg-gray-700 text-white"
            class="block px-4 py-2 rounded-lg text-gray-300 hover:bg-gray-700 hover:text-white transition-colors"
        >
            {label}
        </A>
    }
}

/// Connect button, or the connected address with a disconnect action
#[component]
fn WalletButton() -> impl IntoView {
    let wallet = use_context::<WalletState>().expect("WalletState not found");

    move || {
        let wallet = wallet.clone();
        match wallet.state.get() {
            ConnectionState::Disconnected => view! {
                <button
                    on:click=move |_| wallet.open_picker()
                    class="px-5 py-2 bg-primary-600 hover:bg-primary-700 rounded-lg font-medium transition-colors"
                >
                    "Connect Wallet"
                </button>
            }.into_view(),
            ConnectionState::Authorizing { provider_id } => view! {
                <button
                    disabled=true
                    class="px-5 py-2 bg-gray-700 rounded-lg font-medium flex items-center space-x-2"
                >
                    <span class="loading-spinner w-4 h-4" />
                    <span>{format!("Connecting to {}...", wallet_display_name(&provider_id))}</span>
                </button>
            }.into_view(),
            ConnectionState::Connected { .. } => {
                let projection = wallet.projection.get();
                let label = projection
                    .as_ref()
                    .map(|p| p.display_address.clone())
                    .filter(|a| !a.is_empty())
                    .unwrap_or_else(|| "Connected".to_string());
                let balance = projection
                    .map(|p| format!("{} ₳", p.display_balance))
                    .unwrap_or_default();

                view! {
                    <div class="flex items-center space-x-3">
                        <span class="text-sm text-gray-400">{balance}</span>
                        <button
                            on:click=move |_| wallet.disconnect()
                            title="Disconnect"
                            class="px-5 py-2 border border-primary-500 text-primary-400 hover:bg-gray-700 rounded-lg font-mono transition-colors"
                        >
                            {label}
                        </button>
                    </div>
                }.into_view()
            }
        }
    }
}
