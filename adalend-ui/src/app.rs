//! App Root Component
//!
//! Main application component with routing and global providers.

use leptos::*;
use leptos_router::*;

use crate::components::{Nav, Toast, WalletModal};
use crate::pages::{AssetDetail, Dashboard, Markets};
use crate::state::global::{provide_global_state, GlobalState};
use crate::state::wallet::{provide_wallet_state, WalletState};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    // Provide global state to all components
    provide_global_state();

    // Restore the persisted wallet connection
    provide_wallet_state();

    view! {
        <Router>
            <div class="min-h-screen bg-gray-900 text-white flex flex-col">
                // Navigation header with wallet button
                <Nav />

                // Main content area
                <main class="flex-1 container mx-auto px-4 py-8 pb-24">
                    <Routes>
                        <Route path="/" view=Dashboard />
                        <Route path="/markets" view=Markets />
                        <Route path="/asset/:id" view=AssetDetail />
                        <Route path="/*any" view=NotFound />
                    </Routes>
                </main>

                // Footer with data source status
                <Footer />

                // Wallet picker
                <WalletModal />

                // Toast notifications
                <Toast />
            </div>
        </Router>
    }
}

/// Footer component showing where the market data came from
#[component]
fn Footer() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let wallet = use_context::<WalletState>().expect("WalletState not found");

    view! {
        <footer class="fixed bottom-0 left-0 right-0 bg-gray-800 border-t border-gray-700 py-3 px-4">
            <div class="container mx-auto flex items-center justify-between text-sm">
                // API status
                <div class="flex items-center space-x-2">
                    {move || {
                        if state.using_fallback.get() {
                            view! {
                                <span class="flex items-center space-x-1 text-yellow-400">
                                    <span class="w-2 h-2 bg-yellow-400 rounded-full" />
                                    <span>"Fallback data"</span>
                                </span>
                            }.into_view()
                        } else {
                            view! {
                                <span class="flex items-center space-x-1 text-green-400">
                                    <span class="w-2 h-2 bg-green-400 rounded-full pulse" />
                                    <span>"Live"</span>
                                </span>
                            }.into_view()
                        }
                    }}
                </div>

                // Wallet state
                <div class="text-gray-400">
                    {move || wallet.state.get().to_string()}
                </div>

                // Last refresh time
                <div class="text-gray-400">
                    {move || {
                        state.last_refresh.get()
                            .map(|dt| format!("Last refresh: {}", dt.format("%H:%M:%S")))
                            .unwrap_or_else(|| "Not loaded".to_string())
                    }}
                </div>

                // Loading indicator
                {move || {
                    if state.loading.get() {
                        view! {
                            <div class="flex items-center space-x-2 text-primary-400">
                                <div class="loading-spinner w-4 h-4" />
                                <span>"Loading..."</span>
                            </div>
                        }.into_view()
                    } else {
                        view! {}.into_view()
                    }
                }}
            </div>
        </footer>
    }
}

/// 404 Not Found page
#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center min-h-[60vh] text-center">
            <div class="text-6xl mb-4">"🔍"</div>
            <h1 class="text-3xl font-bold mb-2">"Page Not Found"</h1>
            <p class="text-gray-400 mb-6">"The page you're looking for doesn't exist."</p>
            <A
                href="/"
                class="px-6 py-3 bg-primary-600 hover:bg-primary-700 rounded-lg font-medium transition-colors"
            >
                "Go to Dashboard"
            </A>
        </div>
    }
}
