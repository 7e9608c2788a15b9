//! Wallet Picker Modal
//!
//! Lists the supported wallets that are injected in this browser.

use leptos::*;

use adalend::wallet::{known_wallet, wallet_display_name};

use crate::state::wallet::WalletState;

/// Modal shown by the connect button
#[component]
pub fn WalletModal() -> impl IntoView {
    let wallet = use_context::<WalletState>().expect("WalletState not found");
    let picker_open = wallet.picker_open;

    move || {
        if !picker_open.get() {
            return view! {}.into_view();
        }

        let wallet_for_close = wallet.clone();
        let wallet_for_list = wallet.clone();

        view! {
            <div class="fixed inset-0 z-50 flex items-center justify-center bg-black/60">
                <div class="bg-gray-800 rounded-xl shadow-xl w-full max-w-md p-6 border border-gray-700">
                    <div class="flex items-center justify-between mb-6">
                        <h2 class="text-xl font-semibold">"Connect Wallet"</h2>
                        <button
                            on:click=move |_| wallet_for_close.close_picker()
                            class="text-gray-400 hover:text-white text-xl"
                        >
                            "✕"
                        </button>
                    </div>

                    {move || {
                        let providers = wallet_for_list.providers.get();
                        if providers.is_empty() {
                            view! { <NoWallets /> }.into_view()
                        } else {
                            let wallet = wallet_for_list.clone();
                            view! {
                                <div class="space-y-3">
                                    {providers.into_iter().map(|id| {
                                        let wallet = wallet.clone();
                                        view! { <WalletOption id=id wallet=wallet /> }
                                    }).collect_view()}
                                </div>
                            }.into_view()
                        }
                    }}
                </div>
            </div>
        }.into_view()
    }
}

/// One injected wallet
#[component]
fn WalletOption(
    #[prop(into)]
    id: String,
    wallet: WalletState,
) -> impl IntoView {
    let info = known_wallet(&id);
    let name = wallet_display_name(&id);
    let icon = info.map(|w| w.icon).unwrap_or_default();
    let description = info.map(|w| w.description).unwrap_or_default();

    view! {
        <button
            on:click=move |_| wallet.connect(id.clone())
            class="w-full flex items-center space-x-4 p-4 bg-gray-700 hover:bg-gray-600
                   rounded-lg text-left transition-colors"
        >
            <img src=icon alt=name.clone() class="w-10 h-10 rounded-full" />
            <div>
                <div class="font-medium">{name}</div>
                <div class="text-sm text-gray-400">{description}</div>
            </div>
        </button>
    }
}

/// Shown when no supported wallet extension is installed
#[component]
fn NoWallets() -> impl IntoView {
    view! {
        <div class="text-center py-6">
            <div class="text-4xl mb-3">"👛"</div>
            <p class="text-gray-300 mb-2">"No Cardano wallet found"</p>
            <p class="text-sm text-gray-400">
                "Install a CIP-30 wallet extension such as "
                <a href="https://namiwallet.io/" target="_blank" class="text-primary-400 hover:underline">"Nami"</a>
                " or "
                <a href="https://eternl.io/" target="_blank" class="text-primary-400 hover:underline">"Eternl"</a>
                " and reload the page."
            </p>
        </div>
    }
}
