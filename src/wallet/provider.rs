//! Wallet Provider Seam
//!
//! Traits describing a CIP-30 style injected wallet, the registry that
//! holds them, and the static allow-list of wallets the dashboard knows.
//!
//! The traits are `?Send`: every implementation lives on a single
//! cooperative event loop (the browser, or a current-thread runtime).

use async_trait::async_trait;

use super::error::ProviderError;

/// An injected wallet provider before authorization
#[async_trait(?Send)]
pub trait WalletProvider {
    /// Provider identifier (key in the registry)
    fn id(&self) -> &str;

    /// Ask the user to authorize this dApp.
    ///
    /// May suspend until the user answers the provider popup. Dismissing
    /// the popup is reported as [`ProviderError::Rejected`].
    async fn enable(&self) -> Result<Box<dyn WalletApi>, ProviderError>;
}

/// The authorized account capability returned by [`WalletProvider::enable`]
#[async_trait(?Send)]
pub trait WalletApi {
    /// Addresses that have been used by the account, most relevant first
    async fn get_used_addresses(&self) -> Result<Vec<String>, ProviderError>;

    /// Balance in minor units (lovelace), as a decimal integer string
    async fn get_balance(&self) -> Result<String, ProviderError>;

    /// Whether the provider exposes a native disconnect
    fn supports_disconnect(&self) -> bool {
        false
    }

    /// Revoke the authorization. Local no-op unless overridden.
    async fn disconnect(&self) -> Result<(), ProviderError> {
        Ok(())
    }
}

/// Lookup of injected providers by identifier
pub trait ProviderRegistry {
    /// Whether a provider with this id is injected
    fn contains(&self, id: &str) -> bool;

    /// Obtain a handle to the provider
    fn lookup(&self, id: &str) -> Option<Box<dyn WalletProvider>>;
}

/// `None` models an absent registry object (no wallet extension injected anything)
impl<R: ProviderRegistry> ProviderRegistry for Option<R> {
    fn contains(&self, id: &str) -> bool {
        self.as_ref().map_or(false, |r| r.contains(id))
    }

    fn lookup(&self, id: &str) -> Option<Box<dyn WalletProvider>> {
        self.as_ref().and_then(|r| r.lookup(id))
    }
}

impl<R: ProviderRegistry + ?Sized> ProviderRegistry for &R {
    fn contains(&self, id: &str) -> bool {
        (**self).contains(id)
    }

    fn lookup(&self, id: &str) -> Option<Box<dyn WalletProvider>> {
        (**self).lookup(id)
    }
}

/// Return the allow-listed provider ids that are present in the registry.
///
/// Order follows the allow-list. Never touches the providers themselves.
pub fn list_available_providers<R, S>(registry: &R, allow_list: &[S]) -> Vec<String>
where
    R: ProviderRegistry + ?Sized,
    S: AsRef<str>,
{
    allow_list
        .iter()
        .map(AsRef::as_ref)
        .filter(|id| registry.contains(id))
        .map(str::to_string)
        .collect()
}

/// Display metadata for a wallet the dashboard supports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownWallet {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub website: &'static str,
}

/// Wallets the dashboard will offer, in display order
pub const SUPPORTED_WALLETS: &[KnownWallet] = &[
    KnownWallet {
        id: "nami",
        name: "Nami",
        description: "Nami is a browser based wallet extension for the Cardano blockchain.",
        icon: "https://namiwallet.io/favicon.ico",
        website: "https://namiwallet.io/",
    },
    KnownWallet {
        id: "eternl",
        name: "Eternl",
        description: "Eternl (formerly ccvault.io) is a full-featured Cardano light wallet.",
        icon: "https://eternl.io/icons/favicon-32x32.png",
        website: "https://eternl.io/",
    },
    KnownWallet {
        id: "flint",
        name: "Flint",
        description: "Flint Wallet is a user-friendly, non-custodial wallet for Cardano.",
        icon: "https://flint-wallet.com/apple-touch-icon.png",
        website: "https://flint-wallet.com/",
    },
    KnownWallet {
        id: "typhon",
        name: "Typhon",
        description: "Typhon is a web-based Cardano wallet with a built-in dApp connector.",
        icon: "https://typhonwallet.io/icons/apple-icon-76x76.png",
        website: "https://typhonwallet.io/",
    },
    KnownWallet {
        id: "nufi",
        name: "NuFi",
        description: "NuFi is a browser-based wallet for Cardano and other blockchains.",
        icon: "https://nu.fi/favicon-32x32.png",
        website: "https://nu.fi/",
    },
    KnownWallet {
        id: "yoroi",
        name: "Yoroi",
        description: "Yoroi is a light wallet for Cardano developed by Emurgo.",
        icon: "https://yoroi-wallet.com/favicon-32x32.png",
        website: "https://yoroi-wallet.com/",
    },
    KnownWallet {
        id: "gerowallet",
        name: "GeroWallet",
        description: "GeroWallet is a Cardano wallet focused on DeFi and dApps.",
        icon: "https://gerowallet.io/assets/img/logo2.svg",
        website: "https://gerowallet.io/",
    },
    KnownWallet {
        id: "cardwallet",
        name: "CardWallet",
        description: "CardWallet is a secure and user-friendly Cardano wallet.",
        icon: "https://cardwallet.fi/assets/logo-icon.png",
        website: "https://cardwallet.fi/",
    },
];

/// Identifiers of [`SUPPORTED_WALLETS`]
pub fn supported_wallet_ids() -> Vec<String> {
    SUPPORTED_WALLETS.iter().map(|w| w.id.to_string()).collect()
}

/// Metadata for a supported wallet
pub fn known_wallet(id: &str) -> Option<&'static KnownWallet> {
    SUPPORTED_WALLETS.iter().find(|w| w.id == id)
}

/// Human-readable name, falling back to the raw id
pub fn wallet_display_name(id: &str) -> String {
    known_wallet(id)
        .map(|w| w.name.to_string())
        .unwrap_or_else(|| id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct Injected(HashSet<&'static str>);

    impl ProviderRegistry for Injected {
        fn contains(&self, id: &str) -> bool {
            self.0.contains(id)
        }

        fn lookup(&self, _id: &str) -> Option<Box<dyn WalletProvider>> {
            None
        }
    }

    #[test]
    fn test_absent_registry_lists_nothing() {
        let registry: Option<Injected> = None;
        let ids = supported_wallet_ids();
        assert!(list_available_providers(&registry, &ids).is_empty());
    }

    #[test]
    fn test_only_allow_listed_providers_are_listed() {
        let registry = Injected(["eternl", "nami", "metamask"].into_iter().collect());
        let ids = supported_wallet_ids();

        let available = list_available_providers(&registry, &ids);
        assert_eq!(available, vec!["nami".to_string(), "eternl".to_string()]);
    }

    #[test]
    fn test_allow_list_is_a_parameter() {
        let registry = Some(Injected(["eternl", "nami"].into_iter().collect()));
        let available = list_available_providers(&registry, &["eternl", "typhon"]);
        assert_eq!(available, vec!["eternl".to_string()]);
    }

    #[test]
    fn test_known_wallets() {
        assert_eq!(SUPPORTED_WALLETS.len(), 8);
        assert_eq!(known_wallet("gerowallet").map(|w| w.name), Some("GeroWallet"));
        assert!(known_wallet("metamask").is_none());
        assert_eq!(wallet_display_name("nufi"), "NuFi");
        assert_eq!(wallet_display_name("lace"), "lace");
    }
}
