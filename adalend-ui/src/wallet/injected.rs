//! CIP-30 injected wallets
//!
//! Every wallet extension installs an object under `window.cardano.<id>`
//! whose `enable()` resolves to the account API. All calls go through
//! `js_sys::Reflect` so a missing or malformed provider is reported as
//! an error instead of a panic.

use async_trait::async_trait;
use js_sys::{Array, Function, Object, Promise, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use adalend::wallet::{
    normalize_cip30_balance, ProviderError, ProviderRegistry, WalletApi, WalletProvider,
};

/// Registry backed by `window.cardano`.
///
/// Extensions inject themselves some time after page load, so the global
/// is read on every lookup rather than captured once.
#[derive(Clone, Copy, Default)]
pub struct BrowserRegistry;

impl BrowserRegistry {
    fn cardano() -> Option<Object> {
        let window = web_sys::window()?;
        let cardano = Reflect::get(&window, &JsValue::from_str("cardano")).ok()?;
        cardano.dyn_into::<Object>().ok()
    }

    fn provider_object(id: &str) -> Option<Object> {
        let provider = Reflect::get(&Self::cardano()?, &JsValue::from_str(id)).ok()?;
        provider.dyn_into::<Object>().ok()
    }
}

impl ProviderRegistry for BrowserRegistry {
    fn contains(&self, id: &str) -> bool {
        Self::provider_object(id).is_some()
    }

    fn lookup(&self, id: &str) -> Option<Box<dyn WalletProvider>> {
        Self::provider_object(id).map(|handle| {
            Box::new(InjectedProvider {
                id: id.to_string(),
                handle,
            }) as Box<dyn WalletProvider>
        })
    }
}

/// `window.cardano.<id>` before authorization
struct InjectedProvider {
    id: String,
    handle: Object,
}

#[async_trait(?Send)]
impl WalletProvider for InjectedProvider {
    fn id(&self) -> &str {
        &self.id
    }

    async fn enable(&self) -> Result<Box<dyn WalletApi>, ProviderError> {
        let api = call_method(&self.handle, "enable").await?;
        let api = api.dyn_into::<Object>().map_err(|_| {
            ProviderError::InvalidResponse("enable() did not return an object".to_string())
        })?;
        Ok(Box::new(Cip30Api { api }))
    }
}

/// The account API returned by `enable()`
struct Cip30Api {
    api: Object,
}

#[async_trait(?Send)]
impl WalletApi for Cip30Api {
    async fn get_used_addresses(&self) -> Result<Vec<String>, ProviderError> {
        let value = call_method(&self.api, "getUsedAddresses").await?;
        if !Array::is_array(&value) {
            return Err(ProviderError::InvalidResponse(
                "getUsedAddresses() did not return an array".to_string(),
            ));
        }

        Array::from(&value)
            .iter()
            .map(|entry| {
                entry.as_string().ok_or_else(|| {
                    ProviderError::InvalidResponse("address is not a string".to_string())
                })
            })
            .collect()
    }

    async fn get_balance(&self) -> Result<String, ProviderError> {
        let value = call_method(&self.api, "getBalance").await?;
        let raw = value.as_string().ok_or_else(|| {
            ProviderError::InvalidResponse("getBalance() did not return a string".to_string())
        })?;
        normalize_cip30_balance(&raw)
    }

    fn supports_disconnect(&self) -> bool {
        Reflect::get(&self.api, &JsValue::from_str("disconnect"))
            .map(|f| f.is_function())
            .unwrap_or(false)
    }

    async fn disconnect(&self) -> Result<(), ProviderError> {
        call_method(&self.api, "disconnect").await.map(|_| ())
    }
}

/// Call `target[name]()` and await the result if it is a promise
async fn call_method(target: &Object, name: &str) -> Result<JsValue, ProviderError> {
    let method = Reflect::get(target, &JsValue::from_str(name))
        .map_err(|e| ProviderError::InvalidResponse(js_error_message(&e)))?;
    let method = method
        .dyn_into::<Function>()
        .map_err(|_| ProviderError::InvalidResponse(format!("{} is not a function", name)))?;

    let result = method
        .call0(target)
        .map_err(|e| ProviderError::Rejected(js_error_message(&e)))?;

    JsFuture::from(Promise::resolve(&result))
        .await
        .map_err(|e| ProviderError::Rejected(js_error_message(&e)))
}

/// Best-effort message from a thrown value.
///
/// CIP-30 errors are plain `{ code, info }` objects, not `Error`s.
fn js_error_message(value: &JsValue) -> String {
    if let Some(message) = value.as_string() {
        return message;
    }
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    Reflect::get(value, &JsValue::from_str("info"))
        .ok()
        .and_then(|info| info.as_string())
        .unwrap_or_else(|| format!("{:?}", value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_cip30_error_info_is_used() {
        let error = Object::new();
        Reflect::set(&error, &"code".into(), &JsValue::from_f64(-3.0)).unwrap();
        Reflect::set(&error, &"info".into(), &"user declined".into()).unwrap();
        assert_eq!(js_error_message(&error), "user declined");
    }

    #[wasm_bindgen_test]
    fn test_string_error_passes_through() {
        assert_eq!(js_error_message(&"locked".into()), "locked");
    }
}
