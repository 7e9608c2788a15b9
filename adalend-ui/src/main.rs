//! AdaLend Dashboard
//!
//! Lending market dashboard for Cardano built with Leptos (WASM).
//!
//! # Features
//!
//! - Market overview, statistics and recommendations
//! - Asset detail pages with supply/borrow simulation
//! - CIP-30 wallet connection that survives a page reload
//! - Static fallback data when the lending API is unreachable
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles to
//! WebAssembly. Wallet and market logic lives in the `adalend` core crate;
//! this crate bridges it to `window.cardano`, `localStorage` and the
//! lending REST API.

use leptos::*;

mod api;
mod app;
mod components;
mod pages;
mod state;
mod wallet;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    // Mount the app to the document body
    mount_to_body(|| view! { <app::App /> });
}
