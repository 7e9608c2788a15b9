//! API Module
//!
//! HTTP client for the lending REST API. Every read endpoint falls back to
//! the static market data when the backend cannot be reached.

pub mod client;

pub use client::*;
