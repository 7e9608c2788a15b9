//! Global Application State
//!
//! Reactive state management using Leptos signals.

use chrono::{DateTime, Local};
use leptos::*;

use adalend::market::{Fetched, Market, MarketStats, PositionResponse, Recommendations};

/// Global application state provided to all components
#[derive(Clone)]
pub struct GlobalState {
    /// Markets from the API (or the fallback set)
    pub markets: RwSignal<Vec<Market>>,
    /// Protocol-wide statistics
    pub stats: RwSignal<Option<MarketStats>>,
    /// Supply/borrow suggestions
    pub recommendations: RwSignal<Option<Recommendations>>,
    /// Position of the connected address
    pub position: RwSignal<Option<PositionResponse>>,
    /// Whether any shown data is fallback data
    pub using_fallback: RwSignal<bool>,
    /// Last time market data was loaded
    pub last_refresh: RwSignal<Option<DateTime<Local>>>,
    /// Global loading state
    pub loading: RwSignal<bool>,
    /// Non-blocking notice (fallback data in use)
    pub notice: RwSignal<Option<String>>,
    /// Error message to display
    pub error: RwSignal<Option<String>>,
    /// Success message (for toasts)
    pub success: RwSignal<Option<String>>,
}

/// Provide global state to the component tree
pub fn provide_global_state() {
    let state = GlobalState {
        markets: create_rw_signal(Vec::new()),
        stats: create_rw_signal(None),
        recommendations: create_rw_signal(None),
        position: create_rw_signal(None),
        using_fallback: create_rw_signal(false),
        last_refresh: create_rw_signal(None),
        loading: create_rw_signal(false),
        notice: create_rw_signal(None),
        error: create_rw_signal(None),
        success: create_rw_signal(None),
    };

    provide_context(state);
}

impl GlobalState {
    /// Unwrap fetched data, surfacing a notice when it is fallback data
    pub fn accept<T>(&self, fetched: Fetched<T>) -> T {
        if let Some(notice) = fetched.notice() {
            web_sys::console::warn_1(&notice.clone().into());
            self.using_fallback.set(true);
            self.show_notice(&notice);
        }
        fetched.data
    }

    /// Record a completed load of market data
    pub fn mark_refreshed(&self) {
        self.last_refresh.set(Some(Local::now()));
    }

    /// Market by id from the loaded set
    pub fn market(&self, id: &str) -> Option<Market> {
        self.markets.with(|markets| markets.iter().find(|m| m.id == id).cloned())
    }

    /// Show a success message (auto-clears after timeout)
    pub fn show_success(&self, message: &str) {
        self.success.set(Some(message.to_string()));

        let success_signal = self.success;
        gloo_timers::callback::Timeout::new(3000, move || {
            success_signal.set(None);
        }).forget();
    }

    /// Show an error message (auto-clears after timeout)
    pub fn show_error(&self, message: &str) {
        self.error.set(Some(message.to_string()));

        let error_signal = self.error;
        gloo_timers::callback::Timeout::new(5000, move || {
            error_signal.set(None);
        }).forget();
    }

    /// Show the fallback notice (auto-clears after timeout)
    pub fn show_notice(&self, message: &str) {
        self.notice.set(Some(message.to_string()));

        let notice_signal = self.notice;
        gloo_timers::callback::Timeout::new(8000, move || {
            notice_signal.set(None);
        }).forget();
    }
}
