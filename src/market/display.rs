//! Display helpers for market figures

/// Shorten a large number: `12.00M`, `4.80K`, `950.00`
pub fn format_compact(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1e9 {
        format!("{:.2}B", value / 1e9)
    } else if abs >= 1e6 {
        format!("{:.2}M", value / 1e6)
    } else if abs >= 1e3 {
        format!("{:.2}K", value / 1e3)
    } else {
        format!("{:.2}", value)
    }
}

pub fn format_usd(value: f64) -> String {
    format!("${}", format_compact(value))
}

/// APY as stored by the backend (already a percentage)
pub fn format_apy(apy: f64) -> String {
    format!("{:.2}%", apy)
}

/// A 0-1 ratio as a whole percentage
pub fn format_ratio(ratio: f64) -> String {
    format!("{:.0}%", ratio * 100.0)
}

/// `None` is an infinite health factor (nothing borrowed)
pub fn format_health_factor(health_factor: Option<f64>) -> String {
    match health_factor {
        Some(hf) if hf.is_finite() => format!("{:.2}", hf),
        _ => "∞".to_string(),
    }
}
