//! Display formatting for wallet addresses and balances

/// Lovelace per ADA
pub const MINOR_UNITS_PER_MAJOR: u128 = 1_000_000;

const MIN_FRACTION_DIGITS: usize = 2;
const MAX_FRACTION_DIGITS: usize = 6;

/// Shorten an address for display: `addr1q...x7tzq0`.
///
/// Addresses of 12 characters or fewer are returned unchanged.
pub fn format_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 12 {
        return address.to_string();
    }

    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 6..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Render a minor-unit balance as major units.
///
/// Uses thousands separators and between 2 and 6 fractional digits.
/// Missing, empty, unparseable and zero balances render as `"0"`.
pub fn format_balance(balance_minor_units: Option<&str>) -> String {
    let minor = match balance_minor_units
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<u128>().ok())
    {
        Some(v) if v > 0 => v,
        _ => return "0".to_string(),
    };

    let whole = minor / MINOR_UNITS_PER_MAJOR;
    let fraction = minor % MINOR_UNITS_PER_MAJOR;

    let mut fraction_digits = format!("{:0width$}", fraction, width = MAX_FRACTION_DIGITS);
    while fraction_digits.len() > MIN_FRACTION_DIGITS && fraction_digits.ends_with('0') {
        fraction_digits.pop();
    }

    format!("{}.{}", group_thousands(whole), fraction_digits)
}

fn group_thousands(value: u128) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_addresses_unchanged() {
        assert_eq!(format_address(""), "");
        assert_eq!(format_address("addr1"), "addr1");
        assert_eq!(format_address("addr1qxyz123"), "addr1qxyz123");
    }

    #[test]
    fn test_long_address_shortened() {
        let address = "addr1q9ld7tzqxyzabc0123456789lmnop7tzq";
        let shortened = format_address(address);
        assert_eq!(shortened, "addr1q...op7tzq");

        assert_eq!(format_address("0123456789abc"), "012345...789abc");
    }

    #[test]
    fn test_balance_examples() {
        assert_eq!(format_balance(Some("1000000")), "1.00");
        assert_eq!(format_balance(Some("0")), "0");
        assert_eq!(format_balance(None), "0");
        assert_eq!(format_balance(Some("")), "0");
        assert_eq!(format_balance(Some("not-a-number")), "0");
    }

    #[test]
    fn test_balance_fraction_digits() {
        assert_eq!(format_balance(Some("1500000")), "1.50");
        assert_eq!(format_balance(Some("1234567")), "1.234567");
        assert_eq!(format_balance(Some("1230000")), "1.23");
        assert_eq!(format_balance(Some("1")), "0.000001");
        assert_eq!(format_balance(Some("100")), "0.0001");
    }

    #[test]
    fn test_balance_thousands_separators() {
        assert_eq!(format_balance(Some("1000000000")), "1,000.00");
        assert_eq!(format_balance(Some("1234567890123")), "1,234,567.890123");
        assert_eq!(format_balance(Some("999999000000")), "999,999.00");
    }

    #[test]
    fn test_balance_always_two_to_six_fraction_digits() {
        for raw in ["1", "10", "120000", "5000000", "45000000000000", "7654321"] {
            let formatted = format_balance(Some(raw));
            let fraction = formatted.split('.').nth(1).expect("fraction part");
            assert!(
                (2..=6).contains(&fraction.len()),
                "{} -> {}",
                raw,
                formatted
            );
        }
    }
}
