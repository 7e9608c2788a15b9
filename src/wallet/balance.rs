//! CIP-30 balance decoding
//!
//! `getBalance()` answers with `cbor<value>` as hex: either a bare coin
//! amount or `[coin, multiasset]`. Only the coin is displayed.

use super::error::ProviderError;

/// Decode the lovelace amount from a CIP-30 balance hex string.
pub fn decode_cbor_coin(raw_hex: &str) -> Result<u64, ProviderError> {
    let bytes = hex::decode(raw_hex.trim())
        .map_err(|e| ProviderError::InvalidResponse(format!("balance is not hex: {}", e)))?;

    let (major, info, rest) = split_head(&bytes)?;
    match major {
        0 => {
            let (value, rest) = read_uint(info, rest)?;
            if !rest.is_empty() {
                return Err(ProviderError::InvalidResponse(format!(
                    "{} trailing bytes after balance",
                    rest.len()
                )));
            }
            Ok(value)
        }
        4 => {
            // value = [coin, multiasset]
            if info != 2 {
                return Err(ProviderError::InvalidResponse(format!(
                    "balance array has {} items, expected 2",
                    info
                )));
            }
            let (major, info, rest) = split_head(rest)?;
            if major != 0 {
                return Err(ProviderError::InvalidResponse(format!(
                    "balance coin has CBOR major type {}",
                    major
                )));
            }
            let (value, rest) = read_uint(info, rest)?;
            if rest.is_empty() {
                return Err(ProviderError::InvalidResponse(
                    "balance multiasset is missing".to_string(),
                ));
            }
            Ok(value)
        }
        other => Err(ProviderError::InvalidResponse(format!(
            "unexpected CBOR major type {} for balance",
            other
        ))),
    }
}

/// Normalize a raw `getBalance()` answer into decimal lovelace.
pub fn normalize_cip30_balance(raw_hex: &str) -> Result<String, ProviderError> {
    decode_cbor_coin(raw_hex).map(|coin| coin.to_string())
}

fn split_head(bytes: &[u8]) -> Result<(u8, u8, &[u8]), ProviderError> {
    let (first, rest) = bytes
        .split_first()
        .ok_or_else(|| ProviderError::InvalidResponse("empty balance".to_string()))?;
    Ok((first >> 5, first & 0x1f, rest))
}

fn read_uint(info: u8, rest: &[u8]) -> Result<(u64, &[u8]), ProviderError> {
    let width = match info {
        0..=23 => return Ok((info as u64, rest)),
        24 => 1,
        25 => 2,
        26 => 4,
        27 => 8,
        _ => {
            return Err(ProviderError::InvalidResponse(format!(
                "unsupported CBOR integer encoding {}",
                info
            )))
        }
    };

    if rest.len() < width {
        return Err(ProviderError::InvalidResponse(
            "truncated balance".to_string(),
        ));
    }

    let value = rest[..width]
        .iter()
        .fold(0u64, |acc, b| (acc << 8) | *b as u64);
    Ok((value, &rest[width..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_coin() {
        // 1_000_000 lovelace as CBOR uint32
        assert_eq!(decode_cbor_coin("1a000f4240").unwrap(), 1_000_000);
        assert_eq!(decode_cbor_coin("00").unwrap(), 0);
        assert_eq!(decode_cbor_coin("17").unwrap(), 23);
        assert_eq!(decode_cbor_coin("1864").unwrap(), 100);
    }

    #[test]
    fn test_coin_with_multiasset() {
        // [5_000_000, {}]
        assert_eq!(decode_cbor_coin("821a004c4b40a0").unwrap(), 5_000_000);
        assert_eq!(
            normalize_cip30_balance("821b000000174876e800a0").unwrap(),
            "100000000000"
        );
    }

    #[test]
    fn test_invalid_balances() {
        assert!(matches!(
            decode_cbor_coin("zz"),
            Err(ProviderError::InvalidResponse(_))
        ));
        assert!(decode_cbor_coin("").is_err());
        assert!(decode_cbor_coin("80").is_err());
        assert!(decode_cbor_coin("1a000f").is_err());
        assert!(decode_cbor_coin("6161").is_err());
    }

    #[test]
    fn test_leftover_bytes_are_rejected() {
        assert!(matches!(
            decode_cbor_coin("1a000f4240ff"),
            Err(ProviderError::InvalidResponse(_))
        ));
        // one-item array and array without its multiasset
        assert!(decode_cbor_coin("811a000f4240").is_err());
        assert!(decode_cbor_coin("821a000f4240").is_err());
    }
}
