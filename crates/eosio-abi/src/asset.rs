//! Token symbols and assets

use std::fmt;
use std::str::FromStr;

use crate::io::take_array;
use crate::{AbiDecode, AbiEncode, CodecError};

/// Highest supported precision
pub const MAX_PRECISION: u8 = 16;

/// Longest symbol code
pub const MAX_CODE_LEN: usize = 7;

/// Precision plus a 1 to 7 letter `A-Z` code, e.g. `4,WAX`
///
/// Encoded as the precision byte followed by the code, zero padded to
/// eight bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol {
    precision: u8,
    code: String,
}

impl Symbol {
    /// Validate precision and code
    pub fn new(precision: u8, code: impl Into<String>) -> Result<Self, CodecError> {
        let code = code.into();
        let invalid = |reason: String| CodecError::InvalidSymbol {
            value: format!("{},{}", precision, code),
            reason,
        };
        if precision > MAX_PRECISION {
            return Err(invalid(format!(
                "precision must be between 0 and {} inclusive",
                MAX_PRECISION
            )));
        }
        if code.is_empty()
            || code.len() > MAX_CODE_LEN
            || !code.bytes().all(|c| c.is_ascii_uppercase())
        {
            return Err(invalid(format!(
                "code {:?} must be A-Z and 1 to {} characters",
                code, MAX_CODE_LEN
            )));
        }
        Ok(Symbol { precision, code })
    }

    /// Number of fractional digits
    pub fn precision(&self) -> u8 {
        self.precision
    }

    /// Currency code
    pub fn code(&self) -> &str {
        &self.code
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.precision, self.code)
    }
}

impl FromStr for Symbol {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| CodecError::InvalidSymbol {
            value: s.to_string(),
            reason: reason.to_string(),
        };
        let (precision, code) = s
            .split_once(',')
            .ok_or_else(|| invalid("expected \"<precision>,<CODE>\""))?;
        if precision.is_empty() || !precision.bytes().all(|c| c.is_ascii_digit()) {
            return Err(invalid("precision must be a non-negative integer"));
        }
        let precision: u8 = precision
            .parse()
            .map_err(|_| invalid("precision must be between 0 and 16 inclusive"))?;
        Symbol::new(precision, code)
    }
}

impl AbiEncode for Symbol {
    fn encode(&self, out: &mut Vec<u8>) {
        let mut raw = [0u8; 8];
        raw[0] = self.precision;
        raw[1..1 + self.code.len()].copy_from_slice(self.code.as_bytes());
        out.extend_from_slice(&raw);
    }

    fn encoded_len(&self) -> usize {
        8
    }
}

impl AbiDecode for Symbol {
    fn decode(input: &mut &[u8]) -> Result<Self, CodecError> {
        let raw = take_array::<8>(input)?;
        let code_bytes = &raw[1..];
        let end = code_bytes.iter().position(|&b| b == 0).unwrap_or(code_bytes.len());
        if code_bytes[end..].iter().any(|&b| b != 0) {
            return Err(CodecError::InvalidSymbol {
                value: hex::encode(raw),
                reason: "code bytes after the null padding".into(),
            });
        }
        let code = std::str::from_utf8(&code_bytes[..end]).map_err(|_| CodecError::InvalidSymbol {
            value: hex::encode(raw),
            reason: "code is not ascii".into(),
        })?;
        Symbol::new(raw[0], code)
    }
}

/// Token amount with its symbol, e.g. `99.9 WAX`
///
/// The amount is stored as an integer with the decimal point removed; the
/// precision of the symbol is the number of fractional digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Asset {
    amount: u64,
    symbol: Symbol,
}

impl Asset {
    /// Build from an integer amount and a symbol
    pub fn new(amount: u64, symbol: Symbol) -> Self {
        Asset { amount, symbol }
    }

    /// Amount in the smallest unit
    pub fn amount(&self) -> u64 {
        self.amount
    }

    /// Symbol of the asset
    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    fn parse_amount(text: &str, full: &str) -> Result<(u64, u8), CodecError> {
        let invalid = |reason: String| CodecError::InvalidAsset {
            value: full.to_string(),
            reason,
        };
        if text.starts_with('-') {
            return Err(invalid("amount must not be negative".into()));
        }
        let (int_digits, frac_digits) = match text.split_once('.') {
            Some((int_digits, frac_digits)) => {
                if frac_digits.is_empty() {
                    return Err(invalid("decimal point must be followed by a digit".into()));
                }
                (int_digits, frac_digits)
            }
            None => (text, ""),
        };
        if int_digits.is_empty() {
            return Err(invalid("amount needs at least one integer digit".into()));
        }
        if !int_digits.bytes().chain(frac_digits.bytes()).all(|c| c.is_ascii_digit()) {
            return Err(invalid(format!("amount {:?} is not a decimal number", text)));
        }
        if frac_digits.len() > usize::from(MAX_PRECISION) {
            return Err(invalid(format!(
                "at most {} fractional digits allowed, got {}",
                MAX_PRECISION,
                frac_digits.len()
            )));
        }
        let digits = format!("{}{}", int_digits, frac_digits);
        let amount = digits.parse::<u64>().map_err(|_| {
            invalid(format!(
                "amount {} does not fit [0, {}]",
                digits,
                u64::MAX
            ))
        })?;
        // bounded by MAX_PRECISION above
        Ok((amount, frac_digits.len() as u8))
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = usize::from(self.symbol.precision);
        let digits = format!("{:0>width$}", self.amount, width = precision + 1);
        let (int_part, frac_part) = digits.split_at(digits.len() - precision);
        if frac_part.is_empty() {
            write!(f, "{} {}", int_part, self.symbol.code)
        } else {
            write!(f, "{}.{} {}", int_part, frac_part, self.symbol.code)
        }
    }
}

impl FromStr for Asset {
    type Err = CodecError;

    /// Surrounding whitespace is ignored; inside, exactly one space is allowed
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (amount, code) = s.trim().split_once(' ').ok_or_else(|| CodecError::InvalidAsset {
            value: s.to_string(),
            reason: "expected \"<amount> <CODE>\" separated by one space".into(),
        })?;
        if code.contains(' ') {
            return Err(CodecError::InvalidAsset {
                value: s.to_string(),
                reason: "amount and code must be separated by exactly one space".into(),
            });
        }
        let (amount, precision) = Asset::parse_amount(amount, s)?;
        let symbol = Symbol::new(precision, code)?;
        Ok(Asset { amount, symbol })
    }
}

impl AbiEncode for Asset {
    fn encode(&self, out: &mut Vec<u8>) {
        self.amount.encode(out);
        self.symbol.encode(out);
    }

    fn encoded_len(&self) -> usize {
        16
    }
}

impl AbiDecode for Asset {
    fn decode(input: &mut &[u8]) -> Result<Self, CodecError> {
        let amount = u64::decode(input)?;
        let symbol = Symbol::decode(input)?;
        Ok(Asset { amount, symbol })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ===== Symbol =====

    #[test]
    fn test_symbol_vectors() {
        let cases = [
            ("0,W", "0057000000000000"),
            ("0,WAXXXXX", "0057415858585858"),
            ("1,WAX", "0157415800000000"),
            ("16,WAX", "1057415800000000"),
        ];
        for (text, expected) in cases {
            let symbol: Symbol = text.parse().unwrap();
            assert_eq!(hex::encode(symbol.to_bytes()), expected, "{}", text);
            assert_eq!(Symbol::from_bytes(&symbol.to_bytes()).unwrap(), symbol);
            assert_eq!(symbol.to_string(), text);
        }
    }

    #[test]
    fn test_symbol_rejects() {
        for bad in ["17,WAX", "-1,WAX", "1,wax", "1,", "1,WAXXXXXX", "WAX", "a,WAX", "1,W4X"] {
            assert!(bad.parse::<Symbol>().is_err(), "{:?} should be rejected", bad);
        }
    }

    #[test]
    fn test_symbol_decode_garbage_after_padding() {
        let raw = hex::decode("0157004100000000").unwrap();
        assert!(matches!(
            Symbol::from_bytes(&raw),
            Err(CodecError::InvalidSymbol { .. })
        ));
    }

    // ===== Asset =====

    #[test]
    fn test_asset_vectors() {
        let asset: Asset = "99.9 WAX".parse().unwrap();
        assert_eq!(asset.amount(), 999);
        assert_eq!(asset.symbol().precision(), 1);
        assert_eq!(hex::encode(asset.to_bytes()), "e7030000000000000157415800000000");
        let asset: Asset = "99 WAX".parse().unwrap();
        assert_eq!(hex::encode(asset.to_bytes()), "63000000000000000057415800000000");
    }

    #[test]
    fn test_asset_decode_reinserts_point() {
        for text in ["99.9 WAX", "0.0005 WAX", "1.00000000 EOS", "12 TOKEN", "0.1 A"] {
            let asset: Asset = text.parse().unwrap();
            let decoded = Asset::from_bytes(&asset.to_bytes()).unwrap();
            assert_eq!(decoded.to_string(), text);
        }
    }

    #[test]
    fn test_asset_pads_small_amounts() {
        let asset = Asset::new(5, Symbol::new(4, "WAX").unwrap());
        assert_eq!(asset.to_string(), "0.0005 WAX");
    }

    #[test]
    fn test_asset_amount_bounds() {
        assert!("18446744073709551615 WAX".parse::<Asset>().is_ok());
        assert!("18446744073709551616 WAX".parse::<Asset>().is_err());
        assert!("1844674407370955161.5 WAX".parse::<Asset>().is_ok());
    }

    #[test]
    fn test_asset_ignores_surrounding_whitespace() {
        let asset: Asset = " 99.9 WAX ".parse().unwrap();
        assert_eq!(asset, "99.9 WAX".parse::<Asset>().unwrap());
        assert_eq!(asset.to_string(), "99.9 WAX");
        assert!("\t1.0000 WAX\n".parse::<Asset>().is_ok());
    }

    #[test]
    fn test_asset_rejects() {
        for bad in [
            "-1 WAX",
            "1. WAX",
            ".5 WAX",
            "1.5  WAX",
            "1.5WAX",
            "1,5 WAX",
            "1.5 wax",
            "1.12345678901234567 WAX",
            "",
        ] {
            assert!(bad.parse::<Asset>().is_err(), "{:?} should be rejected", bad);
        }
    }
}
