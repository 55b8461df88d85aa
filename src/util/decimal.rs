use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

/// Parses plain ("12.34") or scientific ("1.234e1") notation.
/// Surrounding whitespace is ignored.
pub fn parse_decimal(s: &str) -> Result<Decimal, rust_decimal::Error> {
    let trimmed = s.trim();
    match Decimal::from_str(trimmed) {
        Ok(d) => Ok(d),
        Err(e) => {
            if trimmed.contains(['e', 'E']) {
                Decimal::from_scientific(trimmed)
            } else {
                Err(e)
            }
        }
    }
}

/// Converts a float the way it would be read back from its shortest
/// textual representation, so 12.34f64 becomes exactly 12.34, rather than
/// the nearest binary fraction.
pub fn decimal_from_f64(f: f64) -> Option<Decimal> {
    if !f.is_finite() {
        return None;
    }
    Decimal::from_str(&f.to_string()).ok()
}

/// Rounds half-to-even to `dp` fractional digits, and sets the scale to
/// exactly `dp`, so the result always prints with that many digits.
pub fn round_fixed(d: Decimal, dp: u32) -> Decimal {
    let mut r = d.round_dp_with_strategy(dp, RoundingStrategy::MidpointNearestEven);
    r.rescale(dp);
    r
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::{decimal_from_f64, parse_decimal, round_fixed};

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("12.34").unwrap(), dec!(12.34));
        assert_eq!(parse_decimal(" 2.1\n").unwrap(), dec!(2.1));
        assert_eq!(parse_decimal("1.5e2").unwrap(), dec!(150));
        assert_eq!(parse_decimal("-3").unwrap(), dec!(-3));
        assert!(parse_decimal("").is_err());
        assert!(parse_decimal("hello").is_err());
        assert!(parse_decimal("1 USD").is_err());
    }

    #[test]
    fn test_decimal_from_f64() {
        assert_eq!(decimal_from_f64(12.34), Some(dec!(12.34)));
        assert_eq!(decimal_from_f64(0.22), Some(dec!(0.22)));
        assert_eq!(decimal_from_f64(107.3465), Some(dec!(107.3465)));
        assert_eq!(decimal_from_f64(81.0), Some(dec!(81)));
        assert_eq!(decimal_from_f64(f64::NAN), None);
        assert_eq!(decimal_from_f64(f64::INFINITY), None);
        // Beyond Decimal's range
        assert_eq!(decimal_from_f64(1e40), None);
    }

    #[test]
    fn test_round_fixed() {
        let r = round_fixed(dec!(1.234567), 5);
        assert_eq!(r, dec!(1.23457));
        assert_eq!(r.to_string(), "1.23457");

        let r = round_fixed(dec!(2.1), 5);
        assert_eq!(r, dec!(2.1));
        assert_eq!(r.to_string(), "2.10000");

        // Half to even
        assert_eq!(round_fixed(dec!(0.000025), 5), dec!(0.00002));
        assert_eq!(round_fixed(dec!(0.000035), 5), dec!(0.00004));
        assert_eq!(round_fixed(Decimal::ZERO, 5).to_string(), "0.00000");
    }
}
