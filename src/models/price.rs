use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Largest absolute value representable with five digits, two of them decimal.
pub const MAX_PRICE_CENTS: i64 = 99_999;

/// A recipe price with exactly two decimal places, held as whole cents.
///
/// Serialized as a decimal string (`"5.50"`). Accepts either a string or a
/// JSON number on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(i64);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PriceError {
    #[error("A valid number is required.")]
    Invalid,
    #[error("Ensure that there are no more than 2 decimal places.")]
    TooManyDecimals,
    #[error("Ensure that there are no more than 5 digits in total.")]
    TooManyDigits,
}

impl Price {
    pub fn from_cents(cents: i64) -> Result<Self, PriceError> {
        if cents.abs() > MAX_PRICE_CENTS {
            return Err(PriceError::TooManyDigits);
        }
        Ok(Price(cents))
    }

    pub fn cents(&self) -> i64 {
        self.0
    }

    fn from_f64(value: f64) -> Result<Self, PriceError> {
        if !value.is_finite() {
            return Err(PriceError::Invalid);
        }
        let scaled = value * 100.0;
        let rounded = scaled.round();
        if (scaled - rounded).abs() > 1e-6 {
            return Err(PriceError::TooManyDecimals);
        }
        if rounded.abs() > MAX_PRICE_CENTS as f64 {
            return Err(PriceError::TooManyDigits);
        }
        Price::from_cents(rounded as i64)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };

        let (whole, fraction) = match digits.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (digits, ""),
        };

        if whole.is_empty() && fraction.is_empty() {
            return Err(PriceError::Invalid);
        }
        if !whole.chars().all(|c| c.is_ascii_digit())
            || !fraction.chars().all(|c| c.is_ascii_digit())
        {
            return Err(PriceError::Invalid);
        }

        let fraction = fraction.trim_end_matches('0');
        if fraction.len() > 2 {
            return Err(PriceError::TooManyDecimals);
        }

        let whole = whole.trim_start_matches('0');
        if whole.len() > 3 {
            return Err(PriceError::TooManyDigits);
        }

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| PriceError::Invalid)?
        };
        let fraction: i64 = format!("{:0<2}", fraction)
            .parse()
            .map_err(|_| PriceError::Invalid)?;

        let cents = whole * 100 + fraction;
        Price::from_cents(if negative { -cents } else { cents })
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct PriceVisitor;

impl de::Visitor<'_> for PriceVisitor {
    type Value = Price;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a decimal number with at most 2 decimal places")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Price, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Price, E> {
        v.checked_mul(100)
            .ok_or(PriceError::TooManyDigits)
            .and_then(Price::from_cents)
            .map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Price, E> {
        i64::try_from(v)
            .map_err(|_| E::custom(PriceError::TooManyDigits))
            .and_then(|v| self.visit_i64(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Price, E> {
        Price::from_f64(v).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(PriceVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        assert_eq!("5.50".parse::<Price>().unwrap().to_string(), "5.50");
        assert_eq!("5.5".parse::<Price>().unwrap().cents(), 550);
        assert_eq!("12".parse::<Price>().unwrap().to_string(), "12.00");
        assert_eq!(".25".parse::<Price>().unwrap().cents(), 25);
        assert_eq!("-1.05".parse::<Price>().unwrap().to_string(), "-1.05");
        assert_eq!("4.500".parse::<Price>().unwrap().cents(), 450);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!("abc".parse::<Price>(), Err(PriceError::Invalid));
        assert_eq!("".parse::<Price>(), Err(PriceError::Invalid));
        assert_eq!("1.234".parse::<Price>(), Err(PriceError::TooManyDecimals));
        assert_eq!("1000.00".parse::<Price>(), Err(PriceError::TooManyDigits));
        assert_eq!("999.99".parse::<Price>().unwrap().cents(), 99_999);
    }

    #[test]
    fn test_deserialize_from_json_number_or_string() {
        let from_str: Price = serde_json::from_str("\"4.50\"").unwrap();
        let from_float: Price = serde_json::from_str("4.5").unwrap();
        let from_int: Price = serde_json::from_str("4").unwrap();

        assert_eq!(from_str.cents(), 450);
        assert_eq!(from_float.cents(), 450);
        assert_eq!(from_int.cents(), 400);
        assert!(serde_json::from_str::<Price>("4.555").is_err());
    }

    #[test]
    fn test_serializes_as_string() {
        let price = Price::from_cents(725).unwrap();
        assert_eq!(serde_json::to_string(&price).unwrap(), "\"7.25\"");
    }
}
