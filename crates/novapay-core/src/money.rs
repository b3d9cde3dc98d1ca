use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Neg, Sub};

/// Signed MXN amount in centavos.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_minor(centavos: i64) -> Self {
        Self(centavos)
    }

    pub const fn from_pesos(pesos: i64) -> Self {
        Self(pesos * 100)
    }

    pub const fn minor(self) -> i64 {
        self.0
    }

    pub const fn abs(self) -> Self {
        Self(self.0.abs())
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Parses user-entered pesos such as `"1500"`, `"1,500.5"` or `".75"`.
    ///
    /// Signs, exponents and more than two decimals are rejected.
    pub fn parse_pesos(input: &str) -> Option<Self> {
        let cleaned: String = input.trim().chars().filter(|c| *c != ',').collect();
        if cleaned.is_empty() {
            return None;
        }

        let (whole, fraction) = match cleaned.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (cleaned.as_str(), ""),
        };
        if whole.is_empty() && fraction.is_empty() {
            return None;
        }
        if fraction.len() > 2
            || !whole.chars().all(|c| c.is_ascii_digit())
            || !fraction.chars().all(|c| c.is_ascii_digit())
        {
            return None;
        }

        let pesos: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().ok()?
        };
        let centavos: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().ok()? * 10,
            _ => fraction.parse().ok()?,
        };

        pesos
            .checked_mul(100)
            .and_then(|minor| minor.checked_add(centavos))
            .map(Self)
    }

    /// es-MX rendering of the absolute value, e.g. `$47,832.50`.
    pub fn format_abs(self) -> String {
        let minor = self.0.unsigned_abs();
        let pesos = (minor / 100).to_string();
        let centavos = minor % 100;

        let mut grouped = String::with_capacity(pesos.len() + pesos.len() / 3);
        for (idx, digit) in pesos.chars().enumerate() {
            if idx > 0 && (pesos.len() - idx) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(digit);
        }

        format!("${grouped}.{centavos:02}")
    }

    /// Movement-list rendering: `+$5,000.00` for credits, `-$219.00` for debits.
    pub fn format_signed(self) -> String {
        let sign = if self.is_negative() { '-' } else { '+' };
        format!("{sign}{}", self.format_abs())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            write!(f, "-{}", self.format_abs())
        } else {
            f.write_str(&self.format_abs())
        }
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_thousands_separators() {
        assert_eq!(Money::from_minor(4_783_250).to_string(), "$47,832.50");
        assert_eq!(Money::from_minor(5).to_string(), "$0.05");
        assert_eq!(Money::from_minor(100_000_000).to_string(), "$1,000,000.00");
        assert_eq!(Money::from_minor(-124_999).to_string(), "-$1,249.99");
    }

    #[test]
    fn signed_format_marks_direction() {
        assert_eq!(Money::from_minor(500_000).format_signed(), "+$5,000.00");
        assert_eq!(Money::from_minor(-21_900).format_signed(), "-$219.00");
    }

    #[test]
    fn parses_user_amounts() {
        assert_eq!(Money::parse_pesos("1500"), Some(Money::from_minor(150_000)));
        assert_eq!(Money::parse_pesos(" 12.5 "), Some(Money::from_minor(1_250)));
        assert_eq!(Money::parse_pesos("1,249.99"), Some(Money::from_minor(124_999)));
        assert_eq!(Money::parse_pesos(".75"), Some(Money::from_minor(75)));
    }

    #[test]
    fn rejects_malformed_amounts() {
        for raw in ["", " ", ".", "-5", "1.234", "12a", "1e3", "+3"] {
            assert_eq!(Money::parse_pesos(raw), None, "input {raw:?}");
        }
    }
}
