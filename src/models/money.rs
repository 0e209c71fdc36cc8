//! Amount type for representing currency amounts
//!
//! Wraps a `rust_decimal::Decimal` so that shares produced by percentage and
//! equal-split rules keep their full precision until they are displayed.
//! Rounding to cents happens only at the formatting boundary.
//!
//! Amounts are read and written in the Spanish locale convention: `.` groups
//! thousands and `,` separates decimals ("1.234,56" is 1234.56).

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

/// A monetary amount in euros with arbitrary decimal precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(Decimal);

impl Amount {
    /// Create an amount from a decimal value
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Create a zero amount
    pub const fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Create an amount from whole cents
    ///
    /// # Examples
    /// ```
    /// use cuotas_cli::models::Amount;
    /// let amount = Amount::from_cents(49440); // 494,40 €
    /// assert_eq!(amount.format_locale(), "494,40");
    /// ```
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// Create an amount from a float
    ///
    /// Returns `None` for NaN, infinities and values outside the decimal range.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        Decimal::from_str(&value.to_string()).ok().map(Self)
    }

    /// Get the underlying decimal value
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Check if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Check if the amount is below zero
    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Get the absolute value
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Add two amounts, returning `None` on overflow
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Sum a sequence of amounts, returning `None` on overflow
    pub fn checked_sum<I>(amounts: I) -> Option<Self>
    where
        I: IntoIterator<Item = Amount>,
    {
        amounts
            .into_iter()
            .try_fold(Amount::zero(), |acc, amount| acc.checked_add(amount))
    }

    /// Round to cents, half away from zero
    pub fn round_cents(&self) -> Self {
        Self(
            self.0
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Parse an amount written in the locale convention
    ///
    /// Accepts "1.234,56", "-12,5", "300", "1.000", "0,99 €".
    /// Thousands groups must be well formed: "1234.5" is rejected rather than
    /// read as 12345.
    pub fn parse_locale(raw: &str) -> Result<Self, AmountParseError> {
        let s = raw.trim();
        let s = s
            .strip_suffix('€')
            .or_else(|| s.strip_prefix('€'))
            .unwrap_or(s)
            .trim();

        if s.is_empty() {
            return Err(AmountParseError::Empty);
        }

        let invalid = || AmountParseError::InvalidFormat(raw.trim().to_string());

        let (negative, unsigned) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };

        let mut parts = unsigned.split(',');
        let int_part = parts.next().unwrap_or("");
        let frac_part = parts.next();
        if parts.next().is_some() {
            return Err(invalid());
        }

        let int_digits = if int_part.contains('.') {
            let groups: Vec<&str> = int_part.split('.').collect();
            let head = groups[0];
            if head.is_empty() || head.len() > 3 || groups[1..].iter().any(|g| g.len() != 3) {
                return Err(invalid());
            }
            groups.concat()
        } else {
            int_part.to_string()
        };

        if !int_digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let normalized = match frac_part {
            Some(frac) => {
                if frac.is_empty() || !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                let int_digits = if int_digits.is_empty() { "0" } else { &int_digits };
                format!("{}.{}", int_digits, frac)
            }
            None => {
                if int_digits.is_empty() {
                    return Err(invalid());
                }
                int_digits
            }
        };

        let value = Decimal::from_str(&normalized).map_err(|_| invalid())?;
        Ok(Self(if negative { -value } else { value }))
    }

    /// Format with two decimals in the locale convention ("1.234,56")
    pub fn format_locale(&self) -> String {
        let rounded = self.round_cents().0;
        let plain = format!("{:.2}", rounded.abs());
        let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

        let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
        for (i, ch) in int_part.chars().enumerate() {
            if i > 0 && (int_part.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        if rounded.is_sign_negative() && !rounded.is_zero() {
            format!("-{},{}", grouped, frac_part)
        } else {
            format!("{},{}", grouped, frac_part)
        }
    }

    /// Format with two decimals and a `.` decimal point, for CSV exports
    pub fn format_fixed(&self) -> String {
        format!("{:.2}", self.round_cents().0)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} €", self.format_locale())
    }
}

impl Sub for Amount {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

/// Error type for amount parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmountParseError {
    Empty,
    InvalidFormat(String),
}

impl fmt::Display for AmountParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmountParseError::Empty => write!(f, "Missing amount"),
            AmountParseError::InvalidFormat(s) => write!(f, "Invalid amount format: '{}'", s),
        }
    }
}

impl std::error::Error for AmountParseError {}

impl From<AmountParseError> for crate::error::CuotasError {
    fn from(err: AmountParseError) -> Self {
        Self::Parse(err.to_string())
    }
}
