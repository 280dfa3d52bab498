//! # Money Module
//!
//! Provides the `Money` type and the counter's currency formatting.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    A cashier types "4,50" once, it becomes 450 cents, and every        │
//! │    line total, subtotal and change after that is exact integer math.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cafe_core::money::{self, Money};
//!
//! let espresso = money::to_minor_units(4.5).unwrap();
//! assert_eq!(espresso, Money::from_cents(450));
//!
//! let two = espresso.multiply_quantity(2);
//! assert_eq!(money::format(two.cents()), "R$ 9,00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in cents (the smallest unit of the currency).
///
/// Signed so that differences (cash received minus subtotal) can be
/// expressed; every stored price and amount is checked to be `>= 0` at the
/// boundary where it enters the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use cafe_core::money::Money;
    ///
    /// let price = Money::from_cents(350); // R$ 3,50
    /// assert_eq!(price.cents(), 350);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Multiplies a unit price by a quantity.
    ///
    /// ```rust
    /// use cafe_core::money::Money;
    ///
    /// let cafe = Money::from_cents(350);
    /// assert_eq!(cafe.multiply_quantity(2).cents(), 700);
    /// ```
    ///
    /// Callers keep `price × quantity` within range; see
    /// [`Money::checked_multiply_quantity`].
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Multiplies a unit price by a quantity, `None` on overflow.
    ///
    /// ```rust
    /// use cafe_core::money::Money;
    ///
    /// assert!(Money::from_cents(450).checked_multiply_quantity(i64::MAX).is_none());
    /// ```
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Adds two amounts, `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }
}

// =============================================================================
// Conversion From Decimal Amounts
// =============================================================================

/// Converts a decimal amount (e.g. `4.5`) to cents.
///
/// ## Rounding
/// Rounds to the nearest cent, half-up: `0.125 → 13`. The scaled value is
/// computed in `f64`, so an amount like `1.005` (stored as
/// `1.00499999...`) rounds to `100`, the same way the amount was always
/// rounded at the counter.
///
/// ## Errors
/// [`CoreError::InvalidAmount`] if the amount is negative, NaN or infinite.
pub fn to_minor_units(amount: f64) -> CoreResult<Money> {
    if !amount.is_finite() {
        return Err(CoreError::invalid_amount("must be a finite number"));
    }

    if amount < 0.0 {
        return Err(CoreError::invalid_amount("must not be negative"));
    }

    // f64::round is half-away-from-zero, which is half-up for amount >= 0
    let cents = (amount * 100.0).round();
    if cents >= i64::MAX as f64 {
        return Err(CoreError::invalid_amount("too large"));
    }

    Ok(Money::from_cents(cents as i64))
}

/// Parses an amount the way a cashier types it.
///
/// Accepts `"4.50"`, `"4,50"`, `"R$ 4,50"` and grouped forms such as
/// `"1.234,56"` or `"1,234.56"`. An optional leading `R$` or `$` is
/// ignored; any other text is rejected.
///
/// ## Separators
/// When both separators appear, the last one is the decimal separator.
/// A lone separator is always decimal, so `"1.000"` is one real and
/// `"1000"` or `"1.000,00"` is one thousand.
///
/// ```rust
/// use cafe_core::money::parse_amount;
///
/// assert_eq!(parse_amount("R$ 1.234,56").unwrap().cents(), 123456);
/// assert_eq!(parse_amount("7").unwrap().cents(), 700);
/// assert_eq!(parse_amount("1.000").unwrap().cents(), 100);
/// assert!(parse_amount("sete").is_err());
/// assert!(parse_amount("x10").is_err());
/// ```
pub fn parse_amount(input: &str) -> CoreResult<Money> {
    let trimmed = input.trim();
    let trimmed = ["R$", "$"]
        .iter()
        .find_map(|symbol| trimmed.strip_prefix(*symbol))
        .unwrap_or(trimmed)
        .trim();

    if trimmed.is_empty() {
        return Err(CoreError::invalid_amount("amount is required"));
    }

    if !trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
    {
        return Err(CoreError::invalid_amount(format!("not a number: {}", input.trim())));
    }

    let normalized = match (trimmed.rfind(','), trimmed.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => trimmed.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => trimmed.replace(',', ""),
        (Some(_), None) => trimmed.replace(',', "."),
        _ => trimmed.to_string(),
    };

    let amount: f64 = normalized
        .parse()
        .map_err(|_| CoreError::invalid_amount(format!("not a number: {}", input.trim())))?;

    to_minor_units(amount)
}

// =============================================================================
// Currency Formatting
// =============================================================================

/// The currency convention used on screen and on receipts.
///
/// ## Default (pt-BR / BRL)
/// ```text
/// symbol              "R$"
/// symbol_separator    " "
/// decimal_separator   ","
/// thousands_separator "."
///
///   1300   → "R$ 13,00"
///   123456 → "R$ 1.234,56"
///   -550   → "-R$ 5,50"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct CurrencyFormat {
    /// Currency symbol placed before the amount.
    pub symbol: String,
    /// Text between the symbol and the digits.
    pub symbol_separator: String,
    /// Separator between whole units and cents.
    pub decimal_separator: String,
    /// Separator between groups of three digits; may be empty.
    pub thousands_separator: String,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        CurrencyFormat {
            symbol: "R$".to_string(),
            symbol_separator: " ".to_string(),
            decimal_separator: ",".to_string(),
            thousands_separator: ".".to_string(),
        }
    }
}

impl CurrencyFormat {
    /// Formats a cent amount under this convention.
    ///
    /// ```rust
    /// use cafe_core::money::CurrencyFormat;
    ///
    /// let usd = CurrencyFormat {
    ///     symbol: "$".to_string(),
    ///     symbol_separator: String::new(),
    ///     decimal_separator: ".".to_string(),
    ///     thousands_separator: ",".to_string(),
    /// };
    /// assert_eq!(usd.format(123456), "$1,234.56");
    /// ```
    pub fn format(&self, cents: i64) -> String {
        let sign = if cents < 0 { "-" } else { "" };
        let abs = cents.unsigned_abs();
        let units = group_thousands(abs / 100, &self.thousands_separator);

        format!(
            "{}{}{}{}{}{:02}",
            sign,
            self.symbol,
            self.symbol_separator,
            units,
            self.decimal_separator,
            abs % 100
        )
    }

    /// Parses operator input, also accepting this convention's symbol.
    ///
    /// ```rust
    /// use cafe_core::money::CurrencyFormat;
    ///
    /// let eur = CurrencyFormat { symbol: "€".to_string(), ..CurrencyFormat::default() };
    /// assert_eq!(eur.parse("€ 2,50").unwrap().cents(), 250);
    /// ```
    pub fn parse(&self, input: &str) -> CoreResult<Money> {
        let trimmed = input.trim();
        let trimmed = if self.symbol.is_empty() {
            trimmed
        } else {
            trimmed.strip_prefix(self.symbol.as_str()).unwrap_or(trimmed)
        };
        parse_amount(trimmed)
    }
}

/// Formats cents under the default convention.
///
/// ```rust
/// assert_eq!(cafe_core::money::format(1300), "R$ 13,00");
/// ```
pub fn format(cents: i64) -> String {
    CurrencyFormat::default().format(cents)
}

fn group_thousands(value: u64, separator: &str) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 * separator.len());

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }

    out
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display uses the default (receipt) convention.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format(self.0))
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
    }

    #[test]
    fn test_to_minor_units_rounds_half_up() {
        assert_eq!(to_minor_units(4.5).unwrap().cents(), 450);
        assert_eq!(to_minor_units(3.5).unwrap().cents(), 350);
        assert_eq!(to_minor_units(0.125).unwrap().cents(), 13);
        assert_eq!(to_minor_units(0.004).unwrap().cents(), 0);
        assert_eq!(to_minor_units(0.0).unwrap().cents(), 0);
    }

    #[test]
    fn test_to_minor_units_rejects_bad_amounts() {
        assert!(matches!(
            to_minor_units(-0.01),
            Err(CoreError::InvalidAmount { .. })
        ));
        assert!(matches!(
            to_minor_units(f64::NAN),
            Err(CoreError::InvalidAmount { .. })
        ));
        assert!(matches!(
            to_minor_units(f64::INFINITY),
            Err(CoreError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("4.50").unwrap().cents(), 450);
        assert_eq!(parse_amount("4,50").unwrap().cents(), 450);
        assert_eq!(parse_amount(" R$ 6,5 ").unwrap().cents(), 650);
        assert_eq!(parse_amount("1,234.56").unwrap().cents(), 123456);
        assert_eq!(parse_amount("1.234,56").unwrap().cents(), 123456);

        assert!(parse_amount("").is_err());
        assert!(parse_amount("R$").is_err());
        assert!(parse_amount("-3").is_err());
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("abc5").is_err());
        assert!(parse_amount("x10").is_err());
        assert!(parse_amount("troco 20").is_err());
        assert!(parse_amount("5 reais").is_err());
        assert!(parse_amount("1e3").is_err());
    }

    #[test]
    fn test_parse_amount_lone_separator_is_decimal() {
        assert_eq!(parse_amount("1.000").unwrap().cents(), 100);
        assert_eq!(parse_amount("1.000,00").unwrap().cents(), 100000);
        assert_eq!(parse_amount("1000").unwrap().cents(), 100000);
    }

    #[test]
    fn test_currency_format_parse() {
        let eur = CurrencyFormat {
            symbol: "€".to_string(),
            ..CurrencyFormat::default()
        };
        assert_eq!(eur.parse("€ 2,50").unwrap().cents(), 250);
        assert_eq!(eur.parse("2,50").unwrap().cents(), 250);
        assert!(eur.parse("€ dois").is_err());
        assert_eq!(CurrencyFormat::default().parse("R$ 4,50").unwrap().cents(), 450);
    }

    #[test]
    fn test_default_format() {
        assert_eq!(format(1300), "R$ 13,00");
        assert_eq!(format(0), "R$ 0,00");
        assert_eq!(format(5), "R$ 0,05");
        assert_eq!(format(99999), "R$ 999,99");
        assert_eq!(format(123456), "R$ 1.234,56");
        assert_eq!(format(123456789), "R$ 1.234.567,89");
        assert_eq!(format(-550), "-R$ 5,50");
    }

    #[test]
    fn test_format_without_grouping() {
        let plain = CurrencyFormat {
            thousands_separator: String::new(),
            ..CurrencyFormat::default()
        };
        assert_eq!(plain.format(123456789), "R$ 1234567,89");
    }

    #[test]
    fn test_display_uses_default_convention() {
        assert_eq!(Money::from_cents(650).to_string(), "R$ 6,50");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!(a.multiply_quantity(3).cents(), 3000);

        let total: Money = [a, b, b].into_iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_checked_arithmetic() {
        let price = Money::from_cents(450);
        assert_eq!(price.checked_multiply_quantity(2), Some(Money::from_cents(900)));
        assert_eq!(price.checked_multiply_quantity(99_999_999_999_999_999), None);

        assert_eq!(Money::zero().checked_add(price), Some(price));
        assert_eq!(Money::from_cents(i64::MAX).checked_add(price), None);
    }

    #[test]
    fn test_currency_format_deserializes_with_defaults() {
        let fmt: CurrencyFormat = serde_json::from_str(r#"{"symbol":"€"}"#).unwrap();
        assert_eq!(fmt.format(1300), "€ 13,00");
    }
}
