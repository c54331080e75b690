use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use std::str::FromStr;

/// fractional digits carried by every amount
pub const MONEY_SCALE: u32 = 2;

/// round half up (away from zero) to 2 places
pub fn round2(d: Decimal) -> Decimal {
    let mut rounded = d.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_SCALE);
    rounded
}

/// Money in currency units, always held at 2 decimal places
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);
    /// smallest representable amount
    pub const CENT: Money = Money(Decimal::from_parts(1, 0, 0, false, MONEY_SCALE));

    /// create from decimal, rounding half up to cents
    pub fn from_decimal(d: Decimal) -> Self {
        Money(round2(d))
    }

    /// create from string with exact parsing
    pub fn from_str_exact(s: &str) -> Result<Self, rust_decimal::Error> {
        Ok(Money::from_decimal(Decimal::from_str(s.trim())?))
    }

    /// create from integer amount (dollars, soles, etc)
    pub fn from_major(amount: i64) -> Self {
        Money::from_decimal(Decimal::from(amount))
    }

    /// create from cents
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, MONEY_SCALE))
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// strictly greater than zero
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    pub fn min(self, other: Self) -> Self {
        Money(self.0.min(other.0))
    }

    pub fn max(self, other: Self) -> Self {
        Money(self.0.max(other.0))
    }

    /// share of this amount for a percentage (e.g., 33.33% of $100 = $33.33)
    ///
    /// Saturates at the decimal range instead of overflowing.
    pub fn percentage(&self, percentage: Percentage) -> Self {
        let share = match self.0.checked_mul(percentage.as_decimal()) {
            Some(product) => product / Decimal::ONE_HUNDRED,
            None => self.0.saturating_mul(percentage.as_ratio()),
        };
        Money::from_decimal(share)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::from_str_exact(s)
    }
}

impl From<Decimal> for Money {
    fn from(d: Decimal) -> Self {
        Money::from_decimal(d)
    }
}

impl From<Money> for Decimal {
    fn from(m: Money) -> Self {
        m.0
    }
}

impl From<i32> for Money {
    fn from(i: i32) -> Self {
        Money::from_major(i as i64)
    }
}

impl From<u32> for Money {
    fn from(i: u32) -> Self {
        Money::from_major(i as i64)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money::from_decimal(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        *self = *self + other;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money::from_decimal(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Money) {
        *self = *self - other;
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
        iter.fold(Money::ZERO, |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

/// percentage in points, 50 means 50%
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Percentage(Decimal);

impl Percentage {
    pub const ZERO: Percentage = Percentage(Decimal::ZERO);
    pub const ONE_HUNDRED: Percentage = Percentage(Decimal::ONE_HUNDRED);

    pub fn from_decimal(d: Decimal) -> Self {
        Percentage(d)
    }

    /// create from whole points (e.g., 50 for 50%)
    pub fn from_points(points: u32) -> Self {
        Percentage(Decimal::from(points))
    }

    /// create from hundredths of a point (e.g., 3333 for 33.33%)
    pub fn from_hundredths(hundredths: i64) -> Self {
        Percentage(Decimal::new(hundredths, 2))
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// as a ratio (e.g., 0.5 for 50%)
    pub fn as_ratio(&self) -> Decimal {
        self.0 / Decimal::ONE_HUNDRED
    }

    /// strictly greater than zero
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// `None` when the sum leaves the decimal range
    pub fn checked_add(self, other: Percentage) -> Option<Percentage> {
        self.0.checked_add(other.0).map(Percentage)
    }

    /// distance from 100%, saturating
    pub fn deviation_from_full(&self) -> Decimal {
        self.0.saturating_sub(Decimal::ONE_HUNDRED).abs()
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl From<Decimal> for Percentage {
    fn from(d: Decimal) -> Self {
        Percentage::from_decimal(d)
    }
}

impl Add for Percentage {
    type Output = Percentage;

    fn add(self, other: Percentage) -> Percentage {
        Percentage(self.0.saturating_add(other.0))
    }
}

impl Sum for Percentage {
    fn sum<I: Iterator<Item = Percentage>>(iter: I) -> Percentage {
        iter.fold(Percentage::ZERO, |acc, x| acc + x)
    }
}
