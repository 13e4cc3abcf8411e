use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

/// Signed money amount represented as **integer minor units** (hundredths).
///
/// Every ledger figure (cash in, bank in, expenditures, balances, salaries)
/// goes through this type so the balance chain never accumulates
/// floating-point drift.
///
/// # Examples
///
/// ```rust
/// use engine::Amount;
///
/// let amount = Amount::new(12_34);
/// assert_eq!(amount.minor(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// ```
///
/// Arithmetic is checked: sums that leave the `i64` range are rejected with
/// [`EngineError::InvalidAmount`] instead of wrapping.
///
/// ```rust
/// use engine::Amount;
///
/// assert_eq!(Amount::new(500).add(Amount::new(200)).unwrap().minor(), 700);
/// assert!(Amount::new(i64::MAX).add(Amount::new(1)).is_err());
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Creates a new amount from integer minor units.
    #[must_use]
    pub const fn new(minor: i64) -> Self {
        Self(minor)
    }

    /// Returns the raw value in minor units.
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub fn add(self, rhs: Amount) -> ResultEngine<Amount> {
        self.0.checked_add(rhs.0).map(Amount).ok_or_else(too_large)
    }

    pub fn sub(self, rhs: Amount) -> ResultEngine<Amount> {
        self.0.checked_sub(rhs.0).map(Amount).ok_or_else(too_large)
    }

    /// Sums `amounts`, failing on the first overflow.
    pub fn sum<I>(amounts: I) -> ResultEngine<Amount>
    where
        I: IntoIterator<Item = Amount>,
    {
        amounts
            .into_iter()
            .try_fold(Amount::ZERO, |total, amount| total.add(amount))
    }

    /// Checked multiplication by an integer quantity.
    #[must_use]
    pub fn checked_mul(self, quantity: i64) -> Option<Amount> {
        self.0.checked_mul(quantity).map(Amount)
    }
}

fn too_large() -> EngineError {
    EngineError::InvalidAmount("amount too large".to_string())
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_two_decimals() {
        assert_eq!(Amount::new(0).to_string(), "0.00");
        assert_eq!(Amount::new(7).to_string(), "0.07");
        assert_eq!(Amount::new(130_000).to_string(), "1300.00");
        assert_eq!(Amount::new(-1050).to_string(), "-10.50");
    }

    #[test]
    fn sum_folds_from_zero() {
        let total = Amount::sum([Amount::new(500), Amount::new(-200)]).unwrap();
        assert_eq!(total, Amount::new(300));
        assert_eq!(Amount::sum(Vec::new()).unwrap(), Amount::ZERO);
    }

    #[test]
    fn overflow_is_an_error() {
        assert!(matches!(
            Amount::new(i64::MAX).add(Amount::new(1)),
            Err(EngineError::InvalidAmount(_))
        ));
        assert!(Amount::new(i64::MIN).sub(Amount::new(1)).is_err());
        assert!(Amount::sum([Amount::new(i64::MAX), Amount::new(1)]).is_err());
    }
}
