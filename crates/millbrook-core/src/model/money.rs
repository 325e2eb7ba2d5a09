use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use serde::{Deserialize, Serialize};

/// Dollar amount held as whole cents.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub const fn from_dollars(dollars: i64) -> Self {
        Self(dollars * 100)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    pub const fn doubled(self) -> Self {
        Self(self.0 * 2)
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Splits the amount into `parts` shares that sum exactly to `self`.
    ///
    /// Remainder cents go to the earliest shares, so callers that iterate
    /// recipients in seat order get a stable assignment.
    pub fn split(self, parts: usize) -> Vec<Money> {
        if parts == 0 {
            return Vec::new();
        }
        let n = parts as i64;
        let quotient = self.0 / n;
        let remainder = self.0 % n;
        let step = remainder.signum();
        (0..n)
            .map(|i| {
                if i < remainder.abs() {
                    Money(quotient + step)
                } else {
                    Money(quotient)
                }
            })
            .collect()
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
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

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}${}.{:02}", abs / 100, abs % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::Money;
    use proptest::prelude::*;

    #[test]
    fn display_renders_dollars_and_cents() {
        assert_eq!(Money::from_cents(150).to_string(), "$1.50");
        assert_eq!(Money::from_cents(-50).to_string(), "-$0.50");
        assert_eq!(Money::from_dollars(10).to_string(), "$10.00");
    }

    #[test]
    fn split_hands_remainder_to_first_shares() {
        let parts = Money::from_cents(100).split(3);
        assert_eq!(
            parts,
            vec![
                Money::from_cents(34),
                Money::from_cents(33),
                Money::from_cents(33)
            ]
        );
    }

    #[test]
    fn split_negative_amount_stays_exact() {
        let parts = Money::from_cents(-101).split(2);
        assert_eq!(parts, vec![Money::from_cents(-51), Money::from_cents(-50)]);
    }

    #[test]
    fn split_into_zero_parts_is_empty() {
        assert!(Money::from_dollars(5).split(0).is_empty());
    }

    proptest! {
        #[test]
        fn split_always_sums_to_original(cents in -1_000_000i64..1_000_000, parts in 1usize..8) {
            let amount = Money::from_cents(cents);
            let shares = amount.split(parts);
            prop_assert_eq!(shares.len(), parts);
            prop_assert_eq!(shares.iter().sum::<Money>(), amount);
        }
    }
}
