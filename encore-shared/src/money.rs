use serde::{Deserialize, Serialize};
use std::fmt;

/// Monetary amount in minor units (pence for GBP).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Money {
    pub amount: i64,
    pub currency: String,
}

impl Money {
    pub fn new(amount: i64, currency: &str) -> Self {
        Self {
            amount,
            currency: currency.to_string(),
        }
    }

    pub fn zero(currency: &str) -> Self {
        Self::new(0, currency)
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    /// A whole percentage of this amount, rounded to the nearest minor unit.
    pub fn percent(&self, pct: u32) -> Self {
        let scaled = (self.amount as i128 * pct as i128 + 50) / 100;
        Self::new(scaled as i64, &self.currency)
    }

    pub fn add(&self, other: &Money) -> Option<Self> {
        if self.currency != other.currency {
            return None;
        }
        Some(Self::new(self.amount + other.amount, &self.currency))
    }

    pub fn subtract(&self, other: &Money) -> Option<Self> {
        if self.currency != other.currency {
            return None;
        }
        Some(Self::new(self.amount - other.amount, &self.currency))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:02} {}",
            self.amount / 100,
            (self.amount % 100).abs(),
            self.currency
        )
    }
}
