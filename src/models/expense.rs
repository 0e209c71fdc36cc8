//! Expense line items
//!
//! An expense item is one row of the community budget: a concept and the
//! yearly amount spent on it.

use serde::{Deserialize, Serialize};

use super::money::Amount;
use super::pool::Pool;
use crate::error::{CuotasError, CuotasResult};

/// A single (concept, amount) line of the community budget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseItem {
    /// Free text description, used for classification
    pub concept: String,
    /// Yearly amount
    pub amount: Amount,
}

impl ExpenseItem {
    /// Create a new expense item
    pub fn new(concept: impl Into<String>, amount: Amount) -> Self {
        Self {
            concept: concept.into(),
            amount,
        }
    }

    /// Create an expense item from a float amount
    ///
    /// Fails with `InvalidInput` when the amount is NaN, infinite, or too
    /// large to be held as a decimal.
    pub fn try_from_f64(concept: impl Into<String>, amount: f64) -> CuotasResult<Self> {
        let concept = concept.into();
        if !amount.is_finite() {
            return Err(CuotasError::InvalidInput(format!(
                "amount for '{}' is not a finite number: {}",
                concept, amount
            )));
        }
        let amount = Amount::from_f64(amount).ok_or_else(|| {
            CuotasError::InvalidInput(format!(
                "amount for '{}' is out of range: {:e}",
                concept, amount
            ))
        })?;
        Ok(Self { concept, amount })
    }

    /// The pool this item is charged to
    pub fn pool(&self) -> Pool {
        Pool::classify(&self.concept)
    }
}
