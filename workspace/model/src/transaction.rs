use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entities;

/// A single booked ledger movement as seen by the planning engines.
///
/// Positive amounts are inflows, negative amounts are outflows.
/// `balance` is the account balance right after the movement was booked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    organization_id: i32,
    date: NaiveDate,
    amount: Decimal,
    category: String,
    balance: Decimal,
}

impl Transaction {
    /// Creates a new Transaction.
    pub fn new(
        organization_id: i32,
        date: NaiveDate,
        amount: Decimal,
        category: impl Into<String>,
        balance: Decimal,
    ) -> Self {
        Self {
            organization_id,
            date,
            amount,
            category: category.into(),
            balance,
        }
    }

    pub fn organization_id(&self) -> i32 {
        self.organization_id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Checks if the transaction is money coming in.
    pub fn is_inflow(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    /// Checks if the transaction is money going out.
    pub fn is_outflow(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    /// Case-insensitive substring match against the category.
    pub fn category_matches(&self, needle: &str) -> bool {
        self.category
            .to_lowercase()
            .contains(&needle.to_lowercase())
    }
}

impl From<entities::transaction::Model> for Transaction {
    fn from(model: entities::transaction::Model) -> Self {
        Self {
            organization_id: model.organization_id,
            date: model.date,
            amount: model.amount,
            category: model.category,
            balance: model.balance,
        }
    }
}
