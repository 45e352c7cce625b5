use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use tracing::{debug, instrument};

use model::entities::transaction;
use model::transaction::Transaction;

use crate::error::{ComputeError, Result};

/// Where the calculators read historical transactions from.
///
/// Implementations return every transaction of the organization dated
/// within `start..=end`, ordered by date.
#[async_trait]
pub trait TransactionSource: Send + Sync {
    async fn transactions_between(
        &self,
        organization_id: i32,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Transaction>>;

    /// Most recent transaction of the organization dated on or before `on`.
    async fn latest_transaction(&self, organization_id: i32, on: NaiveDate) -> Result<Option<Transaction>>;
}

#[async_trait]
impl TransactionSource for DatabaseConnection {
    #[instrument(skip(self))]
    async fn transactions_between(
        &self,
        organization_id: i32,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Transaction>> {
        let rows = transaction::Entity::find()
            .filter(transaction::Column::OrganizationId.eq(organization_id))
            .filter(transaction::Column::Date.gte(start))
            .filter(transaction::Column::Date.lte(end))
            .order_by_asc(transaction::Column::Date)
            .order_by_asc(transaction::Column::Id)
            .all(self)
            .await
            .map_err(|e| ComputeError::Source(e.to_string()))?;

        debug!("Loaded {} transactions from the database", rows.len());
        Ok(rows.into_iter().map(Transaction::from).collect())
    }

    #[instrument(skip(self))]
    async fn latest_transaction(&self, organization_id: i32, on: NaiveDate) -> Result<Option<Transaction>> {
        let row = transaction::Entity::find()
            .filter(transaction::Column::OrganizationId.eq(organization_id))
            .filter(transaction::Column::Date.lte(on))
            .order_by_desc(transaction::Column::Date)
            .order_by_desc(transaction::Column::Id)
            .one(self)
            .await
            .map_err(|e| ComputeError::Source(e.to_string()))?;
        Ok(row.map(Transaction::from))
    }
}

/// In-memory source, used for imports and tests.
#[async_trait]
impl TransactionSource for Vec<Transaction> {
    async fn transactions_between(
        &self,
        organization_id: i32,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Transaction>> {
        let mut selected: Vec<Transaction> = self
            .iter()
            .filter(|t| t.organization_id() == organization_id)
            .filter(|t| t.date() >= start && t.date() <= end)
            .cloned()
            .collect();
        // Stable sort keeps insertion order for same-day rows
        selected.sort_by_key(|t| t.date());
        Ok(selected)
    }

    async fn latest_transaction(&self, organization_id: i32, on: NaiveDate) -> Result<Option<Transaction>> {
        // Last of the same-day rows wins, as with the database id order
        Ok(self
            .iter()
            .filter(|t| t.organization_id() == organization_id && t.date() <= on)
            .max_by_key(|t| t.date())
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{new_transaction, setup_db};
    use rust_decimal::Decimal;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_vec_source_filters_by_organization_and_range() {
        let source = vec![
            Transaction::new(1, date(2025, 3, 5), Decimal::new(100, 0), "Sales", Decimal::new(1100, 0)),
            Transaction::new(1, date(2025, 1, 5), Decimal::new(50, 0), "Sales", Decimal::new(1000, 0)),
            Transaction::new(2, date(2025, 3, 1), Decimal::new(75, 0), "Sales", Decimal::new(75, 0)),
            Transaction::new(1, date(2025, 5, 1), Decimal::new(10, 0), "Sales", Decimal::new(1110, 0)),
        ];

        let selected = source
            .transactions_between(1, date(2025, 1, 1), date(2025, 3, 31))
            .await
            .unwrap();

        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].date(), date(2025, 1, 5));
        assert_eq!(selected[1].date(), date(2025, 3, 5));
    }

    #[tokio::test]
    async fn test_database_source_reads_inclusive_range() {
        let db = setup_db().await.unwrap();
        new_transaction(&db, 1, date(2025, 2, 1), -200, "Rent", 9800).await.unwrap();
        new_transaction(&db, 1, date(2025, 2, 28), 500, "Sales", 10300).await.unwrap();
        new_transaction(&db, 1, date(2025, 3, 1), -20, "Rent", 10280).await.unwrap();
        new_transaction(&db, 2, date(2025, 2, 10), 999, "Sales", 999).await.unwrap();

        let selected = db
            .transactions_between(1, date(2025, 2, 1), date(2025, 2, 28))
            .await
            .unwrap();

        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].category(), "Rent");
        assert_eq!(selected[1].amount(), Decimal::new(500, 0));
    }

    #[tokio::test]
    async fn test_latest_transaction() {
        let db = setup_db().await.unwrap();
        new_transaction(&db, 1, date(2025, 2, 1), -200, "Rent", 9800).await.unwrap();
        new_transaction(&db, 1, date(2025, 2, 1), 500, "Sales", 10300).await.unwrap();
        new_transaction(&db, 1, date(2025, 3, 1), -20, "Rent", 10280).await.unwrap();
        new_transaction(&db, 2, date(2025, 2, 20), 999, "Sales", 999).await.unwrap();

        let latest = db.latest_transaction(1, date(2025, 2, 28)).await.unwrap().unwrap();
        assert_eq!(latest.balance(), Decimal::new(10300, 0));
        assert!(db.latest_transaction(1, date(2025, 1, 31)).await.unwrap().is_none());

        let source = vec![
            Transaction::new(1, date(2025, 2, 1), Decimal::new(-200, 0), "Rent", Decimal::new(9800, 0)),
            Transaction::new(1, date(2025, 2, 1), Decimal::new(500, 0), "Sales", Decimal::new(10300, 0)),
        ];
        let latest = source.latest_transaction(1, date(2025, 2, 28)).await.unwrap().unwrap();
        assert_eq!(latest.balance(), Decimal::new(10300, 0));
    }
}
