//! Row shape of the `items` table.

use buildmaster_core::item::StoredItem;
use buildmaster_core::types::{DbId, Money, Timestamp};
use sqlx::FromRow;

/// An `items` row; `logged_payments` is a `NUMERIC[]` column.
#[derive(Debug, Clone, FromRow)]
pub struct ItemRow {
    pub id: DbId,
    pub list_id: DbId,
    pub name: String,
    pub total_price: Money,
    pub planned_payment_count: i32,
    pub logged_payments: Vec<Money>,
    pub notes: Option<String>,
    pub include_in_spend_calculation: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<ItemRow> for StoredItem {
    fn from(row: ItemRow) -> Self {
        Self {
            id: row.id,
            list_id: row.list_id,
            name: row.name,
            total_price: row.total_price,
            planned_payment_count: row.planned_payment_count,
            logged_payments: row.logged_payments,
            notes: row.notes,
            include_in_spend_calculation: row.include_in_spend_calculation,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
