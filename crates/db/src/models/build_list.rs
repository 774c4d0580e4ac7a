//! Row shape of the `build_lists` table.

use buildmaster_core::build_list::{Budget, BuildList};
use buildmaster_core::types::{DbId, Money, Timestamp};
use sqlx::FromRow;

/// A `build_lists` row. The budget is stored as two flat columns.
#[derive(Debug, Clone, FromRow)]
pub struct BuildListRow {
    pub id: DbId,
    pub owner_user_id: DbId,
    pub name: String,
    pub total_budget: Money,
    pub currency_symbol: String,
    pub schema_version: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<BuildListRow> for BuildList {
    fn from(row: BuildListRow) -> Self {
        Self {
            id: row.id,
            owner_user_id: row.owner_user_id,
            name: row.name,
            budget: Budget {
                total_budget: row.total_budget,
                currency_symbol: row.currency_symbol,
            },
            schema_version: row.schema_version,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
