//! Repository for the `items` table.
//!
//! Every query joins back to `build_lists` so an item is only reachable
//! through a list its caller owns.

use buildmaster_core::item::{CreateItem, StoredItem};
use buildmaster_core::types::DbId;
use sqlx::{PgExecutor, PgPool, Postgres, Transaction};

use crate::models::item::ItemRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, list_id, name, total_price, planned_payment_count, logged_payments, \
                        notes, include_in_spend_calculation, created_at, updated_at";

/// Restricts `items` rows to lists owned by the user bound at `$3`.
const OWNED_BY: &str = "EXISTS (SELECT 1 FROM build_lists l \
                         WHERE l.id = items.list_id AND l.owner_user_id = $3)";

/// Provides owner-scoped CRUD operations for items.
pub struct ItemRepo;

impl ItemRepo {
    /// Insert an item into a list the user owns.
    ///
    /// Returns `None` if the list does not exist or belongs to someone else.
    pub async fn create<'e, E>(
        executor: E,
        owner_user_id: DbId,
        list_id: DbId,
        input: &CreateItem,
    ) -> Result<Option<StoredItem>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO items
                (list_id, name, total_price, planned_payment_count, logged_payments, notes,
                 include_in_spend_calculation)
             SELECT l.id, $2, $3, $4, $5, $6, $7
             FROM build_lists l
             WHERE l.id = $1 AND l.owner_user_id = $8
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, ItemRow>(&query)
            .bind(list_id)
            .bind(&input.name)
            .bind(input.total_price)
            .bind(input.planned_payment_count)
            .bind(&input.logged_payments)
            .bind(&input.notes)
            .bind(input.include_in_spend_calculation)
            .bind(owner_user_id)
            .fetch_optional(executor)
            .await?;
        Ok(row.map(Into::into))
    }

    /// Find an item within an owned list.
    pub async fn find_by_id(
        pool: &PgPool,
        owner_user_id: DbId,
        list_id: DbId,
        id: DbId,
    ) -> Result<Option<StoredItem>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM items WHERE id = $1 AND list_id = $2 AND {OWNED_BY}");
        let row = sqlx::query_as::<_, ItemRow>(&query)
            .bind(id)
            .bind(list_id)
            .bind(owner_user_id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Into::into))
    }

    /// Find an item and lock its row until `tx` ends.
    pub async fn find_for_update(
        tx: &mut Transaction<'_, Postgres>,
        owner_user_id: DbId,
        list_id: DbId,
        id: DbId,
    ) -> Result<Option<StoredItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM items
             WHERE id = $1 AND list_id = $2 AND {OWNED_BY}
             FOR UPDATE"
        );
        let row = sqlx::query_as::<_, ItemRow>(&query)
            .bind(id)
            .bind(list_id)
            .bind(owner_user_id)
            .fetch_optional(&mut **tx)
            .await?;
        Ok(row.map(Into::into))
    }

    /// All items of an owned list, ordered by name.
    pub async fn list_for_list(
        pool: &PgPool,
        owner_user_id: DbId,
        list_id: DbId,
    ) -> Result<Vec<StoredItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM items
             WHERE list_id = $1 AND EXISTS (
                 SELECT 1 FROM build_lists l WHERE l.id = items.list_id AND l.owner_user_id = $2
             )
             ORDER BY LOWER(name), name, id"
        );
        let rows = sqlx::query_as::<_, ItemRow>(&query)
            .bind(list_id)
            .bind(owner_user_id)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Write every mutable column of `item` back inside `tx`.
    pub async fn save(
        tx: &mut Transaction<'_, Postgres>,
        item: &StoredItem,
    ) -> Result<StoredItem, sqlx::Error> {
        let query = format!(
            "UPDATE items SET
                name = $2,
                total_price = $3,
                planned_payment_count = $4,
                logged_payments = $5,
                notes = $6,
                include_in_spend_calculation = $7,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, ItemRow>(&query)
            .bind(item.id)
            .bind(&item.name)
            .bind(item.total_price)
            .bind(item.planned_payment_count)
            .bind(&item.logged_payments)
            .bind(&item.notes)
            .bind(item.include_in_spend_calculation)
            .fetch_one(&mut **tx)
            .await?;
        Ok(row.into())
    }

    /// Delete an item from an owned list. Returns `true` if a row was removed.
    pub async fn delete(
        pool: &PgPool,
        owner_user_id: DbId,
        list_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let query = format!("DELETE FROM items WHERE id = $1 AND list_id = $2 AND {OWNED_BY}");
        let result = sqlx::query(&query)
            .bind(id)
            .bind(list_id)
            .bind(owner_user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
