//! Repository for the `build_lists` table.

use buildmaster_core::build_list::{Budget, BuildList, UpdateBuildList};
use buildmaster_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::build_list::BuildListRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, owner_user_id, name, total_budget, currency_symbol, \
                        schema_version, created_at, updated_at";

/// Provides owner-scoped CRUD operations for build lists.
pub struct BuildListRepo;

impl BuildListRepo {
    /// Insert a new list, returning the created row.
    pub async fn create<'e, E>(
        executor: E,
        owner_user_id: DbId,
        name: &str,
        budget: &Budget,
        schema_version: i32,
    ) -> Result<BuildList, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO build_lists (owner_user_id, name, total_budget, currency_symbol, schema_version)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, BuildListRow>(&query)
            .bind(owner_user_id)
            .bind(name)
            .bind(budget.total_budget)
            .bind(&budget.currency_symbol)
            .bind(schema_version)
            .fetch_one(executor)
            .await?;
        Ok(row.into())
    }

    /// Find a list by ID, only if `owner_user_id` owns it.
    pub async fn find_by_id(
        pool: &PgPool,
        owner_user_id: DbId,
        id: DbId,
    ) -> Result<Option<BuildList>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM build_lists WHERE id = $1 AND owner_user_id = $2");
        let row = sqlx::query_as::<_, BuildListRow>(&query)
            .bind(id)
            .bind(owner_user_id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Into::into))
    }

    /// List an owner's lists, most recently created first.
    pub async fn list_for_owner(
        pool: &PgPool,
        owner_user_id: DbId,
    ) -> Result<Vec<BuildList>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM build_lists
             WHERE owner_user_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, BuildListRow>(&query)
            .bind(owner_user_id)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Update a list. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` is owned by the user.
    pub async fn update(
        pool: &PgPool,
        owner_user_id: DbId,
        id: DbId,
        input: &UpdateBuildList,
    ) -> Result<Option<BuildList>, sqlx::Error> {
        let query = format!(
            "UPDATE build_lists SET
                name = COALESCE($3, name),
                total_budget = COALESCE($4, total_budget),
                currency_symbol = COALESCE($5, currency_symbol),
                updated_at = NOW()
             WHERE id = $1 AND owner_user_id = $2
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, BuildListRow>(&query)
            .bind(id)
            .bind(owner_user_id)
            .bind(&input.name)
            .bind(input.total_budget)
            .bind(&input.currency_symbol)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Into::into))
    }

    /// Delete a list. Its items go with it via `ON DELETE CASCADE`.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, owner_user_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM build_lists WHERE id = $1 AND owner_user_id = $2")
            .bind(id)
            .bind(owner_user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
