//! PostgreSQL-backed [`Store`].

use async_trait::async_trait;
use buildmaster_core::build_list::{BuildList, CreateBuildList, UpdateBuildList};
use buildmaster_core::error::CoreError;
use buildmaster_core::item::{CreateItem, StoredItem, UpdateItem};
use buildmaster_core::migration::CURRENT_SCHEMA_VERSION;
use buildmaster_core::types::{DbId, Money};

use super::{BuildStore, Store, StoreResult, UserStore};
use crate::models::session::{CreateSession, Session};
use crate::models::user::{CreateUser, User};
use crate::repositories::{BuildListRepo, ItemRepo, SessionRepo, UserRepo};
use crate::DbPool;

/// Delegates to the repositories; mutations of an existing item run in a
/// transaction holding the item's row lock.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BuildStore for PgStore {
    async fn create_list(
        &self,
        owner_user_id: DbId,
        input: &CreateBuildList,
    ) -> StoreResult<BuildList> {
        let list = BuildListRepo::create(
            &self.pool,
            owner_user_id,
            &input.name,
            &input.initial_budget(),
            CURRENT_SCHEMA_VERSION,
        )
        .await?;
        Ok(list)
    }

    async fn import_list(
        &self,
        owner_user_id: DbId,
        list: &CreateBuildList,
        items: &[CreateItem],
    ) -> StoreResult<(BuildList, Vec<StoredItem>)> {
        let mut tx = self.pool.begin().await?;

        let created = BuildListRepo::create(
            &mut *tx,
            owner_user_id,
            &list.name,
            &list.initial_budget(),
            CURRENT_SCHEMA_VERSION,
        )
        .await?;

        let mut stored = Vec::with_capacity(items.len());
        for item in items {
            let row = ItemRepo::create(&mut *tx, owner_user_id, created.id, item)
                .await?
                .ok_or_else(|| {
                    CoreError::Internal(format!("Imported list {} not visible", created.id))
                })?;
            stored.push(row);
        }

        tx.commit().await?;
        Ok((created, stored))
    }

    async fn find_list(
        &self,
        owner_user_id: DbId,
        list_id: DbId,
    ) -> StoreResult<Option<BuildList>> {
        Ok(BuildListRepo::find_by_id(&self.pool, owner_user_id, list_id).await?)
    }

    async fn lists_for_owner(&self, owner_user_id: DbId) -> StoreResult<Vec<BuildList>> {
        Ok(BuildListRepo::list_for_owner(&self.pool, owner_user_id).await?)
    }

    async fn update_list(
        &self,
        owner_user_id: DbId,
        list_id: DbId,
        input: &UpdateBuildList,
    ) -> StoreResult<Option<BuildList>> {
        Ok(BuildListRepo::update(&self.pool, owner_user_id, list_id, input).await?)
    }

    async fn delete_list(&self, owner_user_id: DbId, list_id: DbId) -> StoreResult<bool> {
        Ok(BuildListRepo::delete(&self.pool, owner_user_id, list_id).await?)
    }

    async fn create_item(
        &self,
        owner_user_id: DbId,
        list_id: DbId,
        input: &CreateItem,
    ) -> StoreResult<Option<StoredItem>> {
        Ok(ItemRepo::create(&self.pool, owner_user_id, list_id, input).await?)
    }

    async fn find_item(
        &self,
        owner_user_id: DbId,
        list_id: DbId,
        item_id: DbId,
    ) -> StoreResult<Option<StoredItem>> {
        Ok(ItemRepo::find_by_id(&self.pool, owner_user_id, list_id, item_id).await?)
    }

    async fn items_for_list(
        &self,
        owner_user_id: DbId,
        list_id: DbId,
    ) -> StoreResult<Vec<StoredItem>> {
        Ok(ItemRepo::list_for_list(&self.pool, owner_user_id, list_id).await?)
    }

    async fn update_item(
        &self,
        owner_user_id: DbId,
        list_id: DbId,
        item_id: DbId,
        input: &UpdateItem,
    ) -> StoreResult<Option<StoredItem>> {
        let mut tx = self.pool.begin().await?;
        let Some(current) =
            ItemRepo::find_for_update(&mut tx, owner_user_id, list_id, item_id).await?
        else {
            return Ok(None);
        };

        let next = current.apply_update(input)?;
        let saved = ItemRepo::save(&mut tx, &next).await?;
        tx.commit().await?;
        Ok(Some(saved))
    }

    async fn delete_item(
        &self,
        owner_user_id: DbId,
        list_id: DbId,
        item_id: DbId,
    ) -> StoreResult<bool> {
        Ok(ItemRepo::delete(&self.pool, owner_user_id, list_id, item_id).await?)
    }

    async fn log_payment(
        &self,
        owner_user_id: DbId,
        list_id: DbId,
        item_id: DbId,
        amount: Money,
    ) -> StoreResult<Option<StoredItem>> {
        let mut tx = self.pool.begin().await?;
        let Some(current) =
            ItemRepo::find_for_update(&mut tx, owner_user_id, list_id, item_id).await?
        else {
            return Ok(None);
        };

        // Dropping `tx` on error rolls back and releases the row lock.
        let next = current.log_payment(amount)?;
        let saved = ItemRepo::save(&mut tx, &next).await?;
        tx.commit().await?;
        Ok(Some(saved))
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, input: &CreateUser) -> StoreResult<User> {
        Ok(UserRepo::create(&self.pool, input).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(UserRepo::find_by_email(&self.pool, email).await?)
    }

    async fn find_user_by_id(&self, id: DbId) -> StoreResult<Option<User>> {
        Ok(UserRepo::find_by_id(&self.pool, id).await?)
    }

    async fn create_session(&self, input: &CreateSession) -> StoreResult<Session> {
        Ok(SessionRepo::create(&self.pool, input).await?)
    }

    async fn find_active_session(&self, refresh_token_hash: &str) -> StoreResult<Option<Session>> {
        Ok(SessionRepo::find_active_by_token_hash(&self.pool, refresh_token_hash).await?)
    }

    async fn revoke_session(&self, id: DbId) -> StoreResult<bool> {
        Ok(SessionRepo::revoke(&self.pool, id).await?)
    }

    async fn revoke_sessions_for_user(&self, user_id: DbId) -> StoreResult<u64> {
        Ok(SessionRepo::revoke_all_for_user(&self.pool, user_id).await?)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(crate::health_check(&self.pool).await?)
    }
}
