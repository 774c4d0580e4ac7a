//! The persistence gateway seam.
//!
//! Handlers only see `Arc<dyn Store>`. Every build list and item operation
//! takes the caller's user id; a list owned by someone else behaves exactly
//! like a missing one (`None` / `false`). Create inputs are expected to be
//! validated already; edits and payment logging run the core mutations
//! inside an atomic read-modify-write.

use async_trait::async_trait;
use buildmaster_core::build_list::{BuildList, CreateBuildList, UpdateBuildList};
use buildmaster_core::error::CoreError;
use buildmaster_core::item::{CreateItem, StoredItem, UpdateItem};
use buildmaster_core::types::{DbId, Money};

use crate::models::session::{CreateSession, Session};
use crate::models::user::{CreateUser, User};

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Errors raised by a store implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A domain rule rejected the mutation.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Build lists and their items.
#[async_trait]
pub trait BuildStore: Send + Sync {
    /// Create a list with the input's budget (or the default budget).
    async fn create_list(&self, owner_user_id: DbId, input: &CreateBuildList)
        -> StoreResult<BuildList>;

    /// Create a list and all of its items in one unit.
    async fn import_list(
        &self,
        owner_user_id: DbId,
        list: &CreateBuildList,
        items: &[CreateItem],
    ) -> StoreResult<(BuildList, Vec<StoredItem>)>;

    async fn find_list(&self, owner_user_id: DbId, list_id: DbId)
        -> StoreResult<Option<BuildList>>;

    /// The owner's lists, newest first.
    async fn lists_for_owner(&self, owner_user_id: DbId) -> StoreResult<Vec<BuildList>>;

    async fn update_list(
        &self,
        owner_user_id: DbId,
        list_id: DbId,
        input: &UpdateBuildList,
    ) -> StoreResult<Option<BuildList>>;

    /// Delete a list together with all of its items.
    async fn delete_list(&self, owner_user_id: DbId, list_id: DbId) -> StoreResult<bool>;

    /// Add an item. `None` when the list is not the owner's.
    async fn create_item(
        &self,
        owner_user_id: DbId,
        list_id: DbId,
        input: &CreateItem,
    ) -> StoreResult<Option<StoredItem>>;

    async fn find_item(
        &self,
        owner_user_id: DbId,
        list_id: DbId,
        item_id: DbId,
    ) -> StoreResult<Option<StoredItem>>;

    /// Items of a list ordered by name; empty when the list is not the owner's.
    async fn items_for_list(&self, owner_user_id: DbId, list_id: DbId)
        -> StoreResult<Vec<StoredItem>>;

    /// Merge `input` into the stored item atomically.
    async fn update_item(
        &self,
        owner_user_id: DbId,
        list_id: DbId,
        item_id: DbId,
        input: &UpdateItem,
    ) -> StoreResult<Option<StoredItem>>;

    async fn delete_item(&self, owner_user_id: DbId, list_id: DbId, item_id: DbId)
        -> StoreResult<bool>;

    /// Log a payment into the item's next unfilled slot atomically.
    async fn log_payment(
        &self,
        owner_user_id: DbId,
        list_id: DbId,
        item_id: DbId,
        amount: Money,
    ) -> StoreResult<Option<StoredItem>>;
}

/// Accounts and refresh-token sessions.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user. A taken email is a conflict.
    async fn create_user(&self, input: &CreateUser) -> StoreResult<User>;

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn find_user_by_id(&self, id: DbId) -> StoreResult<Option<User>>;

    async fn create_session(&self, input: &CreateSession) -> StoreResult<Session>;

    /// A session that is neither revoked nor expired.
    async fn find_active_session(&self, refresh_token_hash: &str) -> StoreResult<Option<Session>>;

    async fn revoke_session(&self, id: DbId) -> StoreResult<bool>;

    async fn revoke_sessions_for_user(&self, user_id: DbId) -> StoreResult<u64>;
}

/// Everything the HTTP layer needs from persistence.
#[async_trait]
pub trait Store: BuildStore + UserStore {
    /// Check that the backing storage is reachable.
    async fn ping(&self) -> StoreResult<()>;
}
