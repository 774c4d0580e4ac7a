//! In-process [`Store`] for development and tests.
//!
//! All tables sit behind one `tokio::sync::RwLock`, so a write guard held
//! across read-modify-write makes item edits and payment logging atomic.

use std::collections::BTreeMap;

use async_trait::async_trait;
use buildmaster_core::build_list::{BuildList, CreateBuildList, UpdateBuildList};
use buildmaster_core::error::CoreError;
use buildmaster_core::item::{CreateItem, StoredItem, UpdateItem};
use buildmaster_core::migration::CURRENT_SCHEMA_VERSION;
use buildmaster_core::types::{DbId, Money};
use chrono::Utc;
use tokio::sync::RwLock;

use super::{BuildStore, Store, StoreResult, UserStore};
use crate::models::session::{CreateSession, Session};
use crate::models::user::{CreateUser, User};

#[derive(Default)]
struct Tables {
    last_id: DbId,
    users: BTreeMap<DbId, User>,
    sessions: BTreeMap<DbId, Session>,
    lists: BTreeMap<DbId, BuildList>,
    items: BTreeMap<DbId, StoredItem>,
}

impl Tables {
    fn next_id(&mut self) -> DbId {
        self.last_id += 1;
        self.last_id
    }

    fn owns_list(&self, owner_user_id: DbId, list_id: DbId) -> bool {
        self.lists
            .get(&list_id)
            .is_some_and(|l| l.owner_user_id == owner_user_id)
    }

    fn owned_item(&self, owner_user_id: DbId, list_id: DbId, item_id: DbId) -> Option<&StoredItem> {
        if !self.owns_list(owner_user_id, list_id) {
            return None;
        }
        self.items.get(&item_id).filter(|i| i.list_id == list_id)
    }

    fn insert_list(&mut self, owner_user_id: DbId, input: &CreateBuildList) -> BuildList {
        let now = Utc::now();
        let list = BuildList {
            id: self.next_id(),
            owner_user_id,
            name: input.name.clone(),
            budget: input.initial_budget(),
            schema_version: CURRENT_SCHEMA_VERSION,
            created_at: now,
            updated_at: now,
        };
        self.lists.insert(list.id, list.clone());
        list
    }

    fn insert_item(&mut self, list_id: DbId, input: &CreateItem) -> StoredItem {
        let now = Utc::now();
        let item = StoredItem {
            id: self.next_id(),
            list_id,
            name: input.name.clone(),
            total_price: input.total_price,
            planned_payment_count: input.planned_payment_count,
            logged_payments: input.logged_payments.clone(),
            notes: input.notes.clone(),
            include_in_spend_calculation: input.include_in_spend_calculation,
            created_at: now,
            updated_at: now,
        };
        self.items.insert(item.id, item.clone());
        item
    }

    /// Apply `mutate` to an owned item and store the result.
    fn mutate_item<F>(
        &mut self,
        owner_user_id: DbId,
        list_id: DbId,
        item_id: DbId,
        mutate: F,
    ) -> StoreResult<Option<StoredItem>>
    where
        F: FnOnce(&StoredItem) -> Result<StoredItem, CoreError>,
    {
        let Some(current) = self.owned_item(owner_user_id, list_id, item_id) else {
            return Ok(None);
        };
        let mut next = mutate(current)?;
        next.updated_at = Utc::now();
        self.items.insert(item_id, next.clone());
        Ok(Some(next))
    }
}

/// Process-local store. Data is lost when the process exits.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BuildStore for MemoryStore {
    async fn create_list(
        &self,
        owner_user_id: DbId,
        input: &CreateBuildList,
    ) -> StoreResult<BuildList> {
        Ok(self.tables.write().await.insert_list(owner_user_id, input))
    }

    async fn import_list(
        &self,
        owner_user_id: DbId,
        list: &CreateBuildList,
        items: &[CreateItem],
    ) -> StoreResult<(BuildList, Vec<StoredItem>)> {
        let mut tables = self.tables.write().await;
        let created = tables.insert_list(owner_user_id, list);
        let stored = items
            .iter()
            .map(|item| tables.insert_item(created.id, item))
            .collect();
        Ok((created, stored))
    }

    async fn find_list(
        &self,
        owner_user_id: DbId,
        list_id: DbId,
    ) -> StoreResult<Option<BuildList>> {
        let tables = self.tables.read().await;
        Ok(tables
            .lists
            .get(&list_id)
            .filter(|l| l.owner_user_id == owner_user_id)
            .cloned())
    }

    async fn lists_for_owner(&self, owner_user_id: DbId) -> StoreResult<Vec<BuildList>> {
        let tables = self.tables.read().await;
        let mut lists: Vec<BuildList> = tables
            .lists
            .values()
            .filter(|l| l.owner_user_id == owner_user_id)
            .cloned()
            .collect();
        lists.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(lists)
    }

    async fn update_list(
        &self,
        owner_user_id: DbId,
        list_id: DbId,
        input: &UpdateBuildList,
    ) -> StoreResult<Option<BuildList>> {
        let mut tables = self.tables.write().await;
        let Some(list) = tables
            .lists
            .get_mut(&list_id)
            .filter(|l| l.owner_user_id == owner_user_id)
        else {
            return Ok(None);
        };

        if let Some(name) = &input.name {
            list.name = name.clone();
        }
        if let Some(total) = input.total_budget {
            list.budget.total_budget = total;
        }
        if let Some(symbol) = &input.currency_symbol {
            list.budget.currency_symbol = symbol.clone();
        }
        list.updated_at = Utc::now();
        Ok(Some(list.clone()))
    }

    async fn delete_list(&self, owner_user_id: DbId, list_id: DbId) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        if !tables.owns_list(owner_user_id, list_id) {
            return Ok(false);
        }
        tables.lists.remove(&list_id);
        tables.items.retain(|_, item| item.list_id != list_id);
        Ok(true)
    }

    async fn create_item(
        &self,
        owner_user_id: DbId,
        list_id: DbId,
        input: &CreateItem,
    ) -> StoreResult<Option<StoredItem>> {
        let mut tables = self.tables.write().await;
        if !tables.owns_list(owner_user_id, list_id) {
            return Ok(None);
        }
        Ok(Some(tables.insert_item(list_id, input)))
    }

    async fn find_item(
        &self,
        owner_user_id: DbId,
        list_id: DbId,
        item_id: DbId,
    ) -> StoreResult<Option<StoredItem>> {
        let tables = self.tables.read().await;
        Ok(tables.owned_item(owner_user_id, list_id, item_id).cloned())
    }

    async fn items_for_list(
        &self,
        owner_user_id: DbId,
        list_id: DbId,
    ) -> StoreResult<Vec<StoredItem>> {
        let tables = self.tables.read().await;
        if !tables.owns_list(owner_user_id, list_id) {
            return Ok(Vec::new());
        }
        let mut items: Vec<StoredItem> = tables
            .items
            .values()
            .filter(|i| i.list_id == list_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
                .then(a.id.cmp(&b.id))
        });
        Ok(items)
    }

    async fn update_item(
        &self,
        owner_user_id: DbId,
        list_id: DbId,
        item_id: DbId,
        input: &UpdateItem,
    ) -> StoreResult<Option<StoredItem>> {
        let mut tables = self.tables.write().await;
        tables.mutate_item(owner_user_id, list_id, item_id, |item| {
            item.apply_update(input)
        })
    }

    async fn delete_item(
        &self,
        owner_user_id: DbId,
        list_id: DbId,
        item_id: DbId,
    ) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.owned_item(owner_user_id, list_id, item_id).is_none() {
            return Ok(false);
        }
        Ok(tables.items.remove(&item_id).is_some())
    }

    async fn log_payment(
        &self,
        owner_user_id: DbId,
        list_id: DbId,
        item_id: DbId,
        amount: Money,
    ) -> StoreResult<Option<StoredItem>> {
        let mut tables = self.tables.write().await;
        tables.mutate_item(owner_user_id, list_id, item_id, |item| {
            item.log_payment(amount)
        })
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, input: &CreateUser) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == input.email) {
            return Err(CoreError::Conflict(format!(
                "Email '{}' is already registered",
                input.email
            ))
            .into());
        }

        let now = Utc::now();
        let user = User {
            id: tables.next_id(),
            email: input.email.clone(),
            password_hash: input.password_hash.clone(),
            display_name: input.display_name.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: DbId) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn create_session(&self, input: &CreateSession) -> StoreResult<Session> {
        let mut tables = self.tables.write().await;
        let session = Session {
            id: tables.next_id(),
            user_id: input.user_id,
            refresh_token_hash: input.refresh_token_hash.clone(),
            expires_at: input.expires_at,
            revoked_at: None,
            created_at: Utc::now(),
        };
        tables.sessions.insert(session.id, session.clone());
        Ok(session)
    }

    async fn find_active_session(&self, refresh_token_hash: &str) -> StoreResult<Option<Session>> {
        let tables = self.tables.read().await;
        let now = Utc::now();
        Ok(tables
            .sessions
            .values()
            .find(|s| {
                s.refresh_token_hash == refresh_token_hash
                    && s.revoked_at.is_none()
                    && s.expires_at > now
            })
            .cloned())
    }

    async fn revoke_session(&self, id: DbId) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.sessions.get_mut(&id) {
            Some(session) if session.revoked_at.is_none() => {
                session.revoked_at = Some(Utc::now());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn revoke_sessions_for_user(&self, user_id: DbId) -> StoreResult<u64> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let mut revoked = 0;
        for session in tables
            .sessions
            .values_mut()
            .filter(|s| s.user_id == user_id && s.revoked_at.is_none())
        {
            session.revoked_at = Some(now);
            revoked += 1;
        }
        Ok(revoked)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
