//! In-memory stores
//!
//! Same contracts as the PostgreSQL repositories, backed by maps behind a
//! `tokio` lock. Each operation holds the lock for its whole check-and-mutate,
//! which gives the per-operation atomicity the SQL versions get from a single
//! statement.

use async_trait::async_trait;
use chrono::Utc;
use common::error::{DatabaseError, DatabaseResult};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ContactStore, CredentialStore};
use crate::models::{Contact, ContactFields, NewUser, User};

/// In-memory credential store
#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentialStore {
    users: Arc<RwLock<Vec<User>>>,
}

impl InMemoryCredentialStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn identity_taken(&self, username: &str, email: &str) -> DatabaseResult<bool> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .any(|u| u.username == username || u.email == email))
    }

    async fn create(&self, new_user: &NewUser) -> DatabaseResult<User> {
        let mut users = self.users.write().await;

        if users.iter().any(|u| u.username == new_user.username) {
            return Err(DatabaseError::UniqueViolation(
                "users_username_key".to_string(),
            ));
        }
        if users.iter().any(|u| u.email == new_user.email) {
            return Err(DatabaseError::UniqueViolation("users_email_key".to_string()));
        }

        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username.clone(),
            email: new_user.email.clone(),
            password_hash: new_user.password_hash.clone(),
            created_at: Utc::now(),
        };
        users.push(user.clone());

        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> DatabaseResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }
}

#[derive(Debug, Default)]
struct ContactTable {
    rows: HashMap<Uuid, Contact>,
    /// Insertion order, so listings are stable
    order: Vec<Uuid>,
}

/// In-memory contact store
#[derive(Debug, Clone, Default)]
pub struct InMemoryContactStore {
    table: Arc<RwLock<ContactTable>>,
}

impl InMemoryContactStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of contacts across all owners
    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    /// Whether the store holds no contacts at all
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ContactStore for InMemoryContactStore {
    async fn list_by_owner(&self, owner_id: Uuid) -> DatabaseResult<Vec<Contact>> {
        let table = self.table.read().await;
        Ok(table
            .order
            .iter()
            .filter_map(|id| table.rows.get(id))
            .filter(|c| c.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn create(&self, owner_id: Uuid, fields: &ContactFields) -> DatabaseResult<Contact> {
        let now = Utc::now();
        let contact = Contact {
            id: Uuid::new_v4(),
            owner_id,
            name: fields.name.clone(),
            email: fields.email.clone(),
            phone: fields.phone.clone(),
            address: fields.address.clone(),
            created_at: now,
            updated_at: now,
        };

        let mut table = self.table.write().await;
        table.order.push(contact.id);
        table.rows.insert(contact.id, contact.clone());

        Ok(contact)
    }

    async fn update_owned(
        &self,
        owner_id: Uuid,
        contact_id: Uuid,
        fields: &ContactFields,
    ) -> DatabaseResult<Option<Contact>> {
        let mut table = self.table.write().await;

        let Some(contact) = table
            .rows
            .get_mut(&contact_id)
            .filter(|c| c.owner_id == owner_id)
        else {
            return Ok(None);
        };

        contact.name = fields.name.clone();
        contact.email = fields.email.clone();
        contact.phone = fields.phone.clone();
        contact.address = fields.address.clone();
        contact.updated_at = Utc::now();

        Ok(Some(contact.clone()))
    }

    async fn delete_owned(&self, owner_id: Uuid, contact_id: Uuid) -> DatabaseResult<bool> {
        let mut table = self.table.write().await;

        let owned = table
            .rows
            .get(&contact_id)
            .is_some_and(|c| c.owner_id == owner_id);
        if !owned {
            return Ok(false);
        }

        table.rows.remove(&contact_id);
        table.order.retain(|id| *id != contact_id);

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(name: &str) -> ContactFields {
        ContactFields {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: "1234567890".to_string(),
            address: "123 Main St".to_string(),
        }
    }

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$stub".to_string(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_username_and_email_are_rejected() {
        let store = InMemoryCredentialStore::new();
        store.create(&new_user("alice", "alice@x.com")).await.unwrap();

        let same_name = store.create(&new_user("alice", "other@x.com")).await;
        assert!(same_name.unwrap_err().is_unique_violation());

        let same_email = store.create(&new_user("bob", "alice@x.com")).await;
        assert!(same_email.unwrap_err().is_unique_violation());

        assert!(store.identity_taken("alice", "nobody@x.com").await.unwrap());
        assert!(store.identity_taken("nobody", "alice@x.com").await.unwrap());
        assert!(!store.identity_taken("bob", "bob@x.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_listing_keeps_insertion_order_per_owner() {
        let store = InMemoryContactStore::new();
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();

        let first = store.create(owner, &fields("Ann")).await.unwrap();
        store.create(other, &fields("Bob")).await.unwrap();
        let second = store.create(owner, &fields("Cid")).await.unwrap();

        let listed: Vec<Uuid> = store
            .list_by_owner(owner)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(listed, vec![first.id, second.id]);
        assert_eq!(store.len().await, 3);
    }

    #[tokio::test]
    async fn test_foreign_owner_cannot_touch_contact() {
        let store = InMemoryContactStore::new();
        let owner = Uuid::new_v4();
        let intruder = Uuid::new_v4();
        let contact = store.create(owner, &fields("Ann")).await.unwrap();

        let updated = store
            .update_owned(intruder, contact.id, &fields("Eve"))
            .await
            .unwrap();
        assert!(updated.is_none());
        assert!(!store.delete_owned(intruder, contact.id).await.unwrap());

        let listed = store.list_by_owner(owner).await.unwrap();
        assert_eq!(listed, vec![contact]);
    }

    #[tokio::test]
    async fn test_update_keeps_identity_and_owner() {
        let store = InMemoryContactStore::new();
        let owner = Uuid::new_v4();
        let contact = store.create(owner, &fields("Ann")).await.unwrap();

        let updated = store
            .update_owned(owner, contact.id, &fields("Anne"))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.id, contact.id);
        assert_eq!(updated.owner_id, owner);
        assert_eq!(updated.name, "Anne");
        assert_eq!(updated.created_at, contact.created_at);
    }

    #[tokio::test]
    async fn test_delete_is_permanent() {
        let store = InMemoryContactStore::new();
        let owner = Uuid::new_v4();
        let contact = store.create(owner, &fields("Ann")).await.unwrap();

        assert!(store.delete_owned(owner, contact.id).await.unwrap());
        assert!(!store.delete_owned(owner, contact.id).await.unwrap());
        assert!(store.is_empty().await);
    }
}
