//! Storage ports and their implementations
//!
//! Services only see the [`CredentialStore`] and [`ContactStore`] traits.
//! Every contact method takes the owner id, so no query can reach a record
//! outside the caller's own rows.

use async_trait::async_trait;
use common::error::DatabaseResult;
use uuid::Uuid;

use crate::models::{Contact, ContactFields, NewUser, User};

pub mod contact;
pub mod memory;
pub mod user;

pub use contact::ContactRepository;
pub use memory::{InMemoryContactStore, InMemoryCredentialStore};
pub use user::UserRepository;

/// Persistence of user identity records
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Whether the username or the email is already registered
    async fn identity_taken(&self, username: &str, email: &str) -> DatabaseResult<bool>;

    /// Persist a new user
    ///
    /// Fails with `DatabaseError::UniqueViolation` when the username or email
    /// is already present.
    async fn create(&self, new_user: &NewUser) -> DatabaseResult<User>;

    /// Find a user by username
    async fn find_by_username(&self, username: &str) -> DatabaseResult<Option<User>>;
}

/// Persistence of contacts, always scoped to an owner
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// All contacts of `owner_id`, oldest first
    async fn list_by_owner(&self, owner_id: Uuid) -> DatabaseResult<Vec<Contact>>;

    /// Persist a new contact owned by `owner_id`
    async fn create(&self, owner_id: Uuid, fields: &ContactFields) -> DatabaseResult<Contact>;

    /// Replace the mutable fields of a contact if, and only if, `owner_id` owns it
    async fn update_owned(
        &self,
        owner_id: Uuid,
        contact_id: Uuid,
        fields: &ContactFields,
    ) -> DatabaseResult<Option<Contact>>;

    /// Remove a contact if, and only if, `owner_id` owns it
    async fn delete_owned(&self, owner_id: Uuid, contact_id: Uuid) -> DatabaseResult<bool>;

    /// Check that the backing store is reachable
    async fn health_check(&self) -> DatabaseResult<bool> {
        Ok(true)
    }
}
