//! Contact repository for database operations
//!
//! Update and delete are single statements filtered on both the contact id
//! and the owner id, so the ownership check and the mutation are one atomic
//! step.

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::PgPool;
use uuid::Uuid;

use super::ContactStore;
use crate::models::{Contact, ContactFields};

/// PostgreSQL-backed contact store
#[derive(Clone)]
pub struct ContactRepository {
    pool: PgPool,
}

impl ContactRepository {
    /// Create a new contact repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContactStore for ContactRepository {
    async fn list_by_owner(&self, owner_id: Uuid) -> DatabaseResult<Vec<Contact>> {
        let contacts = sqlx::query_as::<_, Contact>(
            r#"
            SELECT id, owner_id, name, email, phone, address, created_at, updated_at
            FROM contacts
            WHERE owner_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(contacts)
    }

    async fn create(&self, owner_id: Uuid, fields: &ContactFields) -> DatabaseResult<Contact> {
        let contact = sqlx::query_as::<_, Contact>(
            r#"
            INSERT INTO contacts (id, owner_id, name, email, phone, address)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, owner_id, name, email, phone, address, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(&fields.name)
        .bind(&fields.email)
        .bind(&fields.phone)
        .bind(&fields.address)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok(contact)
    }

    async fn update_owned(
        &self,
        owner_id: Uuid,
        contact_id: Uuid,
        fields: &ContactFields,
    ) -> DatabaseResult<Option<Contact>> {
        let contact = sqlx::query_as::<_, Contact>(
            r#"
            UPDATE contacts
            SET name = $3, email = $4, phone = $5, address = $6, updated_at = NOW()
            WHERE id = $1 AND owner_id = $2
            RETURNING id, owner_id, name, email, phone, address, created_at, updated_at
            "#,
        )
        .bind(contact_id)
        .bind(owner_id)
        .bind(&fields.name)
        .bind(&fields.email)
        .bind(&fields.phone)
        .bind(&fields.address)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from_query)?;

        Ok(contact)
    }

    async fn delete_owned(&self, owner_id: Uuid, contact_id: Uuid) -> DatabaseResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM contacts
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(contact_id)
        .bind(owner_id)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> DatabaseResult<bool> {
        common::database::health_check(&self.pool).await
    }
}
