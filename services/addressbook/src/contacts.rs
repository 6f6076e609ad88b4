//! Contact management scoped to the authenticated caller

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::{ContactFields, ContactResponse},
    repositories::ContactStore,
    validation,
};

/// Contact operations; every call names the caller whose rows it may touch
#[derive(Clone)]
pub struct ContactService {
    contacts: Arc<dyn ContactStore>,
}

impl ContactService {
    /// Create a new contact service
    pub fn new(contacts: Arc<dyn ContactStore>) -> Self {
        Self { contacts }
    }

    /// List the caller's contacts
    pub async fn list(&self, caller_id: Uuid) -> ApiResult<Vec<ContactResponse>> {
        let contacts = self.contacts.list_by_owner(caller_id).await?;
        Ok(contacts.into_iter().map(ContactResponse::from).collect())
    }

    /// Add a contact owned by the caller
    pub async fn add(&self, caller_id: Uuid, fields: ContactFields) -> ApiResult<ContactResponse> {
        validation::validate_contact(&fields).map_err(ApiError::BadRequest)?;

        let contact = self.contacts.create(caller_id, &fields).await?;
        info!("User {} created contact {}", caller_id, contact.id);

        Ok(contact.into())
    }

    /// Replace the fields of one of the caller's contacts
    pub async fn update(
        &self,
        caller_id: Uuid,
        contact_id: Uuid,
        fields: ContactFields,
    ) -> ApiResult<ContactResponse> {
        validation::validate_contact(&fields).map_err(ApiError::BadRequest)?;

        let contact = self
            .contacts
            .update_owned(caller_id, contact_id, &fields)
            .await?
            .ok_or(ApiError::NotFound)?;
        info!("User {} updated contact {}", caller_id, contact.id);

        Ok(contact.into())
    }

    /// Permanently remove one of the caller's contacts
    pub async fn delete(&self, caller_id: Uuid, contact_id: Uuid) -> ApiResult<()> {
        if !self.contacts.delete_owned(caller_id, contact_id).await? {
            return Err(ApiError::NotFound);
        }
        info!("User {} deleted contact {}", caller_id, contact_id);

        Ok(())
    }

    /// Whether the contact store answers; failures count as unhealthy
    pub async fn store_healthy(&self) -> bool {
        self.contacts.health_check().await.unwrap_or(false)
    }
}
