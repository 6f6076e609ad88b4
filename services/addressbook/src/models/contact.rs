//! Contact model and its request/response payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Contact entity
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Contact {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The owner-supplied, replaceable part of a contact
///
/// Used both for creation and for full replacement on update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactFields {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

/// Response for contact operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl From<Contact> for ContactResponse {
    fn from(contact: Contact) -> Self {
        Self {
            id: contact.id,
            name: contact.name,
            email: contact.email,
            phone: contact.phone,
            address: contact.address,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_hides_owner_and_timestamps() {
        let now = Utc::now();
        let contact = Contact {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: "1234567890".to_string(),
            address: "123 Main St".to_string(),
            created_at: now,
            updated_at: now,
        };

        let value = serde_json::to_value(ContactResponse::from(contact.clone())).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 5);
        assert_eq!(object["id"], serde_json::json!(contact.id));
        assert_eq!(object["name"], "Jane Doe");
        assert!(!object.contains_key("owner_id"));
    }
}
