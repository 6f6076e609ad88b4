//! Application state shared across handlers

use std::sync::Arc;

use sqlx::PgPool;

use crate::{
    auth::AuthService,
    contacts::ContactService,
    jwt::JwtService,
    repositories::{
        ContactRepository, ContactStore, CredentialStore, InMemoryContactStore,
        InMemoryCredentialStore, UserRepository,
    },
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub jwt_service: JwtService,
    pub auth_service: AuthService,
    pub contact_service: ContactService,
}

impl AppState {
    /// Wire the services over the given stores
    pub fn new(
        users: Arc<dyn CredentialStore>,
        contacts: Arc<dyn ContactStore>,
        jwt_service: JwtService,
    ) -> Self {
        Self {
            auth_service: AuthService::new(users, jwt_service.clone()),
            contact_service: ContactService::new(contacts),
            jwt_service,
        }
    }

    /// State backed by PostgreSQL
    pub fn postgres(pool: PgPool, jwt_service: JwtService) -> Self {
        Self::new(
            Arc::new(UserRepository::new(pool.clone())),
            Arc::new(ContactRepository::new(pool)),
            jwt_service,
        )
    }

    /// State backed by process memory; nothing survives a restart
    pub fn in_memory(jwt_service: JwtService) -> Self {
        Self::new(
            Arc::new(InMemoryCredentialStore::new()),
            Arc::new(InMemoryContactStore::new()),
            jwt_service,
        )
    }
}
