//! Registration and login
//!
//! Both flows end by issuing a fresh access token. Login failures are
//! reported identically whether the username is unknown or the password is
//! wrong.

use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    jwt::JwtService,
    models::{LoginRequest, NewUser, RegisterRequest, TokenResponse},
    password,
    repositories::CredentialStore,
    validation,
};

/// Orchestrates the credential store, password hashing and token issuance
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn CredentialStore>,
    jwt_service: JwtService,
}

impl AuthService {
    /// Create a new auth service
    pub fn new(users: Arc<dyn CredentialStore>, jwt_service: JwtService) -> Self {
        Self { users, jwt_service }
    }

    /// Register a new user and log them straight in
    pub async fn register(&self, request: RegisterRequest) -> ApiResult<TokenResponse> {
        validation::validate_username(&request.username).map_err(ApiError::BadRequest)?;
        validation::validate_email(&request.email).map_err(ApiError::BadRequest)?;
        validation::validate_password(&request.password).map_err(ApiError::BadRequest)?;

        if self
            .users
            .identity_taken(&request.username, &request.email)
            .await?
        {
            info!("Registration rejected, identity taken: {}", request.username);
            return Err(ApiError::DuplicateIdentity);
        }

        let password_hash = password::hash_password_blocking(request.password)
            .await
            .map_err(|e| {
                error!("Failed to hash password: {}", e);
                ApiError::InternalServerError
            })?;

        let new_user = NewUser {
            username: request.username,
            email: request.email,
            password_hash,
        };

        let user = self.users.create(&new_user).await.map_err(|e| {
            if e.is_unique_violation() {
                ApiError::DuplicateIdentity
            } else {
                ApiError::Database(e)
            }
        })?;

        info!("Registered user {} ({})", user.username, user.id);
        self.issue_token(user.id)
    }

    /// Verify credentials and issue a token
    pub async fn login(&self, request: LoginRequest) -> ApiResult<TokenResponse> {
        let user = self.users.find_by_username(&request.username).await?;

        let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
        let verified = password::verify_password_blocking(request.password, stored_hash)
            .await
            .map_err(|e| {
                error!("Failed to verify password: {}", e);
                ApiError::InternalServerError
            })?;

        match user {
            Some(user) if verified => {
                info!("User {} logged in", user.id);
                self.issue_token(user.id)
            }
            _ => {
                warn!("Failed login attempt for username: {}", request.username);
                Err(ApiError::InvalidCredentials)
            }
        }
    }

    fn issue_token(&self, user_id: Uuid) -> ApiResult<TokenResponse> {
        let access_token = self.jwt_service.issue(user_id).map_err(|e| {
            error!("Failed to generate access token: {}", e);
            ApiError::InternalServerError
        })?;

        Ok(TokenResponse::bearer(access_token))
    }
}
