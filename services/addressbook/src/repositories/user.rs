//! User repository for database operations

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use super::CredentialStore;
use crate::models::{NewUser, User};

/// PostgreSQL-backed credential store
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for UserRepository {
    async fn identity_taken(&self, username: &str, email: &str) -> DatabaseResult<bool> {
        let taken: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (SELECT 1 FROM users WHERE username = $1 OR email = $2)
            "#,
        )
        .bind(username)
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(taken)
    }

    async fn create(&self, new_user: &NewUser) -> DatabaseResult<User> {
        info!("Creating new user: {}", new_user.username);

        let mut tx = self.pool.begin().await.map_err(DatabaseError::Query)?;

        let taken: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (SELECT 1 FROM users WHERE username = $1 OR email = $2)
            "#,
        )
        .bind(&new_user.username)
        .bind(&new_user.email)
        .fetch_one(&mut *tx)
        .await
        .map_err(DatabaseError::Query)?;

        if taken {
            return Err(DatabaseError::UniqueViolation(
                "users_username_key or users_email_key".to_string(),
            ));
        }

        // A concurrent registration can still win between the check and the
        // insert; the unique indexes turn that into a UniqueViolation.
        let row = sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, password_hash, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(DatabaseError::from_query)?;

        tx.commit().await.map_err(DatabaseError::from_query)?;

        let user = User {
            id: row.get("id"),
            username: row.get("username"),
            email: row.get("email"),
            password_hash: row.get("password_hash"),
            created_at: row.get("created_at"),
        };

        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> DatabaseResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(user)
    }
}
