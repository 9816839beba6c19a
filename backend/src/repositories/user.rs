//! User repository for database operations

use anyhow::Result;
use chrono::{DateTime, Utc};
use portal_auth_shared::{PublicUser, Role};
use sqlx::PgPool;
use uuid::Uuid;

/// User record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRecord> for PublicUser {
    /// Strip the password hash before anything leaves the service
    fn from(user: UserRecord) -> Self {
        PublicUser {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            role: user.role,
            verified: user.verified,
            created_at: user.created_at,
        }
    }
}

/// Fields for creating a user
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: Role,
}

/// User repository for database operations
pub struct UserRepository;

impl UserRepository {
    /// Insert a new user, unverified
    ///
    /// The `users.email` UNIQUE constraint is the authoritative duplicate
    /// guard; a violation surfaces as a sqlx database error the service maps
    /// to `EmailAlreadyRegistered`.
    pub async fn create(pool: &PgPool, new_user: NewUser<'_>) -> Result<UserRecord> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (first_name, last_name, email, password_hash, role, verified)
            VALUES ($1, $2, $3, $4, $5, FALSE)
            RETURNING id, first_name, last_name, email, password_hash, role, verified,
                      created_at, updated_at
            "#,
        )
        .bind(new_user.first_name)
        .bind(new_user.last_name)
        .bind(new_user.email)
        .bind(new_user.password_hash)
        .bind(new_user.role.as_str())
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Find user by email
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, first_name, last_name, email, password_hash, role, verified,
                   created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Find user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, first_name, last_name, email, password_hash, role, verified,
                   created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Persist changes to an existing record, keyed by id
    ///
    /// Role and email are fixed at creation and not written here.
    pub async fn save(pool: &PgPool, user: &UserRecord) -> Result<UserRecord> {
        let saved = sqlx::query_as::<_, UserRecord>(
            r#"
            UPDATE users SET
                first_name = $2,
                last_name = $3,
                password_hash = $4,
                verified = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, first_name, last_name, email, password_hash, role, verified,
                      created_at, updated_at
            "#,
        )
        .bind(user.id)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.password_hash)
        .bind(user.verified)
        .fetch_one(pool)
        .await?;

        Ok(saved)
    }

    /// Check if email exists
    pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)
            "#,
        )
        .bind(email)
        .fetch_one(pool)
        .await?;

        Ok(result)
    }
}
