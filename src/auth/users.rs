/**
 * User Model and Store Operations
 *
 * This module defines the user record, the closed role set, and the store
 * boundary the flows talk to. The store is a trait so the service can run
 * against PostgreSQL in production and an in-process store in tests or
 * when no `DATABASE_URL` is configured.
 *
 * The store exclusively owns user records: gates only read claims, flows
 * only call through this boundary. Only salted password hashes are stored,
 * never plaintext.
 */

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Role attribute for role-based access control
///
/// Closed set; serialized as the exact strings `"User"` and `"Admin"` both
/// in the store and inside token claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    User,
    Admin,
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

impl Role {
    /// Canonical string form, as persisted and as embedded in claims
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Admin => "Admin",
        }
    }

    /// Parse the canonical string form; `None` for anything else
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "User" => Some(Role::User),
            "Admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// A user record as persisted by the store
///
/// Invariants: `username` is unique; at least one of `password_hash` or
/// `federated_id` is present (the account's primary credential), though
/// both may coexist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID (UUID)
    pub id: Uuid,
    /// Username (unique)
    pub username: String,
    /// Hashed password (bcrypt); absent for pure-federated accounts
    pub password_hash: Option<String>,
    /// Federated provider subject id; absent for local-credential accounts
    pub federated_id: Option<String>,
    /// Role for authorization decisions
    pub role: Role,
    /// Created at timestamp
    pub created_at: DateTime<Utc>,
    /// Updated at timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Build a new local-credential user record
    pub fn new_local(username: String, password_hash: String, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            password_hash: Some(password_hash),
            federated_id: None,
            role,
            created_at: now,
            updated_at: now,
        }
    }

    /// Build a new federated user record (no local password, role `User`)
    pub fn new_federated(username: String, federated_id: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            password_hash: None,
            federated_id: Some(federated_id),
            role: Role::User,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Errors surfaced by a user store
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint was violated
    #[error("duplicate record")]
    Duplicate,
    /// The store could not serve the request
    #[error("user store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db) = err {
            if db.is_unique_violation() {
                return StoreError::Duplicate;
            }
        }
        StoreError::Unavailable(err.to_string())
    }
}

/// Abstract user lookup/creation service
///
/// The flows depend on this boundary, not on a concrete database.
/// `find_or_create_federated` is atomic: concurrent federated logins with
/// the same external id resolve to a single record.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a user by exact username
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Persist a new user record
    ///
    /// Fails with `StoreError::Duplicate` if the username is taken.
    async fn create(&self, user: User) -> Result<User, StoreError>;

    /// Find the user owning a federated identity, creating the record on
    /// first occurrence
    async fn find_or_create_federated(
        &self,
        external_id: &str,
        display_name: &str,
    ) -> Result<User, StoreError>;
}

/// In-process user store
///
/// Fallback when no database is configured, and the store the test suite
/// runs against. The write lock spans lookup+insert so find-or-create is
/// atomic.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn create(&self, user: User) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.username == user.username) {
            return Err(StoreError::Duplicate);
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn find_or_create_federated(
        &self,
        external_id: &str,
        display_name: &str,
    ) -> Result<User, StoreError> {
        let mut users = self.users.write().await;

        if let Some(existing) = users
            .iter()
            .find(|u| u.federated_id.as_deref() == Some(external_id))
        {
            return Ok(existing.clone());
        }

        let mut user = User::new_federated(display_name.to_string(), external_id.to_string());
        if users.iter().any(|u| u.username == user.username) {
            // Provider display names are not unique locally; disambiguate.
            user.username = format!("{}-{}", user.username, &user.id.to_string()[..8]);
        }
        users.push(user.clone());
        Ok(user)
    }
}

/// PostgreSQL-backed user store
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Row shape for the users table; `role` is stored as text
#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    password_hash: Option<String>,
    federated_id: Option<String>,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            password_hash: row.password_hash,
            federated_id: row.federated_id,
            role: Role::parse(&row.role).unwrap_or_default(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const USER_COLUMNS: &str =
    "id, username, password_hash, federated_id, role, created_at, updated_at";

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn create(&self, user: User) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (id, username, password_hash, federated_id, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.federated_id)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn find_or_create_federated(
        &self,
        external_id: &str,
        display_name: &str,
    ) -> Result<User, StoreError> {
        let existing = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE federated_id = $1"
        ))
        .bind(external_id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = existing {
            return Ok(row.into());
        }

        let user = User::new_federated(display_name.to_string(), external_id.to_string());
        match self.insert_federated(&user).await {
            Ok(created) => Ok(created),
            Err(StoreError::Duplicate) => {
                // Either a concurrent login won the insert for this
                // federated id, or the display name collided with an
                // existing username.
                let raced = sqlx::query_as::<_, UserRow>(&format!(
                    "SELECT {USER_COLUMNS} FROM users WHERE federated_id = $1"
                ))
                .bind(external_id)
                .fetch_optional(&self.pool)
                .await?;

                if let Some(row) = raced {
                    return Ok(row.into());
                }

                let mut retry = user;
                retry.username = format!("{}-{}", retry.username, &retry.id.to_string()[..8]);
                self.insert_federated(&retry).await
            }
            Err(other) => Err(other),
        }
    }
}

impl PgUserStore {
    async fn insert_federated(&self, user: &User) -> Result<User, StoreError> {
        // Conflict target is the partial unique index on federated_id, so
        // two concurrent first logins resolve to the same row.
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (id, username, password_hash, federated_id, role, created_at, updated_at)
            VALUES ($1, $2, NULL, $3, $4, $5, $5)
            ON CONFLICT (federated_id) WHERE federated_id IS NOT NULL
            DO UPDATE SET updated_at = EXCLUDED.updated_at
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.federated_id)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }
}
