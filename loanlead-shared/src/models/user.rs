/// User model and database operations
///
/// Staff accounts that can sign in to the admin panel.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id SERIAL PRIMARY KEY,
///     username TEXT NOT NULL UNIQUE,
///     password TEXT NOT NULL,
///     is_admin BOOLEAN NOT NULL DEFAULT FALSE
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use loanlead_shared::models::user::{User, CreateUser};
/// use loanlead_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(&pool, CreateUser {
///     username: "triage".to_string(),
///     password: "changeme".to_string(),
///     is_admin: true,
/// }).await?;
///
/// let found = User::find_by_username(&pool, "triage").await?;
/// assert_eq!(found.map(|u| u.id), Some(user.id));
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// User account
///
/// The password is kept exactly as entered and compared byte-for-byte at
/// login. It is never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Serial user ID
    pub id: i32,

    /// Login name, unique across all users
    pub username: String,

    /// Stored password
    #[serde(skip_serializing)]
    pub password: String,

    /// Whether the user may access admin routes
    pub is_admin: bool,
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Login name
    pub username: String,

    /// Password
    pub password: String,

    /// Admin flag
    #[serde(default)]
    pub is_admin: bool,
}

impl User {
    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Returns an error if the username already exists (unique constraint
    /// violation) or the database connection fails.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password, is_admin)
            VALUES ($1, $2, $3)
            RETURNING id, username, password, is_admin
            "#,
        )
        .bind(data.username)
        .bind(data.password)
        .bind(data.is_admin)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password, is_admin
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by username
    ///
    /// The lookup is an exact, case-sensitive match.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use loanlead_shared::models::user::User;
    /// # use sqlx::PgPool;
    /// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
    /// if let Some(user) = User::find_by_username(&pool, "admin").await? {
    ///     println!("admin has id {}", user.id);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password, is_admin
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }
}
