/// Record storage
///
/// The [`Storage`] trait is the single entry point for reading and writing
/// users and leads. Request handlers hold an `Arc<dyn Storage>` and never
/// touch the pool directly.
///
/// # Implementations
///
/// - [`PgStorage`]: PostgreSQL via the [`crate::models`] queries
/// - [`MemoryStorage`]: process-local vectors, used by tests and local demos
///
/// Every method is one statement against the backing store. Nothing here
/// composes multi-statement transactions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::lead::{CreateLoanLead, LoanLead};
use crate::models::user::{CreateUser, User};

pub mod bootstrap;
pub mod memory;
pub mod postgres;

pub use memory::MemoryStorage;
pub use postgres::PgStorage;

/// Storage result type alias
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage failures
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A unique constraint rejected the write
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The backing database failed
    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.is_unique_violation() {
                let constraint = db_err.constraint().unwrap_or("unique").to_string();
                return StorageError::Conflict(constraint);
            }
        }
        StorageError::Database(err)
    }
}

/// Users and leads, as seen by the rest of the crate
#[async_trait]
pub trait Storage: Send + Sync {
    /// Verifies the store is reachable
    async fn ping(&self) -> StorageResult<()>;

    /// Looks up a user by ID
    async fn get_user(&self, id: i32) -> StorageResult<Option<User>>;

    /// Looks up a user by exact username
    async fn get_user_by_username(&self, username: &str) -> StorageResult<Option<User>>;

    /// Inserts a user; fails with [`StorageError::Conflict`] on a taken username
    async fn create_user(&self, data: CreateUser) -> StorageResult<User>;

    /// Inserts a lead with status "new" and the current time
    async fn create_lead(&self, data: CreateLoanLead) -> StorageResult<LoanLead>;

    /// Looks up a lead by ID
    async fn get_lead(&self, id: i32) -> StorageResult<Option<LoanLead>>;

    /// Lists all leads in ID order
    async fn list_leads(&self) -> StorageResult<Vec<LoanLead>>;

    /// Lists leads with `start <= created_at <= end`
    async fn list_leads_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StorageResult<Vec<LoanLead>>;

    /// Lists leads whose occupation code equals `occupation_type`
    async fn list_leads_by_occupation_type(
        &self,
        occupation_type: &str,
    ) -> StorageResult<Vec<LoanLead>>;

    /// Replaces a lead's status; returns None for an unknown ID
    async fn update_lead_status(&self, id: i32, status: &str) -> StorageResult<Option<LoanLead>>;
}
