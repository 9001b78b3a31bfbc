/// PostgreSQL-backed [`Storage`]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::{Storage, StorageResult};
use crate::db::pool::health_check;
use crate::models::lead::{CreateLoanLead, LoanLead};
use crate::models::user::{CreateUser, User};

/// Storage over a shared connection pool
///
/// Cloning is cheap; the pool is reference counted.
#[derive(Debug, Clone)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns the underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Storage for PgStorage {
    async fn ping(&self) -> StorageResult<()> {
        health_check(&self.pool).await?;
        Ok(())
    }

    async fn get_user(&self, id: i32) -> StorageResult<Option<User>> {
        Ok(User::find_by_id(&self.pool, id).await?)
    }

    async fn get_user_by_username(&self, username: &str) -> StorageResult<Option<User>> {
        Ok(User::find_by_username(&self.pool, username).await?)
    }

    async fn create_user(&self, data: CreateUser) -> StorageResult<User> {
        Ok(User::create(&self.pool, data).await?)
    }

    async fn create_lead(&self, data: CreateLoanLead) -> StorageResult<LoanLead> {
        Ok(LoanLead::create(&self.pool, data).await?)
    }

    async fn get_lead(&self, id: i32) -> StorageResult<Option<LoanLead>> {
        Ok(LoanLead::find_by_id(&self.pool, id).await?)
    }

    async fn list_leads(&self) -> StorageResult<Vec<LoanLead>> {
        Ok(LoanLead::list_all(&self.pool).await?)
    }

    async fn list_leads_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StorageResult<Vec<LoanLead>> {
        Ok(LoanLead::list_by_date_range(&self.pool, start, end).await?)
    }

    async fn list_leads_by_occupation_type(
        &self,
        occupation_type: &str,
    ) -> StorageResult<Vec<LoanLead>> {
        Ok(LoanLead::list_by_occupation_type(&self.pool, occupation_type).await?)
    }

    async fn update_lead_status(&self, id: i32, status: &str) -> StorageResult<Option<LoanLead>> {
        Ok(LoanLead::update_status(&self.pool, id, status).await?)
    }
}
