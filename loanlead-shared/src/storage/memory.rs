/// In-process [`Storage`]
///
/// Keeps users and leads in vectors behind a `tokio::sync::RwLock`. IDs are
/// assigned from monotonically increasing counters and never reused, and the
/// username uniqueness constraint is enforced the same way the table does.
/// Used by the HTTP integration tests and for running the API without a
/// database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{Storage, StorageError, StorageResult};
use crate::models::lead::{CreateLoanLead, LoanLead, DEFAULT_STATUS};
use crate::models::user::{CreateUser, User};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    leads: Vec<LoanLead>,
    next_user_id: i32,
    next_lead_id: i32,
}

/// Shared in-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a lead with an explicit creation time
    ///
    /// Lets tests place leads inside or outside a date range.
    pub async fn insert_lead_at(&self, data: CreateLoanLead, created_at: DateTime<Utc>) -> LoanLead {
        let mut tables = self.tables.write().await;
        tables.next_lead_id += 1;

        let lead = LoanLead {
            id: tables.next_lead_id,
            full_name: data.full_name,
            mobile_number: data.mobile_number,
            email: data.email,
            pan_card: data.pan_card,
            occupation_type: data.occupation_type,
            company_name: data.company_name,
            monthly_salary: data.monthly_salary,
            status: DEFAULT_STATUS.to_string(),
            created_at,
        };

        tables.leads.push(lead.clone());
        lead
    }

    /// Number of stored leads
    pub async fn lead_count(&self) -> usize {
        self.tables.read().await.leads.len()
    }

    async fn filter_leads<F>(&self, predicate: F) -> Vec<LoanLead>
    where
        F: Fn(&LoanLead) -> bool,
    {
        self.tables
            .read()
            .await
            .leads
            .iter()
            .filter(|lead| predicate(lead))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn ping(&self) -> StorageResult<()> {
        Ok(())
    }

    async fn get_user(&self, id: i32) -> StorageResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> StorageResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn create_user(&self, data: CreateUser) -> StorageResult<User> {
        let mut tables = self.tables.write().await;

        if tables.users.iter().any(|u| u.username == data.username) {
            return Err(StorageError::Conflict("users_username_key".to_string()));
        }

        tables.next_user_id += 1;
        let user = User {
            id: tables.next_user_id,
            username: data.username,
            password: data.password,
            is_admin: data.is_admin,
        };

        tables.users.push(user.clone());
        Ok(user)
    }

    async fn create_lead(&self, data: CreateLoanLead) -> StorageResult<LoanLead> {
        Ok(self.insert_lead_at(data, Utc::now()).await)
    }

    async fn get_lead(&self, id: i32) -> StorageResult<Option<LoanLead>> {
        let tables = self.tables.read().await;
        Ok(tables.leads.iter().find(|l| l.id == id).cloned())
    }

    async fn list_leads(&self) -> StorageResult<Vec<LoanLead>> {
        Ok(self.filter_leads(|_| true).await)
    }

    async fn list_leads_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StorageResult<Vec<LoanLead>> {
        Ok(self
            .filter_leads(|lead| lead.created_at >= start && lead.created_at <= end)
            .await)
    }

    async fn list_leads_by_occupation_type(
        &self,
        occupation_type: &str,
    ) -> StorageResult<Vec<LoanLead>> {
        Ok(self
            .filter_leads(|lead| lead.occupation_type == occupation_type)
            .await)
    }

    async fn update_lead_status(&self, id: i32, status: &str) -> StorageResult<Option<LoanLead>> {
        let mut tables = self.tables.write().await;

        Ok(tables.leads.iter_mut().find(|l| l.id == id).map(|lead| {
            lead.status = status.to_string();
            lead.clone()
        }))
    }
}
