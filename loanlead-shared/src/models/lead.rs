/// Loan lead model and database operations
///
/// A lead is the contact and interest data submitted through the public
/// application form. Leads are never deleted; the only mutable column is
/// `status`.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE loan_leads (
///     id SERIAL PRIMARY KEY,
///     full_name TEXT,
///     mobile_number TEXT NOT NULL,
///     email TEXT,
///     pan_card TEXT,
///     occupation_type TEXT NOT NULL,
///     company_name TEXT,
///     monthly_salary INTEGER,
///     status TEXT NOT NULL DEFAULT 'new',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use loanlead_shared::models::lead::{CreateLoanLead, LoanLead};
/// use loanlead_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let lead = LoanLead::create(&pool, CreateLoanLead {
///     mobile_number: "9876543210".to_string(),
///     occupation_type: "salaried".to_string(),
///     ..Default::default()
/// }).await?;
/// assert_eq!(lead.status, "new");
///
/// LoanLead::update_status(&pool, lead.id, "contacted").await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Status assigned to every lead at creation
pub const DEFAULT_STATUS: &str = "new";

/// Stored loan lead
///
/// Serializes with camelCase keys, which is the shape the admin panel reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LoanLead {
    /// Serial lead ID, never reused
    pub id: i32,

    /// Applicant name
    pub full_name: Option<String>,

    /// Contact number as submitted
    pub mobile_number: String,

    /// Contact email
    pub email: Option<String>,

    /// PAN card number
    pub pan_card: Option<String>,

    /// Occupation category code
    pub occupation_type: String,

    /// Employer or business name
    pub company_name: Option<String>,

    /// Monthly salary, positive when present
    pub monthly_salary: Option<i32>,

    /// Triage status (free-form, defaults to "new")
    pub status: String,

    /// When the lead was submitted
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new lead
///
/// Produced by `leads::submission` after validation. `status` and
/// `created_at` are not part of the input; they are always assigned on insert.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateLoanLead {
    pub full_name: Option<String>,
    pub mobile_number: String,
    pub email: Option<String>,
    pub pan_card: Option<String>,
    pub occupation_type: String,
    pub company_name: Option<String>,
    pub monthly_salary: Option<i32>,
}

const LEAD_COLUMNS: &str = "id, full_name, mobile_number, email, pan_card, occupation_type, \
     company_name, monthly_salary, status, created_at";

impl LoanLead {
    /// Inserts a new lead with status "new" and the current timestamp
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails
    pub async fn create(pool: &PgPool, data: CreateLoanLead) -> Result<Self, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO loan_leads (full_name, mobile_number, email, pan_card,
                                    occupation_type, company_name, monthly_salary,
                                    status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW())
            RETURNING {}
            "#,
            LEAD_COLUMNS
        );

        let lead = sqlx::query_as::<_, LoanLead>(&query)
            .bind(data.full_name)
            .bind(data.mobile_number)
            .bind(data.email)
            .bind(data.pan_card)
            .bind(data.occupation_type)
            .bind(data.company_name)
            .bind(data.monthly_salary)
            .bind(DEFAULT_STATUS)
            .fetch_one(pool)
            .await?;

        Ok(lead)
    }

    /// Finds a lead by ID
    pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {} FROM loan_leads WHERE id = $1", LEAD_COLUMNS);

        let lead = sqlx::query_as::<_, LoanLead>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(lead)
    }

    /// Lists every lead, oldest first
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!("SELECT {} FROM loan_leads ORDER BY id", LEAD_COLUMNS);

        let leads = sqlx::query_as::<_, LoanLead>(&query)
            .fetch_all(pool)
            .await?;

        Ok(leads)
    }

    /// Lists leads created within `[start, end]` (both bounds inclusive)
    pub async fn list_by_date_range(
        pool: &PgPool,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            r#"
            SELECT {}
            FROM loan_leads
            WHERE created_at >= $1 AND created_at <= $2
            ORDER BY id
            "#,
            LEAD_COLUMNS
        );

        let leads = sqlx::query_as::<_, LoanLead>(&query)
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await?;

        Ok(leads)
    }

    /// Lists leads with an exactly matching occupation code
    pub async fn list_by_occupation_type(
        pool: &PgPool,
        occupation_type: &str,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM loan_leads WHERE occupation_type = $1 ORDER BY id",
            LEAD_COLUMNS
        );

        let leads = sqlx::query_as::<_, LoanLead>(&query)
            .bind(occupation_type)
            .fetch_all(pool)
            .await?;

        Ok(leads)
    }

    /// Sets the status of a lead, leaving every other column untouched
    ///
    /// # Returns
    ///
    /// The updated lead, or None if no lead has this ID
    pub async fn update_status(
        pool: &PgPool,
        id: i32,
        status: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "UPDATE loan_leads SET status = $2 WHERE id = $1 RETURNING {}",
            LEAD_COLUMNS
        );

        let lead = sqlx::query_as::<_, LoanLead>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await?;

        Ok(lead)
    }
}
