/// Database models for LoanLead
///
/// Each model owns the SQL for its table and is called through
/// [`crate::storage::PgStorage`].
///
/// # Models
///
/// - `user`: staff accounts for the admin panel
/// - `lead`: loan leads captured by the public form

pub mod lead;
pub mod user;
