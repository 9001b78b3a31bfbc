/// Lead domain logic
///
/// - [`submission`]: public form validation and normalization
/// - [`filter`]: admin filter parameter resolution
/// - [`export`]: CSV rendering

pub mod export;
pub mod filter;
pub mod submission;

pub use export::{leads_to_csv, ExportError, CSV_HEADER};
pub use filter::{FilterError, LeadFilter, LeadFilterParams};
pub use submission::{FieldViolation, LeadSubmission, SubmissionError};
