/// CSV export of loan leads
///
/// The first line is the fixed header, written as-is. Every data row has
/// all ten fields double-quoted; absent optional values become `""`.
/// Rows end in `\n`.
///
/// Embedded double quotes are doubled (`"` → `""`), so a field containing a
/// comma or quote stays in its column.
///
/// # Example
///
/// ```
/// use loanlead_shared::leads::export::{leads_to_csv, CSV_HEADER};
///
/// let csv = leads_to_csv(&[]).unwrap();
/// assert_eq!(csv, format!("{}\n", CSV_HEADER));
/// ```

use chrono::SecondsFormat;
use std::string::FromUtf8Error;

use crate::models::lead::LoanLead;

/// Column header, in column order
pub const CSV_HEADER: &str =
    "ID,Full Name,Mobile,Email,PAN Card,Occupation,Company,Monthly Salary,Status,Created At";

/// Export failures
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV flush failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV output is not UTF-8: {0}")]
    Encoding(#[from] FromUtf8Error),
}

/// Renders leads as CSV, header first, one row per lead in the given order
pub fn leads_to_csv(leads: &[LoanLead]) -> Result<String, ExportError> {
    let mut buffer = Vec::with_capacity(CSV_HEADER.len() + 1 + leads.len() * 128);
    buffer.extend_from_slice(CSV_HEADER.as_bytes());
    buffer.push(b'\n');

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(buffer);

    for lead in leads {
        writer.write_record(row(lead))?;
    }

    let buffer = writer
        .into_inner()
        .map_err(|err| ExportError::Io(err.into_error()))?;

    Ok(String::from_utf8(buffer)?)
}

fn row(lead: &LoanLead) -> [String; 10] {
    let text = |value: &Option<String>| value.clone().unwrap_or_default();

    [
        lead.id.to_string(),
        text(&lead.full_name),
        lead.mobile_number.clone(),
        text(&lead.email),
        text(&lead.pan_card),
        lead.occupation_type.clone(),
        text(&lead.company_name),
        lead.monthly_salary.map(|s| s.to_string()).unwrap_or_default(),
        lead.status.clone(),
        lead.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
    ]
}
