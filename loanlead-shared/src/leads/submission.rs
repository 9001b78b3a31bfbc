/// Public lead submission
///
/// Turns the JSON posted by the application form into a [`CreateLoanLead`].
/// Validation runs entirely before any store access; a rejected submission
/// never produces a partial write.
///
/// # Rules
///
/// | Field | Rule |
/// |---|---|
/// | `mobileNumber` | required, 10–15 characters from `0-9`, `+`, `-`, whitespace |
/// | `email` | optional, must be a valid address when present |
/// | `panCard` | optional, `AAAAA9999A` when present |
/// | `occupationType` | required, any non-empty code |
/// | `monthlySalary` | optional, positive integer (number or numeric string) |
///
/// Empty optional strings are stored as NULL. An absent or empty
/// `monthlySalary` is stored as NULL rather than 0.
///
/// # Example
///
/// ```
/// use loanlead_shared::leads::submission::LeadSubmission;
///
/// let submission: LeadSubmission = serde_json::from_str(
///     r#"{"mobileNumber":"9876543210","occupationType":"salaried","monthlySalary":"45000"}"#,
/// ).unwrap();
///
/// let lead = submission.into_new_lead().unwrap();
/// assert_eq!(lead.monthly_salary, Some(45000));
/// ```

use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use crate::models::lead::CreateLoanLead;

const MOBILE_MIN_LEN: usize = 10;
const MOBILE_MAX_LEN: usize = 15;

/// Raw form payload
///
/// Every field is optional at the type level so that a missing required
/// field is reported as a validation message instead of a decode failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadSubmission {
    pub full_name: Option<String>,
    pub mobile_number: Option<String>,
    pub email: Option<String>,
    pub pan_card: Option<String>,
    pub occupation_type: Option<String>,
    pub company_name: Option<String>,
    pub monthly_salary: Option<SalaryInput>,
}

/// Salary as sent by the form (a string) or by API clients (a number)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SalaryInput {
    Number(serde_json::Number),
    Text(String),
}

/// One rejected field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    /// JSON field name
    pub field: &'static str,

    /// Human-readable message shown next to the form field
    pub message: &'static str,
}

/// All violations of a submission, in form order
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", self.message())]
pub struct SubmissionError {
    pub violations: Vec<FieldViolation>,
}

impl SubmissionError {
    /// The first violated field's message
    pub fn message(&self) -> &'static str {
        self.violations
            .first()
            .map(|v| v.message)
            .unwrap_or("Invalid input")
    }
}

impl LeadSubmission {
    /// Validates and normalizes the submission
    ///
    /// # Errors
    ///
    /// Returns every violated rule; [`SubmissionError::message`] is the first.
    pub fn into_new_lead(self) -> Result<CreateLoanLead, SubmissionError> {
        let mut violations = Vec::new();
        let mut reject = |field, message| violations.push(FieldViolation { field, message });

        let mobile_number = self.mobile_number.filter(|v| !v.is_empty());
        match mobile_number.as_deref() {
            None => reject("mobileNumber", "Mobile number is required"),
            Some(mobile) => {
                if let Err(message) = check_mobile(mobile) {
                    reject("mobileNumber", message);
                }
            }
        }

        let email = trimmed(self.email);
        if let Some(ref email) = email {
            if !email.validate_email() {
                reject("email", "Invalid email address");
            }
        }

        let pan_card = trimmed(self.pan_card);
        if let Some(ref pan) = pan_card {
            if !is_pan_format(pan) {
                reject("panCard", "Invalid PAN card format (e.g., ABCDE1234F)");
            }
        }

        let occupation_type = non_blank(self.occupation_type);
        if occupation_type.is_none() {
            reject("occupationType", "Please select an occupation type");
        }

        let monthly_salary = match self.monthly_salary.map(parse_salary) {
            None => None,
            Some(Ok(salary)) => salary,
            Some(Err(message)) => {
                reject("monthlySalary", message);
                None
            }
        };

        match (mobile_number, occupation_type) {
            (Some(mobile_number), Some(occupation_type)) if violations.is_empty() => {
                Ok(CreateLoanLead {
                    full_name: trimmed(self.full_name),
                    mobile_number,
                    email,
                    pan_card,
                    occupation_type,
                    company_name: trimmed(self.company_name),
                    monthly_salary,
                })
            }
            _ => Err(SubmissionError { violations }),
        }
    }
}

/// Keeps the value as-is unless it is empty or whitespace
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Trims the value and drops it if nothing remains
fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn check_mobile(mobile: &str) -> Result<(), &'static str> {
    let len = mobile.chars().count();
    if len < MOBILE_MIN_LEN {
        return Err("Mobile number must be at least 10 digits");
    }
    if len > MOBILE_MAX_LEN {
        return Err("Mobile number must not exceed 15 digits");
    }
    if !mobile
        .chars()
        .all(|c| c.is_ascii_digit() || c == '+' || c == '-' || c.is_whitespace())
    {
        return Err("Invalid mobile number format");
    }
    Ok(())
}

/// Five uppercase letters, four digits, one uppercase letter
fn is_pan_format(pan: &str) -> bool {
    let bytes = pan.as_bytes();
    bytes.len() == 10
        && bytes[..5].iter().all(u8::is_ascii_uppercase)
        && bytes[5..9].iter().all(u8::is_ascii_digit)
        && bytes[9].is_ascii_uppercase()
}

/// `Ok(None)` for an empty string, `Ok(Some(n))` for a positive integer
fn parse_salary(input: SalaryInput) -> Result<Option<i32>, &'static str> {
    const MESSAGE: &str = "Monthly salary must be a positive number";

    let value = match input {
        SalaryInput::Number(n) => n.as_i64().ok_or(MESSAGE)?,
        SalaryInput::Text(text) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            text.parse::<i64>().map_err(|_| MESSAGE)?
        }
    };

    match i32::try_from(value) {
        Ok(salary) if salary > 0 => Ok(Some(salary)),
        _ => Err(MESSAGE),
    }
}
