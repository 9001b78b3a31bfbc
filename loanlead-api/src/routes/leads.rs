/// Public lead intake
///
/// # Endpoint
///
/// ```text
/// POST /api/leads
/// Content-Type: application/json
///
/// { "mobileNumber": "9876543210", "occupationType": "salaried" }
/// ```
///
/// # Response
///
/// `201 Created` with the stored lead (`status` is `"new"`).
///
/// # Errors
///
/// - `400 Bad Request`: Malformed JSON or a rejected field; nothing is stored
/// - `500 Internal Server Error`: Store failure

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use loanlead_shared::{leads::LeadSubmission, models::lead::LoanLead};

/// Validates and stores a lead
pub async fn create_lead(
    State(state): State<AppState>,
    body: Result<Json<LeadSubmission>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<LoanLead>)> {
    let Json(submission) = body?;
    let new_lead = submission.into_new_lead()?;

    let lead = state.storage.create_lead(new_lead).await?;

    tracing::info!(
        lead_id = lead.id,
        occupation_type = %lead.occupation_type,
        "Lead submitted"
    );

    Ok((StatusCode::CREATED, Json(lead)))
}
