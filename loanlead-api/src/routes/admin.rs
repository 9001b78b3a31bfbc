/// Admin lead endpoints
///
/// Every handler here sits behind
/// [`require_admin`](crate::middleware::session::require_admin), which puts
/// the signed-in [`SessionUser`] into request extensions.
///
/// # Endpoints
///
/// - `GET /api/admin/leads` - All leads
/// - `GET /api/admin/leads/filter?startDate=&endDate=&occupationType=` - Filtered leads
/// - `PATCH /api/admin/leads/:id/status` - Replace one lead's status
/// - `GET /api/admin/leads/export` - All leads as a CSV attachment

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::header,
    response::{IntoResponse, Response},
    Extension, Json,
};
use loanlead_shared::{
    auth::SessionUser,
    leads::{leads_to_csv, LeadFilterParams},
    models::lead::LoanLead,
};
use serde::Deserialize;

/// File name offered for the CSV download
pub const EXPORT_FILE_NAME: &str = "loan-leads.csv";

/// Status update request
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    #[serde(default)]
    pub status: Option<String>,
}

/// All leads in ID order
pub async fn list_leads(State(state): State<AppState>) -> ApiResult<Json<Vec<LoanLead>>> {
    Ok(Json(state.storage.list_leads().await?))
}

/// Filtered leads
///
/// Both `startDate` and `endDate` select an inclusive `createdAt` range;
/// otherwise `occupationType` selects an exact occupation code; otherwise
/// every lead is returned. A lone date bound is ignored.
///
/// # Errors
///
/// - `400 Bad Request`: A date in a complete range cannot be parsed
pub async fn filter_leads(
    State(state): State<AppState>,
    query: Result<Query<LeadFilterParams>, QueryRejection>,
) -> ApiResult<Json<Vec<LoanLead>>> {
    let Query(params) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let filter = params.resolve()?;

    tracing::debug!(?filter, "Filtering leads");

    Ok(Json(filter.apply(state.storage.as_ref()).await?))
}

/// Replaces a lead's status
///
/// # Endpoint
///
/// ```text
/// PATCH /api/admin/leads/42/status
/// Content-Type: application/json
///
/// { "status": "contacted" }
/// ```
///
/// Any status that is not empty or whitespace-only is accepted. Only `status` changes.
///
/// # Errors
///
/// - `400 Bad Request`: Non-integer ID, or missing, empty or whitespace-only status
/// - `404 Not Found`: No lead with that ID
pub async fn update_lead_status(
    State(state): State<AppState>,
    Extension(admin): Extension<SessionUser>,
    id: Result<Path<i32>, PathRejection>,
    body: Result<Json<UpdateStatusRequest>, JsonRejection>,
) -> ApiResult<Json<LoanLead>> {
    let Path(id) = id.map_err(|_| ApiError::BadRequest("Invalid lead id".to_string()))?;
    let Json(req) = body?;

    let status = req
        .status
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ApiError::invalid_field("status", "Status is required"))?;

    let lead = state
        .storage
        .update_lead_status(id, &status)
        .await?
        .ok_or_else(|| ApiError::NotFound("Lead not found".to_string()))?;

    tracing::info!(lead_id = id, status = %status, admin_id = admin.id, "Lead status updated");

    Ok(Json(lead))
}

/// Downloads every lead as CSV
pub async fn export_leads(
    State(state): State<AppState>,
    Extension(admin): Extension<SessionUser>,
) -> ApiResult<Response> {
    let leads = state.storage.list_leads().await?;
    let csv = leads_to_csv(&leads)?;

    tracing::info!(rows = leads.len(), admin_id = admin.id, "Leads exported");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME),
            ),
        ],
        csv,
    )
        .into_response())
}
