/// Admin session middleware
///
/// [`require_admin`] guards the admin routes: it resolves the request's
/// [`Session`] through [`AuthService::require_admin`] and inserts the
/// resulting [`SessionUser`] into request extensions. A request without a
/// validly signed session cookie is rejected before the store is consulted.
///
/// [`AuthService::require_admin`]: loanlead_shared::auth::AuthService::require_admin
/// [`SessionUser`]: loanlead_shared::auth::SessionUser

use crate::{app::AppState, error::ApiError};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tower_sessions::Session;

/// Admin gate
///
/// Responds 403 "Access denied" when there is no session or the session's
/// user is not an admin.
pub async fn require_admin(
    State(state): State<AppState>,
    session: Session,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = state.auth.require_admin(&session).await?;

    tracing::debug!(user_id = user.id, path = %req.uri().path(), "Admin request");
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}
