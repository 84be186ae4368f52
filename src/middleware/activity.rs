use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};

use crate::{middleware::AuthUser, state::AppState};

/// Records when the authenticated user was last seen. Runs after the handler
/// so a failed update never affects the response.
pub async fn log_user_activity(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    req: Request<Body>,
    next: Next,
) -> Response {
    let response = next.run(req).await;

    if let Err(e) = state.user_repository.touch_last_active(user_id).await {
        tracing::warn!(user_id = %user_id, "Failed to update last active: {}", e);
    }

    response
}
