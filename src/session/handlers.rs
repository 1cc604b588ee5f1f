use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::{info, instrument, warn};

use super::types::{CreateSessionRequest, SessionResponse};
use crate::shared::{AppError, AppState};

/// HTTP handler for creating a new session
///
/// POST /session
/// Returns a JWT token with the player's id and display name
#[instrument(name = "create_session", skip(state, request))]
pub async fn create_session(
    State(state): State<AppState>,
    request: Result<Json<CreateSessionRequest>, JsonRejection>,
) -> Result<Json<SessionResponse>, AppError> {
    // A request without a JSON body asks for a generated name
    let request = match request {
        Ok(Json(request)) => request,
        Err(JsonRejection::MissingJsonContentType(_)) => CreateSessionRequest::default(),
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "Rejected session request body");
            return Err(AppError::BadRequest(rejection.body_text()));
        }
    };

    let session = state
        .session_service
        .create_session(request.display_name)
        .await?;

    info!(
        player_id = %session.player_id,
        token_length = session.token.len(),
        "Session created successfully"
    );

    Ok(Json(session))
}
