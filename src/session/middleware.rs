use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::{debug, instrument, warn};

use crate::shared::{AppError, AppState};

/// JWT authentication middleware - validates the Authorization Bearer header and adds the
/// player's `Identity` to the request.
/// Usage: .route_layer(middleware::from_fn_with_state(app_state.clone(), session::jwt_auth))
/// Handlers can then extract Extension(identity): Extension<Identity>.
#[instrument(skip(state, req, next))]
pub async fn jwt_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    debug!(uri = %req.uri(), "JWT authentication middleware triggered");

    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| {
            warn!("Missing Authorization header in request");
            AppError::Unauthorized("Missing authorization header".to_string())
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        warn!("Invalid Authorization header format (expected Bearer token)");
        AppError::Unauthorized("Invalid authorization header format".to_string())
    })?;

    let identity = state
        .session_service
        .validate_session(token)
        .await
        .map_err(|e| {
            warn!("JWT authentication failed: {}", e);
            AppError::Unauthorized("Invalid or expired session token".to_string())
        })?;

    debug!(player_id = %identity.id, "Authentication successful, adding identity to request");
    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Identity;
    use crate::shared::test_utils::AppStateBuilder;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        middleware,
        routing::get,
        Extension, Router,
    };
    use tower::ServiceExt; // for `oneshot`

    async fn whoami(Extension(identity): Extension<Identity>) -> String {
        identity.id
    }

    fn router() -> (Router, AppState) {
        let state = AppStateBuilder::new().build();
        let app = Router::new()
            .route("/whoami", get(whoami))
            .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth))
            .with_state(state.clone());
        (app, state)
    }

    #[tokio::test]
    async fn test_missing_header_is_unauthorized() {
        let (app, _) = router();
        let request = Request::builder().uri("/whoami").body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_bad_token_is_unauthorized() {
        let (app, _) = router();
        let request = Request::builder()
            .uri("/whoami")
            .header("Authorization", "Bearer nonsense")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_valid_token_exposes_identity() {
        let (app, state) = router();
        let session = state
            .session_service
            .create_session(Some("Alice".to_string()))
            .await
            .unwrap();

        let request = Request::builder()
            .uri("/whoami")
            .header("Authorization", format!("Bearer {}", session.token))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], session.player_id.as_bytes());
    }
}
