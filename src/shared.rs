use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::game::{GameError, GameService};
use crate::session::SessionService;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub game_service: Arc<GameService>,
    pub session_service: Arc<SessionService>,
}

impl AppState {
    pub fn new(game_service: Arc<GameService>, session_service: Arc<SessionService>) -> Self {
        Self {
            game_service,
            session_service,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Game error: {0}")]
    Game(#[from] GameError),

    #[error("JWT error: {0}")]
    JwtError(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Game(error) => {
                let status = match error {
                    GameError::NotAuthorized => StatusCode::FORBIDDEN,
                    GameError::PlayerNotInGame => StatusCode::NOT_FOUND,
                    GameError::EmptyRoster | GameError::CorruptRecord(_) => {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                    GameError::GameAlreadyStarted
                    | GameError::PlayerAlreadyInGame
                    | GameError::InvalidCardPlay
                    | GameError::InvalidVote
                    | GameError::NotEnoughPlayers => StatusCode::CONFLICT,
                };
                (status, error.to_string())
            }
            AppError::JwtError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::DatabaseError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", msg),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
pub mod test_utils {
    use super::*;
    use crate::game::{Authority, GameRepository, HostOnlyAuthority, InMemoryGameRepository};
    use crate::session::TokenConfig;

    /// Builder for creating AppState with overrides for testing
    pub struct AppStateBuilder {
        game_repository: Option<Arc<dyn GameRepository + Send + Sync>>,
        authority: Option<Arc<dyn Authority>>,
    }

    impl AppStateBuilder {
        pub fn new() -> Self {
            Self {
                game_repository: None,
                authority: None,
            }
        }

        pub fn with_game_repository(mut self, repo: Arc<dyn GameRepository + Send + Sync>) -> Self {
            self.game_repository = Some(repo);
            self
        }

        pub fn with_authority(mut self, authority: Arc<dyn Authority>) -> Self {
            self.authority = Some(authority);
            self
        }

        pub fn build(self) -> AppState {
            let game_repository = self
                .game_repository
                .unwrap_or_else(|| Arc::new(InMemoryGameRepository::new()));
            let authority = self
                .authority
                .unwrap_or_else(|| Arc::new(HostOnlyAuthority));

            AppState {
                game_service: Arc::new(GameService::new(game_repository, authority)),
                session_service: Arc::new(SessionService::new(TokenConfig::new(
                    "test-secret".to_string(),
                    1,
                ))),
            }
        }
    }

    impl Default for AppStateBuilder {
        fn default() -> Self {
            Self::new()
        }
    }
}
