// Library crate for the channel card game server
// This file exposes the public API for integration tests

pub mod app;
pub mod config;
pub mod game;
pub mod session;
pub mod shared;

// Re-export commonly used types for easier access in tests
pub use app::build_router;
pub use config::AppConfig;
pub use game::{
    Action, Card, Game, GameError, GameOutcome, GameRepository, GameService, GameState, GameView,
    Identity, InMemoryGameRepository, Player, PlayerView,
};
pub use session::{SessionResponse, SessionService, TokenConfig};
pub use shared::{AppError, AppState};
