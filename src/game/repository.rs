use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, instrument, warn};

use crate::game::core::{Game, GameError};
use crate::shared::AppError;

/// Storage of at most one game record per channel
#[async_trait]
pub trait GameRepository {
    async fn get_game(&self, channel_id: &str) -> Result<Option<Game>, AppError>;
    async fn set_game(&self, channel_id: &str, game: &Game) -> Result<(), AppError>;
    async fn delete_game(&self, channel_id: &str) -> Result<(), AppError>;
}

/// In-memory implementation of GameRepository for development and testing
pub struct InMemoryGameRepository {
    /// A mapping from channel ID to game
    games: Arc<RwLock<HashMap<String, Game>>>,
}

impl Default for InMemoryGameRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryGameRepository {
    pub fn new() -> Self {
        Self {
            games: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn game_count(&self) -> usize {
        self.games.read().await.len()
    }
}

#[async_trait]
impl GameRepository for InMemoryGameRepository {
    #[instrument(skip(self))]
    async fn get_game(&self, channel_id: &str) -> Result<Option<Game>, AppError> {
        let games = self.games.read().await;
        let game = games.get(channel_id).cloned();
        debug!(channel_id = %channel_id, found = game.is_some(), "Fetched game from memory");
        Ok(game)
    }

    #[instrument(skip(self, game))]
    async fn set_game(&self, channel_id: &str, game: &Game) -> Result<(), AppError> {
        let mut games = self.games.write().await;
        games.insert(channel_id.to_string(), game.clone());
        debug!(channel_id = %channel_id, "Stored game in memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_game(&self, channel_id: &str) -> Result<(), AppError> {
        let mut games = self.games.write().await;
        if games.remove(channel_id).is_none() {
            debug!(channel_id = %channel_id, "No game to delete in memory");
        }
        Ok(())
    }
}

/// PostgreSQL implementation keeping each game as one JSON record
pub struct PostgresGameRepository {
    pool: PgPool,
}

impl PostgresGameRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the games table if it does not exist yet
    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS cobm_games (
                channel_id TEXT PRIMARY KEY,
                game TEXT NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create games table");
            AppError::DatabaseError(e.to_string())
        })?;
        Ok(())
    }
}

#[async_trait]
impl GameRepository for PostgresGameRepository {
    #[instrument(skip(self))]
    async fn get_game(&self, channel_id: &str) -> Result<Option<Game>, AppError> {
        debug!(channel_id = %channel_id, "Fetching game from database");

        let row = sqlx::query("SELECT game FROM cobm_games WHERE channel_id = $1")
            .bind(channel_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, channel_id = %channel_id, "Failed to fetch game from database");
                AppError::DatabaseError(e.to_string())
            })?;

        let Some(row) = row else {
            return Ok(None);
        };

        let record: String = row
            .try_get("game")
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        let game = serde_json::from_str(&record).map_err(|e| {
            error!(error = %e, channel_id = %channel_id, "Stored game record is unreadable");
            AppError::Game(GameError::CorruptRecord(e.to_string()))
        })?;

        Ok(Some(game))
    }

    #[instrument(skip(self, game))]
    async fn set_game(&self, channel_id: &str, game: &Game) -> Result<(), AppError> {
        debug!(channel_id = %channel_id, "Storing game in database");

        let record =
            serde_json::to_string(game).map_err(|e| AppError::DatabaseError(e.to_string()))?;

        sqlx::query(
            "INSERT INTO cobm_games (channel_id, game, updated_at) VALUES ($1, $2, NOW())
             ON CONFLICT (channel_id) DO UPDATE SET game = EXCLUDED.game, updated_at = NOW()",
        )
        .bind(channel_id)
        .bind(record)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, channel_id = %channel_id, "Failed to store game in database");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_game(&self, channel_id: &str) -> Result<(), AppError> {
        debug!(channel_id = %channel_id, "Deleting game from database");

        sqlx::query("DELETE FROM cobm_games WHERE channel_id = $1")
            .bind(channel_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, channel_id = %channel_id, "Failed to delete game from database");
                AppError::DatabaseError(e.to_string())
            })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::core::{join, new_game, new_player};

    #[tokio::test]
    async fn test_set_and_get_game() {
        let repo = InMemoryGameRepository::new();
        let game = new_game(new_player("h", "Host"));

        repo.set_game("channel-1", &game).await.unwrap();

        let stored = repo.get_game("channel-1").await.unwrap();
        assert_eq!(stored, Some(game));
        assert_eq!(repo.get_game("channel-2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_overwrites_game() {
        let repo = InMemoryGameRepository::new();
        let game = new_game(new_player("h", "Host"));
        repo.set_game("channel-1", &game).await.unwrap();

        let game = join(game, new_player("p", "Player")).unwrap();
        repo.set_game("channel-1", &game).await.unwrap();

        let stored = repo.get_game("channel-1").await.unwrap().unwrap();
        assert_eq!(stored.players().len(), 2);
        assert_eq!(repo.game_count().await, 1);
    }

    #[tokio::test]
    async fn test_delete_game() {
        let repo = InMemoryGameRepository::new();
        repo.set_game("channel-1", &new_game(new_player("h", "Host")))
            .await
            .unwrap();

        repo.delete_game("channel-1").await.unwrap();
        assert_eq!(repo.get_game("channel-1").await.unwrap(), None);

        // Deleting an absent game is not an error
        assert!(repo.delete_game("channel-1").await.is_ok());
    }
}
