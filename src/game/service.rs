use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, instrument, warn};

use crate::{
    game::{
        authority::Authority,
        core::{Game, GameError, Identity},
        logic::{self, Action, GameOutcome},
        repository::GameRepository,
    },
    shared::AppError,
};

/// Runs player actions against the stored game of each channel
pub struct GameService {
    game_repository: Arc<dyn GameRepository + Send + Sync>,
    authority: Arc<dyn Authority>,
    /// One lock per channel so read-modify-write cycles never interleave
    channel_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl GameService {
    pub fn new(
        game_repository: Arc<dyn GameRepository + Send + Sync>,
        authority: Arc<dyn Authority>,
    ) -> Self {
        Self {
            game_repository,
            authority,
            channel_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Apply `action` by `actor` to the game of `channel_id` and persist the result
    #[instrument(skip(self, actor), fields(player_id = %actor.id))]
    pub async fn handle_action(
        &self,
        channel_id: &str,
        actor: &Identity,
        action: Action,
    ) -> Result<GameOutcome, AppError> {
        // Input validation
        if channel_id.trim().is_empty() {
            return Err(AppError::BadRequest("Channel ID cannot be empty".to_string()));
        }
        if actor.id.trim().is_empty() {
            return Err(AppError::BadRequest("Player ID cannot be empty".to_string()));
        }

        let lock = self.channel_lock(channel_id).await;
        let result = {
            let _guard = lock.lock().await;
            self.apply_locked(channel_id, actor, action).await
        };
        self.release_channel_lock(channel_id, lock).await;

        result
    }

    async fn apply_locked(
        &self,
        channel_id: &str,
        actor: &Identity,
        action: Action,
    ) -> Result<GameOutcome, AppError> {
        let game = match self.game_repository.get_game(channel_id).await {
            Err(AppError::Game(e)) if e.is_corruption() => {
                return self.drop_corrupt_game(channel_id, &e).await;
            }
            result => result?,
        };

        let authorized = match &game {
            Some(game) if logic::requires_authority(game, &actor.id, &action) => {
                self.authority.is_authorized(&actor.id, game).await
            }
            _ => false,
        };

        match logic::apply(game, actor, action, authorized) {
            Ok((Some(game), outcome)) => {
                self.game_repository.set_game(channel_id, &game).await?;
                info!(
                    channel_id = %channel_id,
                    state = ?game.state(),
                    round = game.round(),
                    players = game.players().len(),
                    "Game updated"
                );
                Ok(outcome)
            }
            Ok((None, outcome)) => {
                self.game_repository.delete_game(channel_id).await?;
                info!(channel_id = %channel_id, "Game removed");
                Ok(outcome)
            }
            Err(e) if e.is_corruption() => self.drop_corrupt_game(channel_id, &e).await,
            Err(e) => {
                warn!(channel_id = %channel_id, error = %e, "Action rejected");
                Err(AppError::Game(e))
            }
        }
    }

    async fn drop_corrupt_game(
        &self,
        channel_id: &str,
        error: &GameError,
    ) -> Result<GameOutcome, AppError> {
        error!(
            channel_id = %channel_id,
            error = %error,
            "Stored game violates its invariants, dropping it"
        );
        self.game_repository.delete_game(channel_id).await?;
        Err(AppError::Internal)
    }

    /// Get the current game of a channel (read-only access)
    pub async fn get_game(&self, channel_id: &str) -> Result<Option<Game>, AppError> {
        self.game_repository.get_game(channel_id).await
    }

    async fn channel_lock(&self, channel_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.channel_locks.lock().await;
        locks
            .entry(channel_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Forget the channel's lock once nobody else holds or waits on it
    async fn release_channel_lock(&self, channel_id: &str, lock: Arc<Mutex<()>>) {
        let mut locks = self.channel_locks.lock().await;
        // The map and `lock` are the only owners left
        if Arc::strong_count(&lock) == 2 {
            locks.remove(channel_id);
        }
    }

    #[cfg(test)]
    async fn tracked_channels(&self) -> usize {
        self.channel_locks.lock().await.len()
    }
}
