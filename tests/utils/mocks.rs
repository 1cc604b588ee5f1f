use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use cobm::{AppError, Game, GameRepository, InMemoryGameRepository};

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// In-memory store that counts the writes it receives
#[derive(Default)]
pub struct CountingGameRepository {
    inner: InMemoryGameRepository,
    sets: AtomicUsize,
    deletes: AtomicUsize,
}

impl CountingGameRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_count(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }

    pub fn delete_count(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    pub async fn game_count(&self) -> usize {
        self.inner.game_count().await
    }
}

#[async_trait]
impl GameRepository for CountingGameRepository {
    async fn get_game(&self, channel_id: &str) -> Result<Option<Game>, AppError> {
        self.inner.get_game(channel_id).await
    }

    async fn set_game(&self, channel_id: &str, game: &Game) -> Result<(), AppError> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        self.inner.set_game(channel_id, game).await
    }

    async fn delete_game(&self, channel_id: &str) -> Result<(), AppError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete_game(channel_id).await
    }
}
