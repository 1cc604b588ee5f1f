use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    generators::{DisplayNameGenerator, PetNameGenerator, PlayerIdGenerator, UuidPlayerIdGenerator},
    token::TokenConfig,
    types::SessionResponse,
};
use crate::{game::Identity, shared::AppError};

/// Longest display name accepted from a client
pub const MAX_DISPLAY_NAME_LEN: usize = 32;

/// Issues and verifies the signed identities players act under
pub struct SessionService {
    token_config: TokenConfig,
    player_ids: Arc<dyn PlayerIdGenerator>,
    display_names: Arc<dyn DisplayNameGenerator>,
}

impl SessionService {
    pub fn new(token_config: TokenConfig) -> Self {
        Self::with_generators(
            token_config,
            Arc::new(UuidPlayerIdGenerator),
            Arc::new(PetNameGenerator::new()),
        )
    }

    pub fn with_generators(
        token_config: TokenConfig,
        player_ids: Arc<dyn PlayerIdGenerator>,
        display_names: Arc<dyn DisplayNameGenerator>,
    ) -> Self {
        Self {
            token_config,
            player_ids,
            display_names,
        }
    }

    /// Creates a fresh identity, naming it after `display_name` or a generated pet name
    #[instrument(skip(self))]
    pub async fn create_session(
        &self,
        display_name: Option<String>,
    ) -> Result<SessionResponse, AppError> {
        let display_name = match display_name.map(|name| name.trim().to_string()) {
            Some(name) if name.is_empty() => {
                return Err(AppError::BadRequest("Display name cannot be empty".to_string()));
            }
            Some(name) if name.chars().count() > MAX_DISPLAY_NAME_LEN => {
                return Err(AppError::BadRequest(format!(
                    "Display name is longer than {} characters",
                    MAX_DISPLAY_NAME_LEN
                )));
            }
            Some(name) => name,
            None => self.display_names.generate().await,
        };
        let player_id = self.player_ids.generate();

        let token = self
            .token_config
            .create_token(player_id.clone(), display_name.clone())?;

        info!(player_id = %player_id, display_name = %display_name, "Session created");

        Ok(SessionResponse {
            token,
            player_id,
            display_name,
        })
    }

    /// Validates a session token and returns the identity it carries
    #[instrument(skip(self, token))]
    pub async fn validate_session(&self, token: &str) -> Result<Identity, AppError> {
        match self.token_config.validate_token(token) {
            Ok(claims) => Ok(claims.into()),
            Err(e) => {
                warn!(error = %e, "Session token rejected");
                Err(e)
            }
        }
    }
}
