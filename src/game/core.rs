// A game is the session of one chat channel. Players join while it is in the
// lobby, the host starts it, and then everyone plays one card per round in
// join order until someone stops the game.

use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::HashSet;

use crate::game::cards::Card;

/// Fewest players a game can be started with
pub const MIN_PLAYERS: usize = 2;

/// Stable identity of an acting user, as supplied by the host platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub display_name: String,
}

impl Identity {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub display_name: String,
    pub current_card: Card,
    pub score: i32,
    /// Candidate this player voted for in the running bully poll
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voted_for: Option<String>,
}

/// Create a fresh player holding the default card
pub fn new_player(id: impl Into<String>, display_name: impl Into<String>) -> Player {
    Player {
        id: id.into(),
        display_name: display_name.into(),
        current_card: Card::default(),
        score: 0,
        voted_for: None,
    }
}

impl From<&Identity> for Player {
    fn from(identity: &Identity) -> Self {
        new_player(identity.id.clone(), identity.display_name.clone())
    }
}

/// Discriminants and serialized names are persisted, do not reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    Joining = 0,
    Started = 1,
    PollingBully = 2,
    Ended = 3,
}

impl GameState {
    pub fn value(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for GameState {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(GameState::Joining),
            1 => Ok(GameState::Started),
            2 => Ok(GameState::PollingBully),
            3 => Ok(GameState::Ended),
            _ => Err(format!("Unknown game state: {}", value)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("Game has already started")]
    GameAlreadyStarted,
    #[error("Player is already in the game")]
    PlayerAlreadyInGame,
    #[error("Player is not in the game")]
    PlayerNotInGame,
    #[error("Player is not allowed to do that")]
    NotAuthorized,
    #[error("Invalid card play")]
    InvalidCardPlay,
    #[error("Invalid vote")]
    InvalidVote,
    #[error("At least {} players are needed to start", MIN_PLAYERS)]
    NotEnoughPlayers,
    #[error("Game roster is empty or inconsistent")]
    EmptyRoster,
    #[error("Stored game is corrupt: {0}")]
    CorruptRecord(String),
}

impl GameError {
    /// The stored record cannot be played on and has to be dropped
    pub fn is_corruption(&self) -> bool {
        matches!(self, GameError::EmptyRoster | GameError::CorruptRecord(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub(super) state: GameState,
    pub(super) players: Vec<Player>, // Join order, the first player is the host
    pub(super) current_turn_index: usize, // The index of the player who is to act
    pub(super) bully_poll_count: usize,
    #[serde(default)]
    pub(super) round: u32,
    #[serde(default)]
    pub(super) bully_candidates: Vec<String>,
}

/// Create a game in the lobby with `host` as its only player
pub fn new_game(host: Player) -> Game {
    Game {
        state: GameState::Joining,
        players: vec![host],
        current_turn_index: 0,
        bully_poll_count: 0,
        round: 0,
        bully_candidates: vec![],
    }
}

/// Check if a player with `id` is already in the game
pub fn contains_player(game: &Game, id: &str) -> bool {
    game.players.iter().any(|player| player.id == id)
}

/// Add `player` to a game that is still in the lobby
pub fn join(mut game: Game, player: Player) -> Result<Game, GameError> {
    if game.state != GameState::Joining {
        return Err(GameError::GameAlreadyStarted);
    }
    if contains_player(&game, &player.id) {
        return Err(GameError::PlayerAlreadyInGame);
    }

    game.players.push(player);
    Ok(game)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuitOutcome {
    /// The last player left, the stored game must be deleted
    Aborted,
    Continued(Game),
}

/// Remove a player from the lobby. The next player in join order inherits
/// the host seat when the host leaves.
pub fn quit(mut game: Game, id: &str) -> Result<QuitOutcome, GameError> {
    let position = game
        .players
        .iter()
        .position(|player| player.id == id)
        .ok_or(GameError::PlayerNotInGame)?;

    if game.state != GameState::Joining {
        return Err(GameError::GameAlreadyStarted);
    }

    game.players.remove(position);
    if game.players.is_empty() {
        return Ok(QuitOutcome::Aborted);
    }

    Ok(QuitOutcome::Continued(game))
}

/// Players by score, highest first. Equal scores keep join order.
pub fn rank(game: &Game) -> Vec<Player> {
    let mut ranking = game.players.clone();
    ranking.sort_by_key(|player| Reverse(player.score));
    ranking
}

impl Game {
    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn current_turn_index(&self) -> usize {
        self.current_turn_index
    }

    pub fn bully_poll_count(&self) -> usize {
        self.bully_poll_count
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn bully_candidates(&self) -> &[String] {
        &self.bully_candidates
    }

    pub fn host(&self) -> Option<&Player> {
        self.players.first()
    }

    pub fn is_host(&self, id: &str) -> bool {
        self.host().is_some_and(|host| host.id == id)
    }

    pub fn player(&self, id: &str) -> Option<&Player> {
        self.players.iter().find(|player| player.id == id)
    }

    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.current_turn_index)
    }

    /// Check the invariants of a stored game. A failure means the record was
    /// corrupted and cannot be played on.
    pub fn validate(&self) -> Result<(), GameError> {
        if self.state == GameState::Ended {
            return Err(GameError::CorruptRecord(
                "an ended game was stored".to_string(),
            ));
        }
        if self.players.is_empty() || self.current_turn_index >= self.players.len() {
            return Err(GameError::EmptyRoster);
        }

        let mut ids = HashSet::new();
        if let Some(duplicate) = self.players.iter().find(|p| !ids.insert(p.id.as_str())) {
            return Err(GameError::CorruptRecord(format!(
                "player {} appears twice",
                duplicate.id
            )));
        }

        if self.state == GameState::PollingBully {
            if self.bully_candidates.is_empty() {
                return Err(GameError::CorruptRecord(
                    "bully poll without candidates".to_string(),
                ));
            }
            if let Some(stranger) = self
                .bully_candidates
                .iter()
                .find(|candidate| !contains_player(self, candidate))
            {
                return Err(GameError::CorruptRecord(format!(
                    "bully candidate {} is not in the game",
                    stranger
                )));
            }
        }
        Ok(())
    }
}
