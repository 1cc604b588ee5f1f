use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::{
    cards::Card,
    core::{Game, GameState, Identity, Player},
    logic::{Action, GameOutcome},
};
use crate::shared::{AppError, AppState};

/// Request payload for playing a card
#[derive(Debug, Serialize, Deserialize)]
pub struct PlayCardRequest {
    pub card: Card,
}

/// Request payload for voting in a bully poll
#[derive(Debug, Serialize, Deserialize)]
pub struct VoteRequest {
    pub target: String,
}

/// A player as other players may see them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub id: String,
    pub display_name: String,
    pub score: i32,
    pub has_played: bool,
    /// Only revealed once every card of the round is in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_card: Option<Card>,
}

/// The public face of a channel's game. Cards of the round in progress stay hidden.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameView {
    pub state: GameState,
    pub players: Vec<PlayerView>,
    pub current_turn_index: usize,
    pub round: u32,
    pub bully_poll_count: usize,
    pub bully_candidates: Vec<String>,
}

impl GameView {
    pub fn player(&self, id: &str) -> Option<&PlayerView> {
        self.players.iter().find(|player| player.id == id)
    }
}

impl From<&Game> for GameView {
    fn from(game: &Game) -> Self {
        let revealed = game.state() == GameState::PollingBully;
        let view_player = |(index, player): (usize, &Player)| PlayerView {
            id: player.id.clone(),
            display_name: player.display_name.clone(),
            score: player.score,
            has_played: revealed
                || (game.state() == GameState::Started && index < game.current_turn_index()),
            current_card: revealed.then_some(player.current_card),
        };

        GameView {
            state: game.state(),
            players: game.players().iter().enumerate().map(view_player).collect(),
            current_turn_index: game.current_turn_index(),
            round: game.round(),
            bully_poll_count: game.bully_poll_count(),
            bully_candidates: game.bully_candidates().to_vec(),
        }
    }
}

async fn run(
    state: &AppState,
    channel_id: &str,
    identity: &Identity,
    action: Action,
) -> Result<Json<GameOutcome>, AppError> {
    let outcome = state
        .game_service
        .handle_action(channel_id, identity, action)
        .await?;
    Ok(Json(outcome))
}

/// HTTP handler for reading the game of a channel
///
/// GET /channels/:channel_id
#[instrument(name = "get_channel_game", skip(state))]
pub async fn get_channel_game(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
) -> Result<Json<GameView>, AppError> {
    let game = state
        .game_service
        .get_game(&channel_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No game in channel: {}", channel_id)))?;

    Ok(Json(GameView::from(&game)))
}

/// POST /channels/:channel_id/join
///
/// Creates the game when the channel has none
#[instrument(name = "join_channel", skip(state, identity), fields(player_id = %identity.id))]
pub async fn join_channel(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<GameOutcome>, AppError> {
    info!(channel_id = %channel_id, "Player joining channel game");
    run(&state, &channel_id, &identity, Action::Join).await
}

/// POST /channels/:channel_id/quit
#[instrument(name = "quit_channel", skip(state, identity), fields(player_id = %identity.id))]
pub async fn quit_channel(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<GameOutcome>, AppError> {
    info!(channel_id = %channel_id, "Player leaving channel game");
    run(&state, &channel_id, &identity, Action::Quit).await
}

/// POST /channels/:channel_id/start
#[instrument(name = "start_game", skip(state, identity), fields(player_id = %identity.id))]
pub async fn start_game(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<GameOutcome>, AppError> {
    info!(channel_id = %channel_id, "Starting game");
    run(&state, &channel_id, &identity, Action::Start).await
}

/// POST /channels/:channel_id/stop
#[instrument(name = "stop_game", skip(state, identity), fields(player_id = %identity.id))]
pub async fn stop_game(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<GameOutcome>, AppError> {
    info!(channel_id = %channel_id, "Stopping game");
    run(&state, &channel_id, &identity, Action::Stop).await
}

/// POST /channels/:channel_id/play
#[instrument(name = "play_card", skip(state, identity, request), fields(player_id = %identity.id))]
pub async fn play_card(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
    Extension(identity): Extension<Identity>,
    Json(request): Json<PlayCardRequest>,
) -> Result<Json<GameOutcome>, AppError> {
    info!(channel_id = %channel_id, card = %request.card, "Player played card");
    run(&state, &channel_id, &identity, Action::Play(request.card)).await
}

/// POST /channels/:channel_id/vote
#[instrument(name = "cast_vote", skip(state, identity, request), fields(player_id = %identity.id))]
pub async fn cast_vote(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
    Extension(identity): Extension<Identity>,
    Json(request): Json<VoteRequest>,
) -> Result<Json<GameOutcome>, AppError> {
    info!(channel_id = %channel_id, target = %request.target, "Player voted");
    run(&state, &channel_id, &identity, Action::Vote(request.target)).await
}
