// Public API
pub use authority::{AdminListAuthority, Authority, HostOnlyAuthority};
pub use cards::Card;
pub use core::{
    contains_player, join, new_game, new_player, quit, rank, Game, GameError, GameState,
    Identity, Player, QuitOutcome, MIN_PLAYERS,
};
pub use handlers::{
    cast_vote, get_channel_game, join_channel, play_card, quit_channel, start_game, stop_game,
    GameView, PlayCardRequest, PlayerView, VoteRequest,
};
pub use logic::{apply, Action, GameOutcome, RoundReport};
pub use repository::{GameRepository, InMemoryGameRepository, PostgresGameRepository};
pub use resolution::PlayedCard;
pub use service::GameService;

// Internal modules
mod authority;
mod cards;
mod core;
mod handlers;
pub mod logic;
mod repository;
pub mod resolution;
mod service;
