// The game structure is passed in by value together with one player action,
// and the updated game comes back alongside an outcome for the caller to
// render. `None` in place of the game means the stored record must go.
use serde::{Deserialize, Serialize};

use crate::game::{
    cards::Card,
    core::{
        contains_player, join, new_game, quit, rank, Game, GameError, GameState, Identity,
        Player, QuitOutcome, MIN_PLAYERS,
    },
    resolution::{self, PlayedCard, RoundVerdict},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Join,
    Quit,
    Start,
    Stop,
    Play(Card),
    Vote(String), // Candidate player id
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundReport {
    pub round: u32,
    pub cards: Vec<PlayedCard>,
    pub loser_id: String,
    pub winner_ids: Vec<String>,
    pub decided_by_poll: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameOutcome {
    Created {
        host: Player,
    },
    Joined {
        player: Player,
        roster_size: usize,
    },
    Left {
        player_id: String,
        host_id: String,
        roster_size: usize,
    },
    Aborted,
    Started {
        round: u32,
        turn_order: Vec<String>,
    },
    CardPlayed {
        player_id: String,
        next_player_id: String,
    },
    RoundResolved {
        report: RoundReport,
    },
    RoundDrawn {
        round: u32,
        cards: Vec<PlayedCard>,
    },
    BullyPollStarted {
        round: u32,
        candidates: Vec<String>,
    },
    VoteCast {
        voter_id: String,
        votes_received: usize,
        votes_needed: usize,
    },
    BullyPollRestarted {
        round: u32,
        candidates: Vec<String>,
    },
    Ended {
        rounds_played: u32,
        ranking: Vec<Player>,
    },
}

fn may_command(game: &Game, actor_id: &str, authorized: bool) -> bool {
    game.is_host(actor_id) || authorized
}

/// Whether `action` needs the authority oracle's opinion on `actor_id`
pub fn requires_authority(game: &Game, actor_id: &str, action: &Action) -> bool {
    matches!(action, Action::Start | Action::Stop) && !game.is_host(actor_id)
}

/// Close the lobby and begin the first round
pub fn start(mut game: Game, actor_id: &str, authorized: bool) -> Result<Game, GameError> {
    if game.state != GameState::Joining {
        return Err(GameError::GameAlreadyStarted);
    }
    if !may_command(&game, actor_id, authorized) {
        return Err(GameError::NotAuthorized);
    }
    if game.players.len() < MIN_PLAYERS {
        return Err(GameError::NotEnoughPlayers);
    }

    game.state = GameState::Started;
    game.current_turn_index = 0;
    game.round = 1;
    Ok(game)
}

/// End the game in any state. The caller ranks the players and drops the record.
pub fn stop(mut game: Game, actor_id: &str, authorized: bool) -> Result<Game, GameError> {
    if !may_command(&game, actor_id, authorized) {
        return Err(GameError::NotAuthorized);
    }

    game.state = GameState::Ended;
    game.bully_candidates.clear();
    for player in &mut game.players {
        player.voted_for = None;
    }
    Ok(game)
}

/// Record the card of the player whose turn it is. The last card of a round
/// resolves it.
pub fn play(mut game: Game, actor_id: &str, card: Card) -> Result<(Game, GameOutcome), GameError> {
    if !contains_player(&game, actor_id) {
        return Err(GameError::PlayerNotInGame);
    }
    if game.state != GameState::Started {
        return Err(GameError::InvalidCardPlay);
    }

    let turn = game.current_turn_index;
    let current = game.players.get_mut(turn).ok_or(GameError::EmptyRoster)?;
    if current.id != actor_id {
        return Err(GameError::InvalidCardPlay);
    }
    current.current_card = card;

    if let Some(next) = game.players.get(turn + 1) {
        let outcome = GameOutcome::CardPlayed {
            player_id: actor_id.to_string(),
            next_player_id: next.id.clone(),
        };
        game.current_turn_index = turn + 1;
        return Ok((game, outcome));
    }

    game.current_turn_index = 0;
    let outcome = resolve_round(&mut game);
    Ok((game, outcome))
}

fn resolve_round(game: &mut Game) -> GameOutcome {
    let standings = resolution::standings(&game.players);

    match resolution::judge(&standings) {
        RoundVerdict::Draw => {
            let outcome = GameOutcome::RoundDrawn {
                round: game.round,
                cards: resolution::revealed_cards(&game.players),
            };
            game.round += 1;
            outcome
        }
        RoundVerdict::Loser(loser) => GameOutcome::RoundResolved {
            report: settle_round(game, loser, false),
        },
        RoundVerdict::Tied(tied) => {
            game.state = GameState::PollingBully;
            game.bully_poll_count = 0;
            game.bully_candidates = tied
                .into_iter()
                .map(|i| game.players[i].id.clone())
                .collect();
            for player in &mut game.players {
                player.voted_for = None;
            }
            GameOutcome::BullyPollStarted {
                round: game.round,
                candidates: game.bully_candidates.clone(),
            }
        }
    }
}

fn settle_round(game: &mut Game, loser: usize, decided_by_poll: bool) -> RoundReport {
    let cards = resolution::revealed_cards(&game.players);
    let winners = resolution::settle(&mut game.players, loser);

    let report = RoundReport {
        round: game.round,
        cards,
        loser_id: game.players[loser].id.clone(),
        winner_ids: winners
            .into_iter()
            .map(|i| game.players[i].id.clone())
            .collect(),
        decided_by_poll,
    };

    game.state = GameState::Started;
    game.current_turn_index = 0;
    game.round += 1;
    report
}

/// Cast a vote in the bully poll. Once everyone has voted the plurality
/// candidate loses the round, or a tie starts a fresh poll among the leaders.
pub fn vote(
    mut game: Game,
    voter_id: &str,
    target_id: &str,
) -> Result<(Game, GameOutcome), GameError> {
    let voter = game
        .players
        .iter()
        .position(|player| player.id == voter_id)
        .ok_or(GameError::PlayerNotInGame)?;

    if game.state != GameState::PollingBully
        || game.players[voter].voted_for.is_some()
        || !game.bully_candidates.iter().any(|c| c == target_id)
    {
        return Err(GameError::InvalidVote);
    }

    game.players[voter].voted_for = Some(target_id.to_string());
    game.bully_poll_count += 1;

    if game.bully_poll_count < game.players.len() {
        let outcome = GameOutcome::VoteCast {
            voter_id: voter_id.to_string(),
            votes_received: game.bully_poll_count,
            votes_needed: game.players.len(),
        };
        return Ok((game, outcome));
    }

    let tally: Vec<(String, usize)> = game
        .bully_candidates
        .iter()
        .map(|candidate| {
            let votes = game
                .players
                .iter()
                .filter(|p| p.voted_for.as_deref() == Some(candidate.as_str()))
                .count();
            (candidate.clone(), votes)
        })
        .collect();
    let most = tally.iter().map(|(_, votes)| *votes).max().unwrap_or(0);
    let leaders: Vec<String> = tally
        .into_iter()
        .filter(|(_, votes)| *votes == most)
        .map(|(candidate, _)| candidate)
        .collect();

    game.bully_poll_count = 0;
    for player in &mut game.players {
        player.voted_for = None;
    }

    if leaders.len() > 1 {
        game.bully_candidates = leaders;
        let outcome = GameOutcome::BullyPollRestarted {
            round: game.round,
            candidates: game.bully_candidates.clone(),
        };
        return Ok((game, outcome));
    }

    let loser = leaders
        .first()
        .and_then(|id| game.players.iter().position(|p| &p.id == id))
        .ok_or(GameError::EmptyRoster)?;
    game.bully_candidates.clear();

    let report = settle_round(&mut game, loser, true);
    Ok((game, GameOutcome::RoundResolved { report }))
}

/// Apply one action from `actor` to the channel's game, if any.
///
/// `authorized` is the authority oracle's verdict and only matters for
/// start/stop requests by someone other than the host.
pub fn apply(
    game: Option<Game>,
    actor: &Identity,
    action: Action,
    authorized: bool,
) -> Result<(Option<Game>, GameOutcome), GameError> {
    let Some(game) = game else {
        return match action {
            Action::Join => {
                let host = Player::from(actor);
                Ok((
                    Some(new_game(host.clone())),
                    GameOutcome::Created { host },
                ))
            }
            _ => Err(GameError::PlayerNotInGame),
        };
    };

    game.validate()?;

    match action {
        Action::Join => {
            let player = Player::from(actor);
            let game = join(game, player.clone())?;
            let roster_size = game.players.len();
            Ok((
                Some(game),
                GameOutcome::Joined {
                    player,
                    roster_size,
                },
            ))
        }
        Action::Quit => match quit(game, &actor.id)? {
            QuitOutcome::Aborted => Ok((None, GameOutcome::Aborted)),
            QuitOutcome::Continued(game) => {
                let host_id = game.host().map(|h| h.id.clone()).unwrap_or_default();
                let roster_size = game.players.len();
                Ok((
                    Some(game),
                    GameOutcome::Left {
                        player_id: actor.id.clone(),
                        host_id,
                        roster_size,
                    },
                ))
            }
        },
        Action::Start => {
            let game = start(game, &actor.id, authorized)?;
            let outcome = GameOutcome::Started {
                round: game.round,
                turn_order: game.players.iter().map(|p| p.id.clone()).collect(),
            };
            Ok((Some(game), outcome))
        }
        Action::Stop => {
            let game = stop(game, &actor.id, authorized)?;
            let outcome = GameOutcome::Ended {
                rounds_played: game.round.saturating_sub(1),
                ranking: rank(&game),
            };
            Ok((None, outcome))
        }
        Action::Play(card) => {
            let (game, outcome) = play(game, &actor.id, card)?;
            Ok((Some(game), outcome))
        }
        Action::Vote(target) => {
            let (game, outcome) = vote(game, &actor.id, &target)?;
            Ok((Some(game), outcome))
        }
    }
}
