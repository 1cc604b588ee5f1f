use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::game::{cards::Card, core::Player};

/// How one player's card fared against every other card of the round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standing {
    pub wins: u32,
    pub defeats: u32,
}

impl Standing {
    pub fn net(&self) -> i64 {
        i64::from(self.wins) - i64::from(self.defeats)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundVerdict {
    /// No card defeated any other
    Draw,
    /// Index of the single weakest player
    Loser(usize),
    /// Indices of the players tied for weakest, in turn order
    Tied(Vec<usize>),
}

/// A card as revealed at the end of a round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayedCard {
    pub player_id: String,
    pub card: Card,
}

/// Compare every pair of held cards
pub fn standings(players: &[Player]) -> Vec<Standing> {
    players
        .iter()
        .enumerate()
        .map(|(i, player)| {
            let card = player.current_card;
            let mut standing = Standing {
                wins: 0,
                defeats: 0,
            };
            for (j, other) in players.iter().enumerate() {
                if i == j {
                    continue;
                }
                match card.confront(other.current_card) {
                    Ordering::Greater => standing.wins += 1,
                    Ordering::Less => standing.defeats += 1,
                    Ordering::Equal => {}
                }
            }
            standing
        })
        .collect()
}

pub fn judge(standings: &[Standing]) -> RoundVerdict {
    if standings.iter().all(|s| s.wins == 0) {
        return RoundVerdict::Draw;
    }

    let Some(lowest) = standings.iter().map(Standing::net).min() else {
        return RoundVerdict::Draw;
    };

    let weakest: Vec<usize> = standings
        .iter()
        .enumerate()
        .filter(|(_, s)| s.net() == lowest)
        .map(|(i, _)| i)
        .collect();

    match weakest.as_slice() {
        [loser] => RoundVerdict::Loser(*loser),
        _ => RoundVerdict::Tied(weakest),
    }
}

/// The players other than `loser` with the best standing
pub fn strongest(standings: &[Standing], loser: usize) -> Vec<usize> {
    let others = || {
        standings
            .iter()
            .enumerate()
            .filter(move |(i, _)| *i != loser)
    };

    let Some(best) = others().map(|(_, s)| s.net()).max() else {
        return vec![];
    };

    others()
        .filter(|(_, s)| s.net() == best)
        .map(|(i, _)| i)
        .collect()
}

/// Move one point from the loser to each of the strongest players.
/// Returns the indices of the players who gained.
pub fn settle(players: &mut [Player], loser: usize) -> Vec<usize> {
    let standings = standings(players);
    let winners = strongest(&standings, loser);

    for &winner in &winners {
        players[winner].score += 1;
    }
    players[loser].score -= winners.len() as i32;

    winners
}

pub fn revealed_cards(players: &[Player]) -> Vec<PlayedCard> {
    players
        .iter()
        .map(|player| PlayedCard {
            player_id: player.id.clone(),
            card: player.current_card,
        })
        .collect()
}
