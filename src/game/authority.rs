use async_trait::async_trait;
use std::collections::HashSet;
use tracing::debug;

use crate::game::core::Game;

/// Decides whether someone other than the host may start or stop a game
#[async_trait]
pub trait Authority: Send + Sync {
    async fn is_authorized(&self, acting_id: &str, game: &Game) -> bool;
}

/// Only the host commands the game
pub struct HostOnlyAuthority;

#[async_trait]
impl Authority for HostOnlyAuthority {
    async fn is_authorized(&self, _acting_id: &str, _game: &Game) -> bool {
        false
    }
}

/// Grants authority to a fixed set of player ids, e.g. channel moderators
pub struct AdminListAuthority {
    admins: HashSet<String>,
}

impl AdminListAuthority {
    pub fn new(admins: impl IntoIterator<Item = String>) -> Self {
        Self {
            admins: admins.into_iter().collect(),
        }
    }
}

#[async_trait]
impl Authority for AdminListAuthority {
    async fn is_authorized(&self, acting_id: &str, _game: &Game) -> bool {
        let authorized = self.admins.contains(acting_id);
        debug!(acting_id = %acting_id, authorized, "Authority lookup");
        authorized
    }
}
