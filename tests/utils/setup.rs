use std::collections::HashMap;
use std::sync::Arc;

use axum::Router;
use cobm::{
    build_router,
    game::{AdminListAuthority, Authority, HostOnlyAuthority},
    AppState, GameService, SessionResponse, SessionService, TokenConfig,
};

use super::mocks::CountingGameRepository;

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub app: Router,
    pub app_state: AppState,
    pub repository: Arc<CountingGameRepository>,
    /// Sessions issued to the named players, keyed by display name
    pub sessions: HashMap<String, SessionResponse>,
    pub channel_id: String,
}

pub struct TestSetupBuilder {
    players: Vec<String>,
    admins: Vec<String>,
    channel_id: String,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            players: vec![],
            admins: vec![],
            channel_id: "general".to_string(),
        }
    }

    pub fn with_players(mut self, players: Vec<&str>) -> Self {
        self.players = players.into_iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_two_players(self) -> Self {
        self.with_players(vec!["alice", "bob"])
    }

    pub fn with_three_players(self) -> Self {
        self.with_players(vec!["alice", "bob", "charlie"])
    }

    /// Named players whose ids the admin list will contain
    pub fn with_admins(mut self, admins: Vec<&str>) -> Self {
        self.admins = admins.into_iter().map(|s| s.to_string()).collect();
        self
    }

    pub async fn build(self) -> TestSetup {
        let session_service = Arc::new(SessionService::new(TokenConfig::new(
            "integration-secret".to_string(),
            1,
        )));

        let mut sessions = HashMap::new();
        for name in self.players.iter().chain(self.admins.iter()) {
            if sessions.contains_key(name) {
                continue;
            }
            let session = session_service
                .create_session(Some(name.clone()))
                .await
                .unwrap();
            sessions.insert(name.clone(), session);
        }

        let authority: Arc<dyn Authority> = if self.admins.is_empty() {
            Arc::new(HostOnlyAuthority)
        } else {
            Arc::new(AdminListAuthority::new(
                self.admins
                    .iter()
                    .map(|name| sessions[name].player_id.clone()),
            ))
        };

        let repository = Arc::new(CountingGameRepository::new());
        let game_service = Arc::new(GameService::new(repository.clone(), authority));
        let app_state = AppState::new(game_service, session_service);

        TestSetup {
            app: build_router(app_state.clone()),
            app_state,
            repository,
            sessions,
            channel_id: self.channel_id,
        }
    }
}
