use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::Value;
use tower::ServiceExt; // for `oneshot`

use cobm::GameView;

use super::setup::TestSetup;

// ============================================================================
// Action Helpers
// ============================================================================

impl TestSetup {
    pub fn player_id(&self, player: &str) -> String {
        self.sessions[player].player_id.clone()
    }

    /// Send a request as `player` (or anonymously) and return the status and JSON body
    pub async fn send(
        &self,
        player: Option<&str>,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(player) = player {
            request = request.header(
                "Authorization",
                format!("Bearer {}", self.sessions[player].token),
            );
        }
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    pub async fn channel_command(
        &self,
        player: &str,
        command: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let uri = format!("/channels/{}/{}", self.channel_id, command);
        self.send(Some(player), "POST", &uri, body).await
    }

    // ============================================================================
    // Convenience Action Methods
    // ============================================================================

    pub async fn join(&self, player: &str) -> (StatusCode, Value) {
        self.channel_command(player, "join", None).await
    }

    pub async fn quit(&self, player: &str) -> (StatusCode, Value) {
        self.channel_command(player, "quit", None).await
    }

    pub async fn start(&self, player: &str) -> (StatusCode, Value) {
        self.channel_command(player, "start", None).await
    }

    pub async fn stop(&self, player: &str) -> (StatusCode, Value) {
        self.channel_command(player, "stop", None).await
    }

    pub async fn play(&self, player: &str, card: &str) -> (StatusCode, Value) {
        self.channel_command(player, "play", Some(serde_json::json!({ "card": card })))
            .await
    }

    pub async fn vote(&self, player: &str, target: &str) -> (StatusCode, Value) {
        let target = self.player_id(target);
        self.channel_command(player, "vote", Some(serde_json::json!({ "target": target })))
            .await
    }

    /// Join every named player in order, the first one becoming host
    pub async fn join_all(&self, players: &[&str]) {
        for player in players {
            let (status, _) = self.join(player).await;
            assert_eq!(status, StatusCode::OK, "{} failed to join", player);
        }
    }

    /// Current game of the channel as seen over HTTP, `None` on 404
    pub async fn fetch_game(&self, player: &str) -> Option<GameView> {
        let uri = format!("/channels/{}", self.channel_id);
        let (status, body) = self.send(Some(player), "GET", &uri, None).await;
        match status {
            StatusCode::OK => Some(serde_json::from_value(body).unwrap()),
            StatusCode::NOT_FOUND => None,
            other => panic!("Unexpected status fetching game: {}", other),
        }
    }
}
