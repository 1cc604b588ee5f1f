use serde::{Deserialize, Serialize};

use crate::game::Identity;

/// JWT claims structure carrying the player's identity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionClaims {
    pub player_id: String,
    pub display_name: String,
    pub exp: usize, // Expiration timestamp (standard JWT claim)
    pub iat: usize, // Issued at timestamp (standard JWT claim)
}

impl From<SessionClaims> for Identity {
    fn from(claims: SessionClaims) -> Self {
        Identity::new(claims.player_id, claims.display_name)
    }
}

/// Request body for session creation, every field optional
#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Response structure for session creation endpoint
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SessionResponse {
    pub token: String,
    pub player_id: String,
    pub display_name: String,
}
