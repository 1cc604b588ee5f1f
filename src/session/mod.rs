// Public API - what other modules can use
pub use handlers::create_session;
pub use middleware::jwt_auth;
pub use service::SessionService;
pub use token::TokenConfig;
pub use types::{CreateSessionRequest, SessionClaims, SessionResponse};

// Internal modules
mod generators;
mod handlers;
mod middleware;
mod service;
mod token;
mod types;
