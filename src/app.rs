use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{game, session, shared::AppState};

/// Build the HTTP surface. Everything except `/session` requires a bearer token.
pub fn build_router(app_state: AppState) -> Router {
    let channel_routes = Router::new()
        .route("/channels/:channel_id", get(game::get_channel_game))
        .route("/channels/:channel_id/join", post(game::join_channel))
        .route("/channels/:channel_id/quit", post(game::quit_channel))
        .route("/channels/:channel_id/start", post(game::start_game))
        .route("/channels/:channel_id/stop", post(game::stop_game))
        .route("/channels/:channel_id/play", post(game::play_card))
        .route("/channels/:channel_id/vote", post(game::cast_vote))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            session::jwt_auth,
        ));

    Router::new()
        .route("/session", post(session::create_session))
        .merge(channel_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
