//! remote-api - REST API for the player controller
//!
//! Maps HTTP routes onto `CommandGateway` operations. Handlers validate
//! request bodies, call the gateway, and translate its errors into responses.
//!
//! # Usage
//!
//! ```ignore
//! use remote_api::{create_router, AppState};
//!
//! let gateway = CommandGateway::new(bridge, store, Duration::from_secs(5));
//! let router = create_router(AppState::new(gateway));
//! ```

pub mod error;
pub mod extract;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use extract::ValidatedJson;
pub use state::AppState;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the REST API router with the given application state
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(|| async { "OK" }))
        // Equalizer routes
        .route(
            "/equalizer",
            get(handlers::equalizer::get_equalizer).post(handlers::equalizer::update_equalizer),
        )
        .route(
            "/equalizer/{name}/set",
            post(handlers::equalizer::set_equalizer),
        )
        // Player query
        .route(
            "/player/now-playing",
            get(handlers::player::now_playing),
        )
        // Player transport controls
        .route("/player/next", post(handlers::player::next))
        .route("/player/previous", post(handlers::player::previous))
        .route("/player/pause", post(handlers::player::pause))
        .route("/player/play-pause", post(handlers::player::play_pause))
        .route("/player/stop", post(handlers::player::stop))
        .route("/player/play", post(handlers::player::play))
        .route("/player/mute", post(handlers::player::mute))
        // Player parameters
        .route("/player/volume", post(handlers::player::set_volume))
        .route("/player/seek", post(handlers::player::seek))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
