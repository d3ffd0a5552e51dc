//! Axum router assembly.

use axum::Router;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use okofen_app::ports::ModeRunner;

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Command routes sit behind the bearer-token middleware; `/healthz` does
/// not. Includes a [`TraceLayer`] that logs each HTTP request/response using
/// the `tracing` ecosystem.
pub fn build<R: ModeRunner>(state: AppState<R>) -> Router {
    let commands = Router::new()
        .route("/on", post(crate::api::commands::turn_on::<R>))
        .route("/off", post(crate::api::commands::turn_off::<R>))
        .route_layer(middleware::from_fn_with_state(
            state.token.clone(),
            crate::auth::require_bearer,
        ));

    Router::new()
        .route("/healthz", get(crate::api::health::healthz::<R>))
        .merge(commands)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
