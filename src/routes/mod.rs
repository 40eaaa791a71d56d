use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::AppState;
use crate::config::Config;
use crate::error::AppResult;
use crate::handlers::fare;
use crate::middleware::rate_limit::{create_global_governor, log_request};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(fare::index))
        .route("/predict", post(fare::predict))
        .with_state(state)
}

/// The router wrapped in the full middleware stack. `log_request` sits
/// outermost so it also sees requests the governor rejects.
/// Must be served with `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn create_app(state: AppState, config: &Config) -> AppResult<Router> {
    let governor = create_global_governor(config)?;

    Ok(create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(governor)
        .layer(middleware::from_fn(log_request)))
}
