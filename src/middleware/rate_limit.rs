use axum::{
    body::Body,
    extract::{ConnectInfo, Request},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// Type alias for the global governor layer (IP-based rate limiting)
pub type GlobalGovernorLayer = GovernorLayer<
    tower_governor::key_extractor::PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware<governor::clock::QuantaInstant>,
    Body,
>;

/// Create a GovernorLayer limiting requests per client IP.
/// One token comes back every `rate_limit_replenish_secs`, up to
/// `rate_limit_burst` stored tokens. Keeps a single browser from hammering the
/// prediction service.
pub fn create_global_governor(config: &Config) -> AppResult<GlobalGovernorLayer> {
    let governor_config = GovernorConfigBuilder::default()
        .per_second(config.rate_limit_replenish_secs)
        .burst_size(config.rate_limit_burst)
        .finish()
        .ok_or_else(|| {
            AppError::Config(
                "RATE_LIMIT_REPLENISH_SECS and RATE_LIMIT_BURST must be greater than zero"
                    .to_string(),
            )
        })?;

    Ok(GovernorLayer::new(Arc::new(governor_config)))
}

/// Middleware to log rate limiting and request details
pub async fn log_request(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    tracing::debug!(
        client_ip = %addr.ip(),
        method = %method,
        uri = %uri,
        "Incoming request"
    );

    let response = next.run(request).await;
    let status = response.status();

    match status {
        StatusCode::TOO_MANY_REQUESTS => tracing::warn!(
            client_ip = %addr.ip(),
            method = %method,
            uri = %uri,
            "RATE LIMITED - Request rejected due to too many requests"
        ),
        StatusCode::BAD_GATEWAY => tracing::warn!(
            client_ip = %addr.ip(),
            method = %method,
            uri = %uri,
            "Fare API call failed"
        ),
        s if s.is_client_error() || s.is_server_error() => tracing::warn!(
            client_ip = %addr.ip(),
            method = %method,
            uri = %uri,
            status = %s,
            "Request failed"
        ),
        s => tracing::debug!(
            client_ip = %addr.ip(),
            method = %method,
            uri = %uri,
            status = %s,
            "Request completed"
        ),
    }

    response
}
