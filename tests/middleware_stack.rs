//! The full application stack as `main` serves it: request logging, tracing
//! and per-IP rate limiting around the router.

use std::io::{self, Write};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    Router,
    body::Body,
    extract::ConnectInfo,
    http::{Request, StatusCode},
};
use nyc_taxi_fare::{AppError, AppState, Config, routes};
use tower::ServiceExt;

/// Collects formatted log output in memory
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn limited_app(burst: u32) -> Router {
    let config = Config {
        rate_limit_replenish_secs: 60,
        rate_limit_burst: burst,
        ..Config::default()
    };
    let state = AppState::new(config.clone()).unwrap();
    routes::create_app(state, &config).unwrap()
}

fn page_request(client: SocketAddr) -> Request<Body> {
    let mut request = Request::builder().uri("/").body(Body::empty()).unwrap();
    request.extensions_mut().insert(ConnectInfo(client));
    request
}

#[tokio::test]
async fn test_requests_over_the_burst_are_rejected_and_logged() {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let app = limited_app(2);
    let client = SocketAddr::from(([127, 0, 0, 1], 40000));

    let mut statuses = Vec::new();
    for _ in 0..3 {
        let response = app.clone().oneshot(page_request(client)).await.unwrap();
        statuses.push(response.status());
    }

    assert_eq!(
        statuses,
        vec![StatusCode::OK, StatusCode::OK, StatusCode::TOO_MANY_REQUESTS]
    );

    let output = logs.contents();
    assert_eq!(output.matches("Incoming request").count(), 3);
    assert!(output.contains("RATE LIMITED"), "missing rate limit warning in:\n{output}");
}

#[tokio::test]
async fn test_limits_are_per_client() {
    let app = limited_app(1);
    let first = SocketAddr::from(([127, 0, 0, 1], 40000));
    let second = SocketAddr::from(([127, 0, 0, 2], 40000));

    let response = app.clone().oneshot(page_request(first)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(page_request(first)).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    let response = app.oneshot(page_request(second)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[test]
fn test_zero_burst_refuses_to_build() {
    let config = Config {
        rate_limit_burst: 0,
        ..Config::default()
    };
    let state = AppState::new(config.clone()).unwrap();

    assert!(matches!(routes::create_app(state, &config), Err(AppError::Config(_))));
}
