//! Fare client behaviour against a mock prediction service.

use std::time::Duration;

use chrono::NaiveDate;
use nyc_taxi_fare::entities::ride::RideQuery;
use nyc_taxi_fare::external::fare_api::{FareApiClient, RemoteCallFailure};
use reqwest::StatusCode;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn sample_query() -> RideQuery {
    RideQuery::default_at(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap())
}

fn client_for(mock_server: &MockServer, timeout: Duration) -> FareApiClient {
    FareApiClient::new(format!("{}/predict", mock_server.uri()), timeout).unwrap()
}

#[tokio::test]
async fn test_predict_sends_ride_parameters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/predict"))
        .and(query_param("pickup_datetime", "2024-05-01 12:00:00"))
        .and(query_param("pickup_longitude", "-73.985428"))
        .and(query_param("pickup_latitude", "40.758896"))
        .and(query_param("dropoff_longitude", "-73.985428"))
        .and(query_param("dropoff_latitude", "40.748817"))
        .and(query_param("passenger_count", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "fare": 12.5 })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Duration::from_secs(5));
    let fare = client.predict(&sample_query()).await.unwrap();

    assert_eq!(fare.fare, 12.5);
    assert_eq!(fare.formatted_usd(), "12.50");
}

#[tokio::test]
async fn test_server_error_is_a_status_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Duration::from_secs(5));
    let result = client.predict(&sample_query()).await;

    assert!(
        matches!(result, Err(RemoteCallFailure::Status(StatusCode::INTERNAL_SERVER_ERROR))),
        "Expected Status(500), got: {result:?}"
    );
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(422))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Duration::from_secs(5));
    let result = client.predict(&sample_query()).await;

    assert!(matches!(result, Err(RemoteCallFailure::Status(_))));
}

#[tokio::test]
async fn test_missing_fare_is_invalid_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "price": 12.5 })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Duration::from_secs(5));
    let result = client.predict(&sample_query()).await;

    assert!(
        matches!(result, Err(RemoteCallFailure::InvalidResponse(_))),
        "Expected InvalidResponse, got: {result:?}"
    );
}

#[tokio::test]
async fn test_non_json_body_is_invalid_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Duration::from_secs(5));
    let result = client.predict(&sample_query()).await;

    assert!(matches!(result, Err(RemoteCallFailure::InvalidResponse(_))));
}

#[tokio::test]
async fn test_slow_service_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/predict"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "fare": 12.5 }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Duration::from_millis(200));
    let result = client.predict(&sample_query()).await;

    assert!(
        matches!(result, Err(RemoteCallFailure::Timeout(t)) if t == Duration::from_millis(200)),
        "Expected Timeout, got: {result:?}"
    );
}

#[tokio::test]
async fn test_unreachable_service_is_network_failure() {
    // Nothing listens on the discard port
    let client = FareApiClient::new("http://127.0.0.1:9/predict", Duration::from_secs(2)).unwrap();
    let result = client.predict(&sample_query()).await;

    assert!(
        matches!(result, Err(RemoteCallFailure::Network(_))),
        "Expected Network, got: {result:?}"
    );
}
