//! Client for the remote taxi fare prediction service.
//!
//! One `GET` per submission, no retries. Every way the call can go wrong is
//! reported as a [`RemoteCallFailure`].

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Serialize;
use thiserror::Error;

use crate::config::Config;
use crate::entities::fare::FareResult;
use crate::entities::ride::RideQuery;

#[derive(Debug, Error)]
pub enum RemoteCallFailure {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("network error: {0}")]
    Network(String),

    #[error("service responded with HTTP {0}")]
    Status(StatusCode),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl RemoteCallFailure {
    /// Message shown on the page in place of the result
    pub fn user_message(&self) -> String {
        format!("Error calling the fare API: {}", self)
    }
}

/// Query string sent to the prediction endpoint
#[derive(Debug, Serialize)]
struct PredictParams {
    pickup_datetime: String,
    pickup_longitude: f64,
    pickup_latitude: f64,
    dropoff_longitude: f64,
    dropoff_latitude: f64,
    passenger_count: u8,
}

impl From<&RideQuery> for PredictParams {
    fn from(query: &RideQuery) -> Self {
        Self {
            pickup_datetime: query.formatted_pickup_datetime(),
            pickup_longitude: query.pickup.longitude,
            pickup_latitude: query.pickup.latitude,
            dropoff_longitude: query.dropoff.longitude,
            dropoff_latitude: query.dropoff.latitude,
            passenger_count: query.passenger_count,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FareApiClient {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl FareApiClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, RemoteCallFailure> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteCallFailure::Network(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            timeout,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, RemoteCallFailure> {
        Self::new(config.fare_api_url.clone(), config.fare_api_timeout)
    }

    #[tracing::instrument(skip_all, fields(endpoint = %self.endpoint))]
    pub async fn predict(&self, query: &RideQuery) -> Result<FareResult, RemoteCallFailure> {
        let params = PredictParams::from(query);
        tracing::debug!(?params, "Requesting fare prediction");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&params)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, "Fare API returned an error status");
            return Err(RemoteCallFailure::Status(status));
        }

        // The body read is covered by the same timeout as the request
        let body = response.text().await.map_err(|e| self.classify(e))?;

        let fare: FareResult = serde_json::from_str(&body)
            .map_err(|e| RemoteCallFailure::InvalidResponse(e.to_string()))?;

        if !fare.fare.is_finite() {
            return Err(RemoteCallFailure::InvalidResponse(format!(
                "fare is not a finite number: {}",
                fare.fare
            )));
        }

        tracing::debug!(fare = fare.fare, "Fare prediction received");
        Ok(fare)
    }

    fn classify(&self, err: reqwest::Error) -> RemoteCallFailure {
        if err.is_timeout() {
            RemoteCallFailure::Timeout(self.timeout)
        } else {
            RemoteCallFailure::Network(err.to_string())
        }
    }
}
