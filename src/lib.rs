pub mod config;
pub mod entities;
pub mod error;
pub mod external;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod utils;
pub mod views;

use external::fare_api::FareApiClient;
use views::Views;

pub use config::Config;
pub use error::{AppError, AppResult};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub fare_api: FareApiClient,
    pub views: Views,
}

impl AppState {
    pub fn new(config: Config) -> AppResult<Self> {
        let fare_api = FareApiClient::from_config(&config)
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;
        let views = Views::new()?;

        Ok(Self {
            config,
            fare_api,
            views,
        })
    }
}
