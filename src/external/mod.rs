pub mod fare_api;
