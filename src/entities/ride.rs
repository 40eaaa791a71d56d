use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

pub const MIN_LONGITUDE: f64 = -74.3;
pub const MAX_LONGITUDE: f64 = -73.7;
pub const MIN_LATITUDE: f64 = 40.5;
pub const MAX_LATITUDE: f64 = 40.9;
pub const COORDINATE_STEP: f64 = 0.0001;

pub const MIN_PASSENGERS: u8 = 1;
pub const MAX_PASSENGERS: u8 = 8;

/// Hours after midnight the pickup time widget starts at
pub const DEFAULT_PICKUP_HOUR: i64 = 12;

/// Wire format the prediction API expects for `pickup_datetime`
pub const PICKUP_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Pin a point inside the NYC slider area.
    pub fn clamped(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: latitude.clamp(MIN_LATITUDE, MAX_LATITUDE),
            longitude: longitude.clamp(MIN_LONGITUDE, MAX_LONGITUDE),
        }
    }
}

pub fn clamp_passenger_count(raw: i64) -> u8 {
    // Both bounds fit in u8, so the cast after clamping is lossless
    raw.clamp(i64::from(MIN_PASSENGERS), i64::from(MAX_PASSENGERS)) as u8
}

/// Parameters of a single fare estimate. Built per submission and dropped
/// once the page has been rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct RideQuery {
    pub pickup_datetime: NaiveDateTime,
    pub pickup: Coordinates,
    pub dropoff: Coordinates,
    pub passenger_count: u8,
}

impl RideQuery {
    /// The values the page starts with: noon on `date`, Times Square to the
    /// Empire State Building, one passenger.
    pub fn default_at(date: NaiveDate) -> Self {
        Self {
            pickup_datetime: date.and_time(NaiveTime::MIN + Duration::hours(DEFAULT_PICKUP_HOUR)),
            pickup: Coordinates {
                latitude: 40.758896,
                longitude: -73.985428,
            },
            dropoff: Coordinates {
                latitude: 40.748817,
                longitude: -73.985428,
            },
            passenger_count: MIN_PASSENGERS,
        }
    }

    pub fn formatted_pickup_datetime(&self) -> String {
        self.pickup_datetime.format(PICKUP_DATETIME_FORMAT).to_string()
    }

    pub fn distance_km(&self) -> f64 {
        crate::utils::geo::haversine_distance(
            self.pickup.latitude,
            self.pickup.longitude,
            self.dropoff.latitude,
            self.dropoff.longitude,
        )
    }
}

/// Raw form submission from the sidebar widgets
#[derive(Debug, Clone, Deserialize)]
pub struct RideForm {
    pub pickup_date: String,
    pub pickup_time: String,
    pub pickup_longitude: f64,
    pub pickup_latitude: f64,
    pub dropoff_longitude: f64,
    pub dropoff_latitude: f64,
    pub passenger_count: i64,
}

impl RideForm {
    pub fn into_query(self) -> AppResult<RideQuery> {
        let date = NaiveDate::parse_from_str(self.pickup_date.trim(), "%Y-%m-%d").map_err(|_| {
            AppError::BadRequest(format!("Invalid pickup date: {:?}", self.pickup_date))
        })?;
        let time = parse_time(&self.pickup_time)?;

        for (name, value) in [
            ("pickup_longitude", self.pickup_longitude),
            ("pickup_latitude", self.pickup_latitude),
            ("dropoff_longitude", self.dropoff_longitude),
            ("dropoff_latitude", self.dropoff_latitude),
        ] {
            if !value.is_finite() {
                return Err(AppError::BadRequest(format!("{} must be a finite number", name)));
            }
        }

        Ok(RideQuery {
            pickup_datetime: date.and_time(time),
            pickup: Coordinates::clamped(self.pickup_latitude, self.pickup_longitude),
            dropoff: Coordinates::clamped(self.dropoff_latitude, self.dropoff_longitude),
            passenger_count: clamp_passenger_count(self.passenger_count),
        })
    }
}

/// Time pickers send `HH:MM`, or `HH:MM:SS` when seconds are enabled
fn parse_time(raw: &str) -> AppResult<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map_err(|_| AppError::BadRequest(format!("Invalid pickup time: {:?}", raw)))
}
