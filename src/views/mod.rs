pub mod map;

use std::sync::Arc;

use serde::Serialize;
use tera::{Context, Tera};

use crate::entities::fare::FareResult;
use crate::entities::ride::{
    COORDINATE_STEP, MAX_LATITUDE, MAX_LONGITUDE, MAX_PASSENGERS, MIN_LATITUDE, MIN_LONGITUDE,
    MIN_PASSENGERS, RideQuery,
};
use crate::error::AppResult;

pub use map::MapView;

const INDEX_TEMPLATE: &str = "index.html";
const PAGE_TITLE: &str = "NYC Taxi Fare Predictor";

#[derive(Debug, Clone, Serialize)]
pub struct SliderView {
    pub name: &'static str,
    pub label: &'static str,
    pub min: String,
    pub max: String,
    pub step: String,
    pub value: String,
    /// Decimals shown next to the slider
    pub precision: usize,
}

impl SliderView {
    fn coordinate(name: &'static str, label: &'static str, min: f64, max: f64, value: f64) -> Self {
        Self {
            name,
            label,
            min: min.to_string(),
            max: max.to_string(),
            step: COORDINATE_STEP.to_string(),
            value: format!("{:.6}", value),
            precision: 6,
        }
    }

    fn passengers(value: u8) -> Self {
        Self {
            name: "passenger_count",
            label: "Passengers",
            min: MIN_PASSENGERS.to_string(),
            max: MAX_PASSENGERS.to_string(),
            step: "1".to_string(),
            value: value.to_string(),
            precision: 0,
        }
    }
}

/// Sidebar widgets, pre-filled from a query
#[derive(Debug, Clone, Serialize)]
pub struct FormView {
    pub pickup_date: String,
    pub pickup_time: String,
    pub sliders: Vec<SliderView>,
}

impl FormView {
    pub fn from_query(query: &RideQuery) -> Self {
        Self {
            pickup_date: query.pickup_datetime.format("%Y-%m-%d").to_string(),
            pickup_time: query.pickup_datetime.format("%H:%M").to_string(),
            sliders: vec![
                SliderView::coordinate(
                    "pickup_longitude",
                    "Pickup longitude",
                    MIN_LONGITUDE,
                    MAX_LONGITUDE,
                    query.pickup.longitude,
                ),
                SliderView::coordinate(
                    "pickup_latitude",
                    "Pickup latitude",
                    MIN_LATITUDE,
                    MAX_LATITUDE,
                    query.pickup.latitude,
                ),
                SliderView::coordinate(
                    "dropoff_longitude",
                    "Drop-off longitude",
                    MIN_LONGITUDE,
                    MAX_LONGITUDE,
                    query.dropoff.longitude,
                ),
                SliderView::coordinate(
                    "dropoff_latitude",
                    "Drop-off latitude",
                    MIN_LATITUDE,
                    MAX_LATITUDE,
                    query.dropoff.latitude,
                ),
                SliderView::passengers(query.passenger_count),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResultView {
    pub fare: String,
    pub distance: String,
    pub map: MapView,
}

impl ResultView {
    pub fn new(fare: &FareResult, distance_km: f64, query: &RideQuery) -> Self {
        Self {
            fare: fare.formatted_usd(),
            distance: format!("{:.2}", distance_km),
            map: MapView::fit(query.pickup, query.dropoff),
        }
    }
}

/// Everything the page template needs. At most one of `result` and `error`
/// is set.
#[derive(Debug, Clone, Serialize)]
pub struct PageView {
    pub title: &'static str,
    pub form: FormView,
    pub result: Option<ResultView>,
    pub error: Option<String>,
}

impl PageView {
    pub fn form_only(form: FormView) -> Self {
        Self {
            title: PAGE_TITLE,
            form,
            result: None,
            error: None,
        }
    }

    pub fn with_result(form: FormView, result: ResultView) -> Self {
        Self {
            result: Some(result),
            ..Self::form_only(form)
        }
    }

    pub fn with_error(form: FormView, message: String) -> Self {
        Self {
            error: Some(message),
            ..Self::form_only(form)
        }
    }
}

/// Compiled page templates, shared by all handlers
#[derive(Clone)]
pub struct Views {
    tera: Arc<Tera>,
}

impl Views {
    pub fn new() -> AppResult<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template(INDEX_TEMPLATE, include_str!("../../templates/index.html"))?;

        Ok(Self {
            tera: Arc::new(tera),
        })
    }

    pub fn render_page(&self, page: &PageView) -> AppResult<String> {
        let context = Context::from_serialize(page)?;
        Ok(self.tera.render(INDEX_TEMPLATE, &context)?)
    }
}
