//! Two-point trip map drawn as inline SVG.
//!
//! The projection is equirectangular around the midpoint of the trip, with
//! longitudes shrunk by `cos(latitude)` so distances look right at NYC's
//! latitude. The scale fits both points inside the frame but never zooms in
//! further than a web map at zoom level 11.

use serde::Serialize;

use crate::entities::ride::Coordinates;

pub const MAP_WIDTH: f64 = 640.0;
pub const MAP_HEIGHT: f64 = 360.0;
const MAP_PADDING: f64 = 40.0;

/// Pixels per degree at the equator for a 256px-tile web map at zoom 11
const ZOOM_11_PX_PER_DEGREE: f64 = 256.0 * 2048.0 / 360.0;

#[derive(Debug, Clone, Serialize)]
pub struct MapPoint {
    pub label: &'static str,
    pub latitude: f64,
    pub longitude: f64,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MapView {
    pub width: f64,
    pub height: f64,
    /// Pickup first, then drop-off
    pub points: [MapPoint; 2],
}

impl MapView {
    pub fn fit(pickup: Coordinates, dropoff: Coordinates) -> Self {
        let center_lat = (pickup.latitude + dropoff.latitude) / 2.0;
        let center_lng = (pickup.longitude + dropoff.longitude) / 2.0;
        let lng_factor = center_lat.to_radians().cos();

        let span_x = (pickup.longitude - dropoff.longitude).abs() * lng_factor;
        let span_y = (pickup.latitude - dropoff.latitude).abs();

        let mut scale = ZOOM_11_PX_PER_DEGREE;
        if span_x > 0.0 {
            scale = scale.min((MAP_WIDTH - 2.0 * MAP_PADDING) / span_x);
        }
        if span_y > 0.0 {
            scale = scale.min((MAP_HEIGHT - 2.0 * MAP_PADDING) / span_y);
        }

        let project = |label: &'static str, point: Coordinates| MapPoint {
            label,
            latitude: point.latitude,
            longitude: point.longitude,
            x: round_px(MAP_WIDTH / 2.0 + (point.longitude - center_lng) * lng_factor * scale),
            y: round_px(MAP_HEIGHT / 2.0 - (point.latitude - center_lat) * scale),
        };

        Self {
            width: MAP_WIDTH,
            height: MAP_HEIGHT,
            points: [project("Pickup", pickup), project("Drop-off", dropoff)],
        }
    }
}

fn round_px(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
