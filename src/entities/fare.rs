use serde::Deserialize;

/// Predicted fare in USD, as returned by the prediction API
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct FareResult {
    pub fare: f64,
}

impl FareResult {
    pub fn formatted_usd(&self) -> String {
        format!("{:.2}", self.fare)
    }
}
