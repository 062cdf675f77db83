//! Point of interest model

use serde::{Deserialize, Serialize};

/// A notable place near the destination
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PointOfInterest {
    pub name: String,
    /// Short plain-text description
    pub summary: Option<String>,
    /// Distance from the destination center in kilometers
    pub distance_km: Option<f64>,
    /// Source page
    pub url: Option<String>,
}

impl PointOfInterest {
    #[must_use]
    pub fn new(name: impl Into<String>, distance_km: Option<f64>) -> Self {
        Self {
            name: name.into(),
            summary: None,
            distance_km,
            url: None,
        }
    }
}
