use std::fmt;

use serde::Serialize;

/// Reported GPS accuracy used when the caller does not supply one.
pub const DEFAULT_ACCURACY: f64 = 20.0;

/// A latitude/longitude pair with a reported accuracy, in degrees and meters.
///
/// Immutable value type; construct a new one instead of mutating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Location {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Reported accuracy in meters.
    pub accuracy: f64,
}

impl Location {
    /// Location with the default accuracy of [`DEFAULT_ACCURACY`] meters.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self::with_accuracy(latitude, longitude, DEFAULT_ACCURACY)
    }

    /// Location with an explicit accuracy.
    pub fn with_accuracy(latitude: f64, longitude: f64, accuracy: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Location({}, {})", self.latitude, self.longitude)
    }
}
