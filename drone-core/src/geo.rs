/// A latitude/longitude pair in degrees.
///
/// Coordinates are treated as a flat plane; no great-circle math is done.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Current position of one simulated drone.
pub type Point = LatLng;

/// Destination of a run.
pub type Target = LatLng;

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Where new drones spawn.
    pub fn home() -> Self {
        Self { lat: 0.0, lng: 0.0 }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Moves `1 / divisor` of the remaining way toward `target`.
    pub fn step_toward(&mut self, target: Target, divisor: f64) {
        *self += (target - *self) / divisor;
    }
}

impl core::ops::Add for LatLng {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            lat: self.lat + other.lat,
            lng: self.lng + other.lng,
        }
    }
}

impl core::ops::Sub for LatLng {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            lat: self.lat - other.lat,
            lng: self.lng - other.lng,
        }
    }
}

impl core::ops::Div<f64> for LatLng {
    type Output = Self;

    fn div(self, scalar: f64) -> Self {
        Self {
            lat: self.lat / scalar,
            lng: self.lng / scalar,
        }
    }
}

impl core::ops::AddAssign for LatLng {
    fn add_assign(&mut self, other: Self) {
        self.lat += other.lat;
        self.lng += other.lng;
    }
}
