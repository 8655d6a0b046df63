//! Travel-time estimation from geographic distance.
//!
//! Times are derived from great-circle distance under mode-specific speeds,
//! plus flat allowances for boarding/alighting and transfers.

use geo::{HaversineDistance, Point};

/// Flat boarding/alighting allowance added to every entrance walk.
pub const ENTRANCE_ALLOWANCE_SECONDS: u64 = 60;

/// Flat allowance added to every transfer walk.
pub const TRANSFER_ALLOWANCE_SECONDS: u64 = 30;

/// Great-circle distance between two `(lon, lat)` points, in meters.
pub fn distance(a: Point, b: Point) -> f64 {
    a.haversine_distance(&b)
}

/// Mode-specific speeds (km/h) and the fallback headway.
#[derive(Clone, Copy, Debug)]
pub struct SpeedProfiles {
    /// Speed along a line between consecutive stops.
    pub on_line: f64,
    /// Walking speed between transfer stations.
    pub on_transfer: f64,
    /// Walking speed between an entrance and the station center.
    pub to_entrance: f64,
    /// Headway in minutes when a variant specifies none.
    pub default_interval_min: f64,
}

impl Default for SpeedProfiles {
    fn default() -> Self {
        Self {
            on_line: 40.0,
            on_transfer: 3.5,
            to_entrance: 3.0,
            default_interval_min: 2.5,
        }
    }
}

impl SpeedProfiles {
    /// Seconds to cover `meters` at `speed_kmh`, rounded to the nearest whole
    /// second.
    pub fn travel_seconds(meters: f64, speed_kmh: f64) -> u64 {
        (meters * 3.6 / speed_kmh).round() as u64
    }

    /// In-vehicle seconds for a stretch of line.
    pub fn line_seconds(&self, meters: f64) -> u64 {
        Self::travel_seconds(meters, self.on_line)
    }

    /// Walk time from an entrance/exit point to the station center,
    /// including the boarding allowance.
    pub fn entrance_seconds(&self, from: Point, center: Point) -> u64 {
        ENTRANCE_ALLOWANCE_SECONDS + Self::travel_seconds(distance(from, center), self.to_entrance)
    }

    /// Walk time between two transfer stations, including the transfer
    /// allowance.
    pub fn transfer_seconds(&self, a: Point, b: Point) -> u64 {
        TRANSFER_ALLOWANCE_SECONDS + Self::travel_seconds(distance(a, b), self.on_transfer)
    }

    /// Headway in whole seconds, falling back to the default when the
    /// variant carries none.
    pub fn interval_seconds(&self, interval_min: Option<f64>) -> u64 {
        (interval_min.unwrap_or(self.default_interval_min) * 60.0).round() as u64
    }
}
