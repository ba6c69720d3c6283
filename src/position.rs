use chrono::{DateTime, Utc};
use std::f64::consts::TAU;

use crate::error::PositionError;
use crate::types::GroundTrack;

/// Supplies the point on the ground directly beneath the platform.
pub trait PositionProvider {
    fn ground_track(&self, at: DateTime<Utc>) -> Result<GroundTrack, PositionError>;
}

impl<P: PositionProvider + ?Sized> PositionProvider for &P {
    fn ground_track(&self, at: DateTime<Utc>) -> Result<GroundTrack, PositionError> {
        (**self).ground_track(at)
    }
}

/// Sidereal rotation rate of the Earth, degrees per second.
const EARTH_ROTATION_DEG_PER_SEC: f64 = 360.0 / 86_164.0905;

/// Circular-orbit ground track model. Ignores eccentricity, drag and nodal
/// precession, which is enough to label telemetry rows over a few hours.
#[derive(Debug, Clone)]
pub struct CircularOrbit {
    pub inclination_deg: f64,
    pub period_minutes: f64,
    /// Instant of an ascending-node crossing.
    pub epoch: DateTime<Utc>,
    /// Longitude of that crossing.
    pub node_longitude_deg: f64,
}

impl CircularOrbit {
    /// ISS-like orbit whose ascending node is crossed at `epoch` over `node_longitude_deg`.
    pub fn iss(epoch: DateTime<Utc>, node_longitude_deg: f64) -> Self {
        Self {
            inclination_deg: 51.64,
            period_minutes: 92.68,
            epoch,
            node_longitude_deg,
        }
    }
}

impl PositionProvider for CircularOrbit {
    fn ground_track(&self, at: DateTime<Utc>) -> Result<GroundTrack, PositionError> {
        if self.period_minutes <= 0.0 {
            return Err(PositionError::Unavailable(format!(
                "invalid orbital period {}",
                self.period_minutes
            )));
        }

        let elapsed = (at - self.epoch).num_milliseconds() as f64 / 1000.0;
        let incl = self.inclination_deg.to_radians();
        // argument of latitude
        let u = TAU * elapsed / (self.period_minutes * 60.0);

        let latitude = (incl.sin() * u.sin()).asin().to_degrees();
        let along_node = (incl.cos() * u.sin()).atan2(u.cos()).to_degrees();
        let longitude = normalize_longitude(
            self.node_longitude_deg + along_node - EARTH_ROTATION_DEG_PER_SEC * elapsed,
        );

        Ok(GroundTrack::new(latitude, longitude))
    }
}

/// Wrap into (-180, 180].
fn normalize_longitude(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}
