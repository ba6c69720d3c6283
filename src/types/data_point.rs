use std::fmt;

use crate::utils::round_to;

/// 三轴向量（加速度 / 角速度）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Round every component to `decimals` places.
    pub fn rounded(self, decimals: u32) -> Self {
        Self {
            x: round_to(self.x, decimals),
            y: round_to(self.y, decimals),
            z: round_to(self.z, decimals),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x={}, y={}, z={}", self.x, self.y, self.z)
    }
}

/// Attitude in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Orientation {
    pub yaw: f64,
    pub pitch: f64,
    pub roll: f64,
}

impl Orientation {
    pub fn new(yaw: f64, pitch: f64, roll: f64) -> Self {
        Self { yaw, pitch, roll }
    }

    pub fn rounded(self, decimals: u32) -> Self {
        Self {
            yaw: round_to(self.yaw, decimals),
            pitch: round_to(self.pitch, decimals),
            roll: round_to(self.roll, decimals),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.yaw.is_finite() && self.pitch.is_finite() && self.roll.is_finite()
    }
}

/// 星下点坐标（纬度 / 经度，单位：度）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundTrack {
    pub latitude: f64,
    pub longitude: f64,
}

impl GroundTrack {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl fmt::Display for GroundTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ns = if self.latitude >= 0.0 { 'N' } else { 'S' };
        let ew = if self.longitude >= 0.0 { 'E' } else { 'W' };
        write!(
            f,
            "{:.4} {} {:.4} {}",
            self.latitude.abs(),
            ns,
            self.longitude.abs(),
            ew
        )
    }
}
