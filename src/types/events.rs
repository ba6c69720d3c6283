use std::fmt;

use super::Vector3;

/// Accelerometer axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    fn bit(self) -> u8 {
        match self {
            Axis::X => 0b001,
            Axis::Y => 0b010,
            Axis::Z => 0b100,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }

    pub fn component(self, v: &Vector3) -> f64 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }
}

/// Fixed three-flag axis set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AxisSet(u8);

impl AxisSet {
    pub const EMPTY: AxisSet = AxisSet(0);

    pub fn insert(&mut self, axis: Axis) {
        self.0 |= axis.bit();
    }

    pub fn contains(&self, axis: Axis) -> bool {
        self.0 & axis.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(&self) -> impl Iterator<Item = Axis> + '_ {
        Axis::ALL.into_iter().filter(move |a| self.contains(*a))
    }
}

impl fmt::Display for AxisSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(Axis::name).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

/// Per-axis deviation between a baseline and a current acceleration read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviationEvent {
    pub axes: AxisSet,
    pub delta: Vector3,
}

impl DeviationEvent {
    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
    }
}
