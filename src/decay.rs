use crate::{util::check_interval, Result};

/// A step-wise decaying value
///
/// Schedules are advanced explicitly, one call to [`step`](Decay::step) per event that should
/// reduce the value (e.g. an executed training step), rather than as a function of wall-clock time.
pub trait Decay {
    /// Compute the value following `value`
    fn step(&self, value: f32) -> f32;

    /// The floor the value never decays below
    fn min(&self) -> f32;
}

/// A constant value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Constant;

impl Decay for Constant {
    fn step(&self, value: f32) -> f32 {
        value
    }

    fn min(&self) -> f32 {
        0.0
    }
}

/// v ← max(v * r, v<sub>min</sub>)
#[derive(Debug, Clone, PartialEq)]
pub struct Multiplicative {
    rate: f32,
    min: f32,
}

impl Multiplicative {
    pub fn new(rate: f32, min: f32) -> Result<Self> {
        check_interval!(rate, 0.0, 1.0);
        check_interval!(min, 0.0, 1.0);
        Ok(Self { rate, min })
    }
}

impl Decay for Multiplicative {
    fn step(&self, value: f32) -> f32 {
        (value * self.rate).max(self.min)
    }

    fn min(&self) -> f32 {
        self.min
    }
}

/// v ← max(v - r, v<sub>min</sub>)
#[derive(Debug, Clone, PartialEq)]
pub struct Linear {
    rate: f32,
    min: f32,
}

impl Linear {
    pub fn new(rate: f32, min: f32) -> Result<Self> {
        check_interval!(rate, 0.0, 1.0);
        check_interval!(min, 0.0, 1.0);
        Ok(Self { rate, min })
    }
}

impl Decay for Linear {
    fn step(&self, value: f32) -> f32 {
        (value - self.rate).max(self.min)
    }

    fn min(&self) -> f32 {
        self.min
    }
}
