//! Floating point comparison settings

use serde::{Deserialize, Serialize};

/// How close two magnitudes or factors must be to count as equal.
///
/// Two values match when their difference is within `absolute`, or within
/// `relative` times the larger of the two magnitudes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerance {
    pub relative: f64,
    pub absolute: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            relative: 1e-12,
            absolute: 0.0,
        }
    }
}

impl Tolerance {
    /// Bitwise equality only
    pub fn exact() -> Self {
        Self {
            relative: 0.0,
            absolute: 0.0,
        }
    }

    pub fn with_relative(mut self, relative: f64) -> Self {
        self.relative = relative;
        self
    }

    pub fn with_absolute(mut self, absolute: f64) -> Self {
        self.absolute = absolute;
        self
    }

    pub fn approx_eq(&self, a: f64, b: f64) -> bool {
        if a == b {
            return true;
        }
        let diff = (a - b).abs();
        diff <= self.absolute || diff <= self.relative * a.abs().max(b.abs())
    }
}
