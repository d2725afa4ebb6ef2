//! Exact rational exponents
//!
//! Constituent powers are kept as exact rationals so that merging
//! `m^(1/3) · m^(2/3) · m^-1` lands on exactly zero and gets trimmed,
//! instead of leaving a float residue behind.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

use dashu_int::{IBig, UBig};
use dashu_ratio::RBig;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::UnitError;

/// Exponent of a base unit inside a canonical unit
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Power(RBig);

impl Power {
    pub const ZERO: Power = Power(RBig::ZERO);
    pub const ONE: Power = Power(RBig::ONE);

    /// Create `numerator / denominator`, normalized to lowest terms
    pub fn ratio(numerator: i64, denominator: i64) -> Result<Self, UnitError> {
        if denominator == 0 {
            return Err(UnitError::InvalidExponent(format!("{}/0", numerator)));
        }
        let mut num = IBig::from(numerator);
        if denominator < 0 {
            num = -num;
        }
        let den = UBig::from(denominator.unsigned_abs());
        Ok(Power(RBig::from_parts(num, den)))
    }

    /// Exact binary expansion of a finite float
    pub fn from_f64(value: f64) -> Result<Self, UnitError> {
        if !value.is_finite() {
            return Err(UnitError::InvalidExponent(value.to_string()));
        }
        RBig::try_from(value)
            .map(Power)
            .map_err(|_| UnitError::InvalidExponent(value.to_string()))
    }

    pub fn is_zero(&self) -> bool {
        self.0 == RBig::ZERO
    }

    pub fn is_integer(&self) -> bool {
        *self.0.denominator() == UBig::ONE
    }

    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().value()
    }

    /// Raise `base` to this power. Integral powers go through `powi`.
    pub fn apply(&self, base: f64) -> f64 {
        let exp = self.to_f64();
        if self.is_integer() && exp.abs() <= f64::from(i32::MAX) {
            base.powi(exp as i32)
        } else {
            base.powf(exp)
        }
    }
}

impl From<i32> for Power {
    fn from(value: i32) -> Self {
        Power(RBig::from(IBig::from(value)))
    }
}

impl From<i64> for Power {
    fn from(value: i64) -> Self {
        Power(RBig::from(IBig::from(value)))
    }
}

impl Add for Power {
    type Output = Power;

    fn add(self, rhs: Power) -> Power {
        Power(self.0 + rhs.0)
    }
}

impl Add<&Power> for &Power {
    type Output = Power;

    fn add(self, rhs: &Power) -> Power {
        Power(&self.0 + &rhs.0)
    }
}

impl Sub<&Power> for &Power {
    type Output = Power;

    fn sub(self, rhs: &Power) -> Power {
        Power(&self.0 - &rhs.0)
    }
}

impl Mul<&Power> for &Power {
    type Output = Power;

    fn mul(self, rhs: &Power) -> Power {
        Power(&self.0 * &rhs.0)
    }
}

impl Neg for Power {
    type Output = Power;

    fn neg(self) -> Power {
        Power(-self.0)
    }
}

impl Neg for &Power {
    type Output = Power;

    fn neg(self) -> Power {
        Power(-&self.0)
    }
}

impl fmt::Display for Power {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_integer() {
            write!(f, "{}", self.0.numerator())
        } else {
            write!(f, "{}/{}", self.0.numerator(), self.0.denominator())
        }
    }
}

/// Accepts `"2"`, `"-1/3"` or a decimal such as `"0.5"`
impl FromStr for Power {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || UnitError::InvalidExponent(s.to_string());

        if let Some((num, den)) = s.split_once('/') {
            let num: i64 = num.trim().parse().map_err(|_| invalid())?;
            let den: i64 = den.trim().parse().map_err(|_| invalid())?;
            return Power::ratio(num, den);
        }
        if let Ok(n) = s.parse::<i64>() {
            return Ok(Power::from(n));
        }
        let value: f64 = s.parse().map_err(|_| invalid())?;
        Power::from_f64(value)
    }
}

impl Serialize for Power {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Power {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
