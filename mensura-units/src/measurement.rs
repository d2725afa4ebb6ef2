//! Measurement type - a magnitude with an associated unit

use std::fmt;
use std::ops::{Div, Mul};

use mensura_core::{Power, Tolerance, UnitError};

use crate::unit::UnitLike;
use crate::{BaseUnit, Product, Unit, Value};

/// A physical quantity: a magnitude expressed in a unit
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    magnitude: f64,
    unit: Unit,
}

impl Measurement {
    /// A quantity of `magnitude` in `unit` (a `Unit` or a `BaseUnit`)
    pub fn new(magnitude: f64, unit: impl Into<Unit>) -> Self {
        Measurement {
            magnitude,
            unit: unit.into(),
        }
    }

    /// Magnitude in this measurement's own unit
    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    /// Unit the magnitude is expressed in
    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    pub fn is_same_dimension(&self, other: &Measurement) -> bool {
        self.unit.is_same_dimension(&other.unit)
    }

    /// Express this quantity in `target`
    pub fn to(&self, target: &impl UnitLike) -> Result<Measurement, UnitError> {
        let target = target.as_unit();
        let magnitude = self.magnitude_in(target.as_ref())?;
        Ok(Measurement::new(magnitude, target.into_owned()))
    }

    /// Magnitude this quantity would have in `target`
    pub fn magnitude_in(&self, target: &impl UnitLike) -> Result<f64, UnitError> {
        let target = target.as_unit();
        self.unit.ensure_same_dimension(target.as_ref())?;
        Ok(self.magnitude * self.unit.factor() / target.factor())
    }

    /// Same quantity with the factor folded into the magnitude
    pub fn to_base(&self) -> Measurement {
        Measurement {
            magnitude: self.magnitude * self.unit.factor(),
            unit: Unit::from_canonical(1.0, self.unit.constituents().to_vec()),
        }
    }

    /// Sum expressed in the left operand's unit
    pub fn add(&self, other: &Measurement) -> Result<Measurement, UnitError> {
        self.unit.ensure_same_dimension(&other.unit)?;
        let converted = other.magnitude_in(&self.unit)?;
        Ok(Measurement::new(self.magnitude + converted, &self.unit))
    }

    /// Difference expressed in the left operand's unit
    pub fn sub(&self, other: &Measurement) -> Result<Measurement, UnitError> {
        self.unit.ensure_same_dimension(&other.unit)?;
        let converted = other.magnitude_in(&self.unit)?;
        Ok(Measurement::new(self.magnitude - converted, &self.unit))
    }

    /// Product with a unit. Collapses to a number when the units cancel.
    pub fn mul_unit(&self, unit: &Unit) -> Result<Value, UnitError> {
        Ok(Self::settle(self.magnitude, self.unit.multiply(unit)?))
    }

    /// Quotient by a unit. Collapses to a number when the units cancel.
    pub fn div_unit(&self, unit: &Unit) -> Result<Value, UnitError> {
        Ok(Self::settle(self.magnitude, self.unit.divide(unit)?))
    }

    /// Magnitudes multiply, units go through `Unit::multiply`
    pub fn mul_measurement(&self, other: &Measurement) -> Result<Value, UnitError> {
        let product = self.unit.multiply(&other.unit)?;
        Ok(Self::settle(self.magnitude * other.magnitude, product))
    }

    /// Magnitudes divide, units go through `Unit::divide`
    pub fn div_measurement(&self, other: &Measurement) -> Result<Value, UnitError> {
        let quotient = self.unit.divide(&other.unit)?;
        Ok(Self::settle(self.magnitude / other.magnitude, quotient))
    }

    fn settle(magnitude: f64, product: Product) -> Value {
        match product {
            Product::Unit(unit) => Value::Measurement(Measurement::new(magnitude, unit)),
            Product::Scalar(factor) => Value::Scalar(magnitude * factor),
        }
    }

    /// Power zero leaves a plain number
    pub fn pow(&self, power: impl Into<Power>) -> Result<Value, UnitError> {
        let power = power.into();
        let unit = self.unit.pow(power.clone())?;
        Ok(Self::settle(power.apply(self.magnitude), unit))
    }

    /// One over this quantity, in the inverse unit
    pub fn recip(&self) -> Result<Measurement, UnitError> {
        Ok(Measurement::new(self.magnitude.recip(), self.unit.inverse()?))
    }

    /// Same dimension and equal magnitudes once expressed in `self`'s unit
    pub fn approx_eq(&self, other: &Measurement, tolerance: &Tolerance) -> bool {
        match other.magnitude_in(&self.unit) {
            Ok(magnitude) => tolerance.approx_eq(self.magnitude, magnitude),
            Err(_) => false,
        }
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x |{}|", self.magnitude, self.unit)
    }
}

// ============ Operators ============

impl Mul<f64> for &Measurement {
    type Output = Measurement;

    fn mul(self, rhs: f64) -> Measurement {
        Measurement::new(self.magnitude * rhs, &self.unit)
    }
}

impl Mul<&Measurement> for f64 {
    type Output = Measurement;

    fn mul(self, rhs: &Measurement) -> Measurement {
        rhs * self
    }
}

impl Div<f64> for &Measurement {
    type Output = Measurement;

    fn div(self, rhs: f64) -> Measurement {
        Measurement::new(self.magnitude / rhs, &self.unit)
    }
}

/// Reciprocal: `s / m` is `m^-1 * s`
impl Div<&Measurement> for f64 {
    type Output = Result<Measurement, UnitError>;

    fn div(self, rhs: &Measurement) -> Self::Output {
        Ok(&rhs.recip()? * self)
    }
}

impl Mul<&Unit> for &Measurement {
    type Output = Result<Value, UnitError>;

    fn mul(self, rhs: &Unit) -> Self::Output {
        self.mul_unit(rhs)
    }
}

impl Mul<&Measurement> for &Unit {
    type Output = Result<Value, UnitError>;

    fn mul(self, rhs: &Measurement) -> Self::Output {
        rhs.mul_unit(self)
    }
}

impl Mul<&BaseUnit> for &Measurement {
    type Output = Result<Value, UnitError>;

    fn mul(self, rhs: &BaseUnit) -> Self::Output {
        self.mul_unit(&rhs.to_unit())
    }
}

impl Div<&Unit> for &Measurement {
    type Output = Result<Value, UnitError>;

    fn div(self, rhs: &Unit) -> Self::Output {
        self.div_unit(rhs)
    }
}

impl Div<&Measurement> for &Unit {
    type Output = Result<Value, UnitError>;

    fn div(self, rhs: &Measurement) -> Self::Output {
        self.measure(1.0).div_measurement(rhs)
    }
}

impl Div<&BaseUnit> for &Measurement {
    type Output = Result<Value, UnitError>;

    fn div(self, rhs: &BaseUnit) -> Self::Output {
        self.div_unit(&rhs.to_unit())
    }
}

impl Mul<&Measurement> for &Measurement {
    type Output = Result<Value, UnitError>;

    fn mul(self, rhs: &Measurement) -> Self::Output {
        self.mul_measurement(rhs)
    }
}

impl Div<&Measurement> for &Measurement {
    type Output = Result<Value, UnitError>;

    fn div(self, rhs: &Measurement) -> Self::Output {
        self.div_measurement(rhs)
    }
}
