//! Operand values for dynamically dispatched arithmetic
//!
//! `Value` is the sum of everything an arithmetic operator can receive:
//! a bare number, a base unit, a derived unit, or a measurement. Each
//! operator is an explicit case analysis over operand pairs.

use std::borrow::Cow;

use mensura_core::{Power, UnitError};

use crate::{BaseUnit, Measurement, Product, Unit};

/// Any arithmetic operand or result
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(f64),
    Base(BaseUnit),
    Unit(Unit),
    Measurement(Measurement),
}

/// Operand view with base units promoted
enum Operand<'a> {
    Scalar(f64),
    Unit(Cow<'a, Unit>),
    Measurement(&'a Measurement),
}

impl Value {
    /// Kind name used in `InvalidOperandType` errors
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Scalar(_) => "Number",
            Value::Base(_) => "BaseUnit",
            Value::Unit(_) => "Unit",
            Value::Measurement(_) => "Measurement",
        }
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Value::Scalar(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_measurement(&self) -> Option<&Measurement> {
        match self {
            Value::Measurement(m) => Some(m),
            _ => None,
        }
    }

    pub fn into_measurement(self) -> Option<Measurement> {
        match self {
            Value::Measurement(m) => Some(m),
            _ => None,
        }
    }

    pub fn into_unit(self) -> Option<Unit> {
        match self {
            Value::Unit(u) => Some(u),
            Value::Base(b) => Some(b.to_unit()),
            _ => None,
        }
    }

    fn operand(&self) -> Operand<'_> {
        match self {
            Value::Scalar(n) => Operand::Scalar(*n),
            Value::Base(b) => Operand::Unit(Cow::Owned(b.to_unit())),
            Value::Unit(u) => Operand::Unit(Cow::Borrowed(u)),
            Value::Measurement(m) => Operand::Measurement(m),
        }
    }

    /// Full multiplication table. Unit products that cancel become numbers.
    pub fn mul(&self, rhs: &Value) -> Result<Value, UnitError> {
        match (self.operand(), rhs.operand()) {
            (Operand::Scalar(a), Operand::Scalar(b)) => Ok(Value::Scalar(a * b)),
            (Operand::Scalar(n), Operand::Unit(u)) | (Operand::Unit(u), Operand::Scalar(n)) => {
                Ok(Value::Measurement(u.measure(n)))
            }
            (Operand::Scalar(n), Operand::Measurement(m))
            | (Operand::Measurement(m), Operand::Scalar(n)) => Ok(Value::Measurement(m * n)),
            (Operand::Unit(a), Operand::Unit(b)) => Ok(a.multiply(&b)?.into()),
            (Operand::Unit(u), Operand::Measurement(m))
            | (Operand::Measurement(m), Operand::Unit(u)) => m.mul_unit(&u),
            (Operand::Measurement(a), Operand::Measurement(b)) => a.mul_measurement(b),
        }
    }

    /// Full division table; `number / unit` measures in the inverse unit
    pub fn div(&self, rhs: &Value) -> Result<Value, UnitError> {
        match (self.operand(), rhs.operand()) {
            (Operand::Scalar(a), Operand::Scalar(b)) => Ok(Value::Scalar(a / b)),
            (Operand::Unit(u), Operand::Scalar(n)) => Ok(Value::Measurement(u.measure(1.0 / n))),
            (Operand::Scalar(n), Operand::Unit(u)) => Ok(Value::Measurement(u.inverse()?.measure(n))),
            (Operand::Measurement(m), Operand::Scalar(n)) => Ok(Value::Measurement(m / n)),
            (Operand::Scalar(n), Operand::Measurement(m)) => (n / m).map(Value::Measurement),
            (Operand::Unit(a), Operand::Unit(b)) => Ok(a.divide(&b)?.into()),
            (Operand::Unit(u), Operand::Measurement(m)) => &*u / m,
            (Operand::Measurement(m), Operand::Unit(u)) => m.div_unit(&u),
            (Operand::Measurement(a), Operand::Measurement(b)) => a.div_measurement(b),
        }
    }

    /// Numbers add to numbers, measurements to measurements of the same dimension
    pub fn add(&self, rhs: &Value) -> Result<Value, UnitError> {
        match (self, rhs) {
            (Value::Scalar(a), Value::Scalar(b)) => Ok(Value::Scalar(a + b)),
            (Value::Measurement(a), Value::Measurement(b)) => a.add(b).map(Value::Measurement),
            _ => Err(self.additive_mismatch("add", rhs)),
        }
    }

    pub fn sub(&self, rhs: &Value) -> Result<Value, UnitError> {
        match (self, rhs) {
            (Value::Scalar(a), Value::Scalar(b)) => Ok(Value::Scalar(a - b)),
            (Value::Measurement(a), Value::Measurement(b)) => a.sub(b).map(Value::Measurement),
            _ => Err(self.additive_mismatch("sub", rhs)),
        }
    }

    fn additive_mismatch(&self, operation: &'static str, rhs: &Value) -> UnitError {
        match self {
            Value::Scalar(_) => UnitError::operand(operation, "Number", rhs.type_name()),
            Value::Measurement(_) => UnitError::operand(operation, "Measurement", rhs.type_name()),
            _ => UnitError::operand(operation, "Number or Measurement", self.type_name()),
        }
    }

    /// The exponent must be a number
    pub fn pow(&self, exponent: &Value) -> Result<Value, UnitError> {
        let power = match exponent {
            Value::Scalar(n) => Power::from_f64(*n)?,
            other => return Err(UnitError::operand("pow", "Number", other.type_name())),
        };
        match self {
            Value::Scalar(n) => Ok(Value::Scalar(power.apply(*n))),
            Value::Base(b) => Ok(b.pow(power)?.into()),
            Value::Unit(u) => Ok(u.pow(power)?.into()),
            Value::Measurement(m) => m.pow(power),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Scalar(n)
    }
}

impl From<BaseUnit> for Value {
    fn from(b: BaseUnit) -> Self {
        Value::Base(b)
    }
}

impl From<Unit> for Value {
    fn from(u: Unit) -> Self {
        Value::Unit(u)
    }
}

impl From<Measurement> for Value {
    fn from(m: Measurement) -> Self {
        Value::Measurement(m)
    }
}

impl From<Product> for Value {
    fn from(p: Product) -> Self {
        match p {
            Product::Unit(u) => Value::Unit(u),
            Product::Scalar(n) => Value::Scalar(n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension::{LENGTH, TIME};
    use mensura_core::Tolerance;

    fn close(a: f64, b: f64) -> bool {
        Tolerance::default().approx_eq(a, b)
    }

    fn units() -> (BaseUnit, Unit) {
        let s = BaseUnit::new("s", &TIME);
        let minute = Unit::new(60.0, [(&s, 1)]).unwrap();
        (s, minute)
    }

    #[test]
    fn test_number_times_unit_is_measurement() {
        let (_, minute) = units();
        let v = Value::from(3.0).mul(&Value::from(minute.clone())).unwrap();
        let m = v.into_measurement().unwrap();
        assert_eq!(m.magnitude(), 3.0);
        assert_eq!(m.unit(), &minute);
    }

    #[test]
    fn test_base_units_promote() {
        let (s, minute) = units();
        let v = Value::from(minute).div(&Value::from(s)).unwrap();
        assert_eq!(v, Value::Scalar(60.0));
    }

    #[test]
    fn test_unit_over_number() {
        let (_, minute) = units();
        let v = Value::from(minute).div(&Value::from(4.0)).unwrap();
        assert_eq!(v.as_measurement().unwrap().magnitude(), 0.25);
    }

    #[test]
    fn test_number_over_measurement() {
        let (s, _) = units();
        let v = Value::from(10.0).div(&Value::from(s.measure(4.0))).unwrap();
        let m = v.into_measurement().unwrap();
        assert_eq!(m.magnitude(), 2.5);
        assert_eq!(m.unit().constituents()[0].power(), &Power::from(-1));
    }

    #[test]
    fn test_unit_over_measurement() {
        let (s, minute) = units();
        let v = Value::from(minute).div(&Value::from(s.measure(30.0))).unwrap();
        assert!(close(v.as_scalar().unwrap(), 2.0));
    }

    #[test]
    fn test_add_rejects_units() {
        let (s, minute) = units();
        let err = Value::from(minute).add(&Value::from(s)).unwrap_err();
        assert_eq!(
            err,
            UnitError::operand("add", "Number or Measurement", "Unit")
        );

        let err = Value::from(1.0).sub(&Value::from(BaseUnit::new("m", &LENGTH).measure(1.0)));
        assert_eq!(
            err.unwrap_err(),
            UnitError::operand("sub", "Number", "Measurement")
        );
    }

    #[test]
    fn test_add_measurements() {
        let (s, minute) = units();
        let sum = Value::from(minute.measure(1.0))
            .add(&Value::from(s.measure(30.0)))
            .unwrap();
        assert!(close(sum.as_measurement().unwrap().magnitude(), 1.5));
    }

    #[test]
    fn test_add_mismatch_propagates() {
        let (s, _) = units();
        let m = BaseUnit::new("m", &LENGTH);
        let err = Value::from(s.measure(1.0))
            .add(&Value::from(m.measure(1.0)))
            .unwrap_err();
        assert!(matches!(err, UnitError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_pow_dispatch() {
        let (s, _) = units();
        let squared = Value::from(s).pow(&Value::from(2.0)).unwrap();
        let unit = squared.into_unit().unwrap();
        assert_eq!(unit.constituents()[0].power(), &Power::from(2));

        assert_eq!(
            Value::from(3.0).pow(&Value::from(2.0)).unwrap(),
            Value::Scalar(9.0)
        );
    }

    #[test]
    fn test_pow_zero_collapses_to_number() {
        let (s, minute) = units();
        let zero = Value::from(0.0);
        assert_eq!(Value::from(minute.clone()).pow(&zero).unwrap(), Value::Scalar(1.0));
        assert_eq!(Value::from(s).pow(&zero).unwrap(), Value::Scalar(1.0));
        assert_eq!(
            Value::from(minute.measure(3.0)).pow(&zero).unwrap(),
            Value::Scalar(1.0)
        );
    }

    #[test]
    fn test_factor_overflow_is_an_error() {
        let (s, _) = units();
        let huge = Value::from(Unit::new(1e300, [(&s, 1)]).unwrap());
        assert!(matches!(huge.mul(&huge), Err(UnitError::InvalidFactor(_))));
        assert!(matches!(
            huge.pow(&Value::from(2.0)),
            Err(UnitError::InvalidFactor(_))
        ));
        assert!(huge.div(&huge).is_ok());
    }

    #[test]
    fn test_pow_rejects_non_number_exponent() {
        let (s, minute) = units();
        let err = Value::from(minute).pow(&Value::from(s)).unwrap_err();
        assert_eq!(err, UnitError::operand("pow", "Number", "BaseUnit"));
        assert!(matches!(
            Value::from(2.0).pow(&Value::from(f64::NAN)),
            Err(UnitError::InvalidExponent(_))
        ));
    }
}
