//! Irreducible units

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Div, Mul};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use mensura_core::{Power, UnitError};

use crate::dimension::{Dimension, DimensionSignature, DIMENSIONLESS};
use crate::unit::UnitLike;
use crate::{Constituent, Measurement, Product, Unit, Value};

static NEXT_BASE_UNIT_ID: AtomicU64 = AtomicU64::new(0);

#[derive(Debug)]
struct BaseUnitInner {
    id: u64,
    symbol: String,
    dimension: Dimension,
}

/// An irreducible unit anchored to exactly one dimension, with factor 1.
///
/// Equality, ordering and hashing use the creation id, so two base units
/// with the same symbol stay distinct. The id is also the canonical
/// ordering key for unit constituents.
#[derive(Clone)]
pub struct BaseUnit(Arc<BaseUnitInner>);

impl BaseUnit {
    /// A fresh base unit; never equal to any existing one
    pub fn new(symbol: impl Into<String>, dimension: &Dimension) -> Self {
        let id = NEXT_BASE_UNIT_ID.fetch_add(1, Ordering::Relaxed);
        BaseUnit(Arc::new(BaseUnitInner {
            id,
            symbol: symbol.into(),
            dimension: dimension.clone(),
        }))
    }

    /// A base unit of the dimensionless dimension (radian, ratio, ...)
    pub fn unitless(symbol: impl Into<String>) -> Self {
        Self::new(symbol, &DIMENSIONLESS)
    }

    /// Creation sequence number, the canonical ordering key
    pub fn id(&self) -> u64 {
        self.0.id
    }

    /// Display label; not part of identity
    pub fn symbol(&self) -> &str {
        &self.0.symbol
    }

    /// The single dimension this unit measures
    pub fn dimension(&self) -> &Dimension {
        &self.0.dimension
    }

    /// Dimension -> power mapping, the same shape `Unit::dimension` returns
    pub fn signature(&self) -> DimensionSignature {
        DimensionSignature::from_pairs([(self.0.dimension.clone(), Power::ONE)])
    }

    /// Always 1
    pub fn factor(&self) -> f64 {
        1.0
    }

    /// Canonical form of a base unit: itself to the first power
    pub fn constituents(&self) -> [Constituent; 1] {
        [Constituent::new(self.clone(), Power::ONE)]
    }

    /// Promote to the equivalent single-term unit
    pub fn to_unit(&self) -> Unit {
        Unit::from_canonical(1.0, self.constituents().to_vec())
    }

    fn inverse_unit(&self) -> Unit {
        Unit::from_canonical(1.0, vec![Constituent::new(self.clone(), -Power::ONE)])
    }

    pub fn pow(&self, power: impl Into<Power>) -> Result<Product, UnitError> {
        self.to_unit().pow(power)
    }

    pub fn is_same_dimension(&self, other: &impl UnitLike) -> bool {
        self.to_unit().is_same_dimension(other)
    }

    pub fn measure(&self, magnitude: f64) -> Measurement {
        Measurement::new(magnitude, self)
    }
}

impl PartialEq for BaseUnit {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for BaseUnit {}

impl Hash for BaseUnit {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl PartialOrd for BaseUnit {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BaseUnit {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.id.cmp(&other.0.id)
    }
}

impl fmt::Debug for BaseUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}'{}'", self.0.symbol, self.0.id)
    }
}

impl fmt::Display for BaseUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.symbol)
    }
}

impl From<&BaseUnit> for Unit {
    fn from(base: &BaseUnit) -> Self {
        base.to_unit()
    }
}

impl From<BaseUnit> for Unit {
    fn from(base: BaseUnit) -> Self {
        base.to_unit()
    }
}

// ============ Operators ============

impl Mul<&BaseUnit> for &BaseUnit {
    type Output = Result<Product, UnitError>;

    fn mul(self, rhs: &BaseUnit) -> Self::Output {
        self.to_unit().multiply(&rhs.to_unit())
    }
}

impl Mul<&Unit> for &BaseUnit {
    type Output = Result<Product, UnitError>;

    fn mul(self, rhs: &Unit) -> Self::Output {
        self.to_unit().multiply(rhs)
    }
}

impl Mul<&BaseUnit> for &Unit {
    type Output = Result<Product, UnitError>;

    fn mul(self, rhs: &BaseUnit) -> Self::Output {
        self.multiply(&rhs.to_unit())
    }
}

impl Div<&BaseUnit> for &BaseUnit {
    type Output = Result<Product, UnitError>;

    fn div(self, rhs: &BaseUnit) -> Self::Output {
        self.to_unit().divide(&rhs.to_unit())
    }
}

impl Div<&Unit> for &BaseUnit {
    type Output = Result<Product, UnitError>;

    fn div(self, rhs: &Unit) -> Self::Output {
        self.to_unit().divide(rhs)
    }
}

impl Div<&BaseUnit> for &Unit {
    type Output = Result<Product, UnitError>;

    fn div(self, rhs: &BaseUnit) -> Self::Output {
        self.divide(&rhs.to_unit())
    }
}

impl Mul<&Measurement> for &BaseUnit {
    type Output = Result<Value, UnitError>;

    fn mul(self, rhs: &Measurement) -> Self::Output {
        rhs.mul_unit(&self.to_unit())
    }
}

impl Div<&Measurement> for &BaseUnit {
    type Output = Result<Value, UnitError>;

    fn div(self, rhs: &Measurement) -> Self::Output {
        self.measure(1.0).div_measurement(rhs)
    }
}

impl Mul<f64> for &BaseUnit {
    type Output = Measurement;

    fn mul(self, rhs: f64) -> Measurement {
        self.measure(rhs)
    }
}

impl Mul<&BaseUnit> for f64 {
    type Output = Measurement;

    fn mul(self, rhs: &BaseUnit) -> Measurement {
        rhs.measure(self)
    }
}

impl Div<f64> for &BaseUnit {
    type Output = Measurement;

    fn div(self, rhs: f64) -> Measurement {
        self.measure(1.0 / rhs)
    }
}

/// A base unit's inverse has factor 1, so this cannot fail
impl Div<&BaseUnit> for f64 {
    type Output = Measurement;

    fn div(self, rhs: &BaseUnit) -> Measurement {
        Measurement::new(self, rhs.inverse_unit())
    }
}
