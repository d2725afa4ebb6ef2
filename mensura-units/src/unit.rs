//! Derived units: a scale factor times a canonical product of base-unit powers

use std::borrow::Cow;
use std::fmt;
use std::ops::{Div, Mul};
use std::sync::Arc;

use mensura_core::{Power, Tolerance, UnitError};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dimension::DimensionSignature;
use crate::reduce::{reduce, Reduced};
use crate::{BaseUnit, Measurement};

/// One `(base unit, power)` pair of a canonical unit
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Constituent {
    base: BaseUnit,
    power: Power,
}

impl Constituent {
    pub fn new(base: BaseUnit, power: Power) -> Self {
        Constituent { base, power }
    }

    /// The base unit of this pair
    pub fn base(&self) -> &BaseUnit {
        &self.base
    }

    pub fn power(&self) -> &Power {
        &self.power
    }
}

/// A unit term before reduction: either a base unit or an already built unit
#[derive(Debug, Clone)]
pub enum UnitRef {
    Base(BaseUnit),
    Derived(Unit),
}

impl From<&BaseUnit> for UnitRef {
    fn from(base: &BaseUnit) -> Self {
        UnitRef::Base(base.clone())
    }
}

impl From<BaseUnit> for UnitRef {
    fn from(base: BaseUnit) -> Self {
        UnitRef::Base(base)
    }
}

impl From<&Unit> for UnitRef {
    fn from(unit: &Unit) -> Self {
        UnitRef::Derived(unit.clone())
    }
}

impl From<Unit> for UnitRef {
    fn from(unit: Unit) -> Self {
        UnitRef::Derived(unit)
    }
}

/// A `(unit, power)` term passed to `Unit::new`
#[derive(Debug, Clone)]
pub struct Term {
    pub unit: UnitRef,
    pub power: Power,
}

impl Term {
    pub fn new(unit: impl Into<UnitRef>, power: impl Into<Power>) -> Self {
        Term {
            unit: unit.into(),
            power: power.into(),
        }
    }
}

impl<U, P> From<(U, P)> for Term
where
    U: Into<UnitRef>,
    P: Into<Power>,
{
    fn from((unit, power): (U, P)) -> Self {
        Term::new(unit, power)
    }
}

/// Result of multiplying, dividing or raising units.
///
/// When every constituent cancels, the product is a bare number equal to
/// the combined factor. A `Unit` always has at least one constituent.
#[derive(Debug, Clone, PartialEq)]
pub enum Product {
    Unit(Unit),
    Scalar(f64),
}

impl Product {
    /// True when every constituent cancelled
    pub fn is_scalar(&self) -> bool {
        matches!(self, Product::Scalar(_))
    }

    /// The unit, or `None` when the product collapsed
    pub fn unit(self) -> Option<Unit> {
        match self {
            Product::Unit(unit) => Some(unit),
            Product::Scalar(_) => None,
        }
    }

    /// The collapsed factor, or `None` when units remain
    pub fn scalar(&self) -> Option<f64> {
        match self {
            Product::Scalar(value) => Some(*value),
            Product::Unit(_) => None,
        }
    }
}

/// Anything usable where a unit is expected
pub trait UnitLike {
    fn as_unit(&self) -> Cow<'_, Unit>;
}

impl UnitLike for Unit {
    fn as_unit(&self) -> Cow<'_, Unit> {
        Cow::Borrowed(self)
    }
}

impl UnitLike for BaseUnit {
    fn as_unit(&self) -> Cow<'_, Unit> {
        Cow::Owned(self.to_unit())
    }
}

/// Factors must stay finite and positive through every operation
pub(crate) fn checked_factor(factor: f64) -> Result<f64, UnitError> {
    if factor.is_finite() && factor > 0.0 {
        Ok(factor)
    } else {
        Err(UnitError::InvalidFactor(factor))
    }
}

/// A composite unit, fully reduced at construction and immutable afterwards.
///
/// `factor` is how many base-unit quantities make one of this unit.
/// `constituents` holds each base unit at most once, never with power zero,
/// sorted by base-unit id, and is never empty.
#[derive(Clone)]
pub struct Unit {
    factor: f64,
    constituents: Arc<[Constituent]>,
    symbol: Option<Arc<str>>,
}

impl Unit {
    /// Build and reduce a unit from `factor` and `(unit, power)` terms.
    ///
    /// Terms that cancel completely leave nothing to measure in and are
    /// rejected with `UnitError::EmptyUnit`.
    pub fn new<I, T>(factor: f64, terms: I) -> Result<Unit, UnitError>
    where
        I: IntoIterator<Item = T>,
        T: Into<Term>,
    {
        let factor = checked_factor(factor)?;
        let Reduced { factor, constituents } = reduce(factor, terms.into_iter().map(Into::into));
        let factor = checked_factor(factor)?;
        if constituents.is_empty() {
            return Err(UnitError::EmptyUnit(factor));
        }
        Ok(Unit::from_canonical(factor, constituents))
    }

    /// Wrap constituents that are already canonical and non-empty
    pub(crate) fn from_canonical(factor: f64, constituents: Vec<Constituent>) -> Unit {
        Unit {
            factor,
            constituents: constituents.into(),
            symbol: None,
        }
    }

    /// Attach a display label. Equality ignores it.
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(Arc::from(symbol.into()));
        self
    }

    /// Base-unit quantities in one of this unit
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Canonical `(base unit, power)` list, ordered by base-unit id
    pub fn constituents(&self) -> &[Constituent] {
        &self.constituents
    }

    /// Label set with `with_symbol`
    pub fn symbol(&self) -> Option<&str> {
        self.symbol.as_deref()
    }

    /// Dimension -> power mapping of the constituents
    pub fn dimension(&self) -> DimensionSignature {
        DimensionSignature::from_pairs(
            self.constituents
                .iter()
                .map(|c| (c.base.dimension().clone(), c.power.clone())),
        )
    }

    /// True when every constituent belongs to the dimensionless dimension
    pub fn is_dimensionless(&self) -> bool {
        self.constituents
            .iter()
            .all(|c| c.base.dimension().is_dimensionless())
    }

    /// Position-by-position comparison of the canonical constituent lists.
    ///
    /// Only valid because construction guarantees one ordering per
    /// composition.
    pub fn is_same_dimension(&self, other: &impl UnitLike) -> bool {
        let other = other.as_unit();
        self.constituents.len() == other.constituents.len()
            && self
                .constituents
                .iter()
                .zip(other.constituents.iter())
                .all(|(a, b)| a.base == b.base && a.power == b.power)
    }

    /// `DimensionMismatch` listing both canonical forms unless compatible
    pub fn ensure_same_dimension(&self, other: &impl UnitLike) -> Result<(), UnitError> {
        let other = other.as_unit();
        if self.is_same_dimension(other.as_ref()) {
            Ok(())
        } else {
            Err(UnitError::mismatch(
                self.render_constituents(),
                other.render_constituents(),
            ))
        }
    }

    /// Product of two units; a bare number when everything cancels
    pub fn multiply(&self, other: &Unit) -> Result<Product, UnitError> {
        let factor = self.factor * other.factor;
        let terms = self
            .constituents
            .iter()
            .chain(other.constituents.iter())
            .map(|c| Term::new(&c.base, c.power.clone()));
        Self::collapse(reduce(factor, terms))
    }

    /// Quotient of two units; a bare number when everything cancels
    pub fn divide(&self, other: &Unit) -> Result<Product, UnitError> {
        let factor = self.factor / other.factor;
        let terms = self
            .constituents
            .iter()
            .map(|c| Term::new(&c.base, c.power.clone()))
            .chain(other.constituents.iter().map(|c| Term::new(&c.base, -&c.power)));
        Self::collapse(reduce(factor, terms))
    }

    fn collapse(reduced: Reduced) -> Result<Product, UnitError> {
        let factor = checked_factor(reduced.factor)?;
        if reduced.constituents.is_empty() {
            debug!(factor, "unit product collapsed to scalar");
            Ok(Product::Scalar(factor))
        } else {
            Ok(Product::Unit(Unit::from_canonical(factor, reduced.constituents)))
        }
    }

    /// Raise to any rational power. Order is preserved since ids do not
    /// change. Power zero collapses to `Product::Scalar(1.0)`.
    pub fn pow(&self, power: impl Into<Power>) -> Result<Product, UnitError> {
        let power = power.into();
        let constituents: Vec<Constituent> = self
            .constituents
            .iter()
            .map(|c| Constituent::new(c.base.clone(), &c.power * &power))
            .filter(|c| !c.power.is_zero())
            .collect();
        Self::collapse(Reduced {
            factor: power.apply(self.factor),
            constituents,
        })
    }

    /// Power -1. Never collapses, but the factor can still overflow.
    pub fn inverse(&self) -> Result<Unit, UnitError> {
        let factor = checked_factor(self.factor.recip())?;
        let constituents = self
            .constituents
            .iter()
            .map(|c| Constituent::new(c.base.clone(), -&c.power))
            .collect();
        Ok(Unit::from_canonical(factor, constituents))
    }

    /// Named constructor turning a bare number into a quantity of this unit
    pub fn measure(&self, magnitude: f64) -> Measurement {
        Measurement::new(magnitude, self)
    }

    /// Same constituents and factors within `tolerance`
    pub fn approx_eq(&self, other: &Unit, tolerance: &Tolerance) -> bool {
        self.is_same_dimension(other) && tolerance.approx_eq(self.factor, other.factor)
    }

    /// Lossless snapshot for debugging and serialization
    pub fn canonical_form(&self) -> CanonicalForm {
        CanonicalForm {
            factor: self.factor,
            constituents: self
                .constituents
                .iter()
                .map(|c| ConstituentForm {
                    symbol: c.base.symbol().to_string(),
                    id: c.base.id(),
                    dimension: c.base.dimension().symbol().to_string(),
                    power: c.power.clone(),
                })
                .collect(),
        }
    }

    pub(crate) fn render_constituents(&self) -> String {
        self.constituents
            .iter()
            .map(|c| format!("({}, {})", c.base, c.power))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Compares canonical form; the symbol is a label only.
impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        self.factor == other.factor && self.constituents == other.constituents
    }
}

impl fmt::Debug for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Unit");
        if let Some(symbol) = &self.symbol {
            s.field("symbol", symbol);
        }
        s.field("factor", &self.factor)
            .field("constituents", &self.constituents)
            .finish()
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x [{}]", self.factor, self.render_constituents())
    }
}

impl From<&Unit> for Unit {
    fn from(unit: &Unit) -> Self {
        unit.clone()
    }
}

/// Serializable view of a unit's canonical form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalForm {
    pub factor: f64,
    pub constituents: Vec<ConstituentForm>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstituentForm {
    pub symbol: String,
    pub id: u64,
    pub dimension: String,
    pub power: Power,
}

// ============ Operators ============

impl Mul<&Unit> for &Unit {
    type Output = Result<Product, UnitError>;

    fn mul(self, rhs: &Unit) -> Self::Output {
        self.multiply(rhs)
    }
}

impl Div<&Unit> for &Unit {
    type Output = Result<Product, UnitError>;

    fn div(self, rhs: &Unit) -> Self::Output {
        self.divide(rhs)
    }
}

impl Mul<f64> for &Unit {
    type Output = Measurement;

    fn mul(self, rhs: f64) -> Measurement {
        self.measure(rhs)
    }
}

impl Mul<&Unit> for f64 {
    type Output = Measurement;

    fn mul(self, rhs: &Unit) -> Measurement {
        rhs.measure(self)
    }
}

impl Div<f64> for &Unit {
    type Output = Measurement;

    fn div(self, rhs: f64) -> Measurement {
        self.measure(1.0 / rhs)
    }
}

/// Number over unit: a quantity in the inverse unit
impl Div<&Unit> for f64 {
    type Output = Result<Measurement, UnitError>;

    fn div(self, rhs: &Unit) -> Self::Output {
        Ok(Measurement::new(self, rhs.inverse()?))
    }
}
