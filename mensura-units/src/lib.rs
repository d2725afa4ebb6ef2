//! Mensura Units - Dimensional analysis and unit algebra
//!
//! Provides dimension-checked measurements over composable units.
//! Every unit is reduced at construction to a scale factor times an
//! ordered list of base-unit powers, so comparing dimensions is a
//! structural comparison and derived units cancel automatically.
//!
//! Layers, leaf first:
//! - `Dimension` - opaque physical quality tag (time, length, ...)
//! - `BaseUnit` - irreducible unit of one dimension
//! - `Unit` - scale factor times canonical base-unit powers
//! - `Measurement` - magnitude in a unit, with checked arithmetic
//! - `Value` - operand sum type for dynamically dispatched arithmetic
//! - `UnitRegistry` - named definitions resolved on demand

mod dimension;
mod base_unit;
mod unit;
mod reduce;
mod measurement;
mod value;
mod registry;
pub mod si;

pub use dimension::{
    Dimension, DimensionSignature, AMOUNT, CURRENT, DIMENSIONLESS, LENGTH, LUMINOSITY, MASS,
    TEMPERATURE, TIME,
};
pub use base_unit::BaseUnit;
pub use unit::{CanonicalForm, Constituent, ConstituentForm, Product, Term, Unit, UnitLike, UnitRef};
pub use measurement::Measurement;
pub use value::Value;
pub use registry::{UnitId, UnitRegistry};

pub use mensura_core::{Power, Tolerance, UnitError};
