//! Mensura Core - Fundamental types
//!
//! This crate provides the core types used throughout Mensura:
//! - `Power`: Exact rational exponents for unit constituents
//! - `UnitError`: The error taxonomy of the unit engine
//! - `Tolerance`: Floating point comparison settings

mod power;
mod error;
mod tolerance;

pub use power::Power;
pub use error::{UnitError, codes};
pub use tolerance::Tolerance;

/// Result alias used across the workspace
pub type Result<T, E = UnitError> = std::result::Result<T, E>;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Power, Tolerance, UnitError};
    pub use crate::error::codes;
}
