//! Predefined SI base units
//!
//! Created together on first use so their relative order is fixed:
//! s, m, kg, A, mol, cd, K.

use std::sync::LazyLock;

use crate::dimension::{AMOUNT, CURRENT, LENGTH, LUMINOSITY, MASS, TEMPERATURE, TIME};
use crate::BaseUnit;

static SI_BASE: LazyLock<[BaseUnit; 7]> = LazyLock::new(|| {
    [
        BaseUnit::new("s", &TIME),
        BaseUnit::new("m", &LENGTH),
        BaseUnit::new("kg", &MASS),
        BaseUnit::new("A", &CURRENT),
        BaseUnit::new("mol", &AMOUNT),
        BaseUnit::new("cd", &LUMINOSITY),
        BaseUnit::new("K", &TEMPERATURE),
    ]
});

pub static SECOND: LazyLock<BaseUnit> = LazyLock::new(|| SI_BASE[0].clone());
pub static METER: LazyLock<BaseUnit> = LazyLock::new(|| SI_BASE[1].clone());
pub static KILOGRAM: LazyLock<BaseUnit> = LazyLock::new(|| SI_BASE[2].clone());
pub static AMPERE: LazyLock<BaseUnit> = LazyLock::new(|| SI_BASE[3].clone());
pub static MOLE: LazyLock<BaseUnit> = LazyLock::new(|| SI_BASE[4].clone());
pub static CANDELA: LazyLock<BaseUnit> = LazyLock::new(|| SI_BASE[5].clone());
pub static KELVIN: LazyLock<BaseUnit> = LazyLock::new(|| SI_BASE[6].clone());

/// All seven SI base units in creation order
pub fn base_units() -> &'static [BaseUnit] {
    SI_BASE.as_slice()
}
