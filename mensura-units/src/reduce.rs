//! Reduction of unit terms to canonical form
//!
//! Any list of `(unit, power)` terms, where units may be base or derived,
//! reduces to one scale factor and a list of base-unit powers that is
//! merged, free of zero powers, and sorted by base-unit id.

use std::collections::BTreeMap;

use mensura_core::Power;
use tracing::trace;

use crate::{BaseUnit, Constituent, Term, UnitRef};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Reduced {
    pub factor: f64,
    pub constituents: Vec<Constituent>,
}

/// Expand, merge, trim and order `terms`, scaling `factor` along the way.
///
/// A derived unit's constituents are already canonical base-unit powers,
/// fixed when that unit was built, so each derived term expands exactly
/// once and a `Unit` can never expand into itself. Named definitions that
/// can refer to each other are checked for cycles in `UnitRegistry`.
pub(crate) fn reduce<I>(factor: f64, terms: I) -> Reduced
where
    I: IntoIterator<Item = Term>,
{
    let mut factor = factor;
    let mut worklist: Vec<(UnitRef, Power)> = terms
        .into_iter()
        .map(|term| (term.unit, term.power))
        .collect();
    worklist.reverse();
    let initial_terms = worklist.len();

    // Merging into a map keyed by base unit also yields the id order.
    let mut merged: BTreeMap<BaseUnit, Power> = BTreeMap::new();

    while let Some((unit, power)) = worklist.pop() {
        match unit {
            UnitRef::Base(base) => {
                let slot = merged.entry(base).or_insert(Power::ZERO);
                *slot = &*slot + &power;
            }
            UnitRef::Derived(derived) => {
                factor *= power.apply(derived.factor());
                for constituent in derived.constituents().iter().rev() {
                    worklist.push((
                        UnitRef::Base(constituent.base().clone()),
                        constituent.power() * &power,
                    ));
                }
            }
        }
    }

    let constituents: Vec<Constituent> = merged
        .into_iter()
        .filter(|(_, power)| !power.is_zero())
        .map(|(base, power)| Constituent::new(base, power))
        .collect();

    trace!(
        terms = initial_terms,
        constituents = constituents.len(),
        factor,
        "reduced unit terms"
    );

    Reduced { factor, constituents }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension::{LENGTH, MASS, TIME};
    use crate::Unit;

    fn base_units() -> (BaseUnit, BaseUnit, BaseUnit) {
        let s = BaseUnit::new("s", &TIME);
        let m = BaseUnit::new("m", &LENGTH);
        let kg = BaseUnit::new("kg", &MASS);
        (s, m, kg)
    }

    #[test]
    fn test_merges_duplicates() {
        let (s, m, _) = base_units();
        let reduced = reduce(
            1.0,
            vec![Term::new(&m, 1), Term::new(&s, -1), Term::new(&m, 2)],
        );
        assert_eq!(reduced.constituents.len(), 2);
        assert_eq!(reduced.constituents[0], Constituent::new(s, Power::from(-1)));
        assert_eq!(reduced.constituents[1], Constituent::new(m, Power::from(3)));
    }

    #[test]
    fn test_trims_zero_powers() {
        let (s, m, _) = base_units();
        let reduced = reduce(
            2.0,
            vec![Term::new(&m, 1), Term::new(&s, 1), Term::new(&m, -1)],
        );
        assert_eq!(reduced.factor, 2.0);
        assert_eq!(reduced.constituents, vec![Constituent::new(s, Power::ONE)]);
    }

    #[test]
    fn test_expands_derived_with_outer_power() {
        let (s, _, _) = base_units();
        let minute = Unit::new(60.0, [Term::new(&s, 1)]).unwrap();
        let reduced = reduce(1.0, vec![Term::new(&minute, -2)]);
        assert!((reduced.factor - 1.0 / 3600.0).abs() < 1e-18);
        assert_eq!(reduced.constituents, vec![Constituent::new(s, Power::from(-2))]);
    }

    #[test]
    fn test_order_independent() {
        let (s, m, kg) = base_units();
        let a = reduce(
            1.0,
            vec![Term::new(&kg, 1), Term::new(&m, 1), Term::new(&s, -2)],
        );
        let b = reduce(
            1.0,
            vec![Term::new(&s, -2), Term::new(&kg, 1), Term::new(&m, 1)],
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_terms() {
        let reduced = reduce(5.0, Vec::new());
        assert_eq!(reduced.factor, 5.0);
        assert!(reduced.constituents.is_empty());
    }
}
