//! Integration tests for unit composition and measurement arithmetic.
//!
//! Coverage
//! --------
//! - Derived units built from derived units (minute -> hour, newton -> lbf).
//! - Canonical ordering independent of term order.
//! - Dimension equality across unitless units (radian, degree, revolution).
//! - Cancellation of measurement products down to bare numbers, including
//!   rational powers and power zero.
//! - Addition in the left operand's unit, conversion round trips and
//!   dimension mismatch rejection.
//!
//! Exclusions
//! ----------
//! - Single-module behavior (power arithmetic, registry cycles, operand
//!   dispatch tables); those are covered by unit tests.

use std::f64::consts::PI;

use mensura_units::si::{KILOGRAM, METER, SECOND};
use mensura_units::{
    BaseUnit, Measurement, Power, Product, Term, Tolerance, Unit, UnitError, UnitRegistry, Value,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        Tolerance::default().approx_eq(actual, expected),
        "expected {expected}, got {actual}"
    );
}

fn squared(unit: &Unit) -> Unit {
    unit.pow(2).unwrap().unit().unwrap()
}

struct Units {
    minute: Unit,
    hour: Unit,
    foot: Unit,
    newton: Unit,
}

fn units() -> Units {
    let minute = Unit::new(60.0, [(&*SECOND, 1)]).unwrap().with_symbol("min");
    let hour = Unit::new(60.0, [(&minute, 1)]).unwrap().with_symbol("hr");
    let foot = Unit::new(0.3048, [(&*METER, 1)]).unwrap().with_symbol("ft");
    let newton = Unit::new(1.0, [(&*KILOGRAM, 1), (&*METER, 1), (&*SECOND, -2)])
        .unwrap()
        .with_symbol("N");
    Units { minute, hour, foot, newton }
}

#[test]
fn derived_units_reduce_to_base_units() {
    init_tracing();
    let u = units();

    assert_eq!(u.hour.factor(), 3600.0);

    let ft_per_hr = Unit::new(1.0, [(&u.foot, 1), (&u.hour, -1)]).unwrap();
    assert_close(ft_per_hr.factor(), 8.466666666666667e-05);

    let lbf = Unit::new(4.44822, [(&u.newton, 1)]).unwrap().with_symbol("lbf");
    let xlbf_2 = Unit::new(12.0, [(&lbf, 2)]).unwrap();
    assert_eq!(lbf.factor(), 4.44822);
    assert_close(xlbf_2.factor(), 237.43993402080002);

    // s, m, kg in SI creation order
    let powers: Vec<Power> = xlbf_2.constituents().iter().map(|c| c.power().clone()).collect();
    assert_eq!(powers, vec![Power::from(-4), Power::from(2), Power::from(2)]);
}

#[test]
fn canonical_form_ignores_term_order() {
    let a = Unit::new(2.0, [(&*METER, 1), (&*KILOGRAM, 1), (&*SECOND, -2)]).unwrap();
    let b = Unit::new(2.0, [(&*SECOND, -2), (&*METER, 1), (&*KILOGRAM, 1)]).unwrap();
    let c = Unit::new(2.0, [(&*KILOGRAM, 1), (&*SECOND, -1), (&*METER, 1), (&*SECOND, -1)]).unwrap();
    assert_eq!(a.constituents(), b.constituents());
    assert_eq!(a.constituents(), c.constituents());
    assert_eq!(a.canonical_form(), c.canonical_form());
}

#[test]
fn operators_match_explicit_terms() {
    let u = units();

    let ft_hr = (&u.foot * &u.hour).unwrap().unit().unwrap();
    let ft_hr_terms = Unit::new(1.0, [(&u.foot, 1), (&u.hour, 1)]).unwrap();
    assert_close(ft_hr.factor(), ft_hr_terms.factor());

    let ft_per_min2 = (&u.foot / &squared(&u.minute)).unwrap().unit().unwrap();
    let ft_per_min2_terms = Unit::new(1.0, [(&u.foot, 1), (&u.minute, -2)]).unwrap();
    assert_close(ft_per_min2.factor(), ft_per_min2_terms.factor());
    assert_eq!(ft_per_min2.constituents()[0].base(), &*SECOND);
    assert_eq!(ft_per_min2.constituents()[0].power(), &Power::from(-2));
    assert_eq!(ft_per_min2.constituents()[1].base(), &*METER);
    assert_eq!(ft_per_min2.constituents()[1].power(), &Power::from(1));

    let meter_per_second = (&*METER / &*SECOND).unwrap().unit().unwrap();
    assert!(meter_per_second.is_same_dimension(&(&u.foot / &u.hour).unwrap().unit().unwrap()));
    assert!(!meter_per_second.is_same_dimension(&ft_per_min2));

    let meter_second_squared = &*METER * &squared(&SECOND.to_unit());
    assert!(matches!(meter_second_squared, Ok(Product::Unit(_))));
}

#[test]
fn angles_share_the_radian_dimension() {
    let u = units();
    let radian = BaseUnit::unitless("rad");
    let degree = Unit::new(PI / 180.0, [(&radian, 1)]).unwrap().with_symbol("deg");
    let revolution = Unit::new(360.0, [(&degree, 1)]).unwrap().with_symbol("rev");
    assert_close(revolution.factor(), 2.0 * PI);
    assert!(radian.is_same_dimension(&revolution));

    let moisture_content = BaseUnit::unitless("con");
    assert!(!moisture_content.is_same_dimension(&radian.to_unit()));

    let radian_per_second = Unit::new(1.0, [Term::new(&radian, 1), Term::new(&*SECOND, -1)]).unwrap();
    let deg_per_minute = (&degree / &u.minute).unwrap().unit().unwrap();
    assert_close(deg_per_minute.factor(), PI / 180.0 / 60.0);
    assert!(radian_per_second.is_same_dimension(&deg_per_minute));

    let degree2 = (&deg_per_minute * &u.minute).unwrap().unit().unwrap();
    assert!(degree2.is_same_dimension(&degree));
    assert!(degree2.is_same_dimension(&radian));
    assert!(!degree2.is_same_dimension(&u.minute));
}

#[test]
fn force_over_newton_collapses_to_number() {
    init_tracing();
    let u = units();

    let apple_amount = 0.1 * &*KILOGRAM;
    let acceleration = (&*METER / &squared(&SECOND.to_unit())).unwrap().unit().unwrap();
    let apple_acceleration = 9.865 * &acceleration;

    let apple_force = (&apple_amount * &apple_acceleration)
        .unwrap()
        .into_measurement()
        .unwrap();
    assert_close(apple_force.magnitude(), 0.9865);
    assert!(apple_force.unit().is_same_dimension(&u.newton));

    let ratio = (&apple_force / &u.newton).unwrap();
    assert!(matches!(ratio, Value::Scalar(_)));
    assert_close(ratio.as_scalar().unwrap(), 0.9865);
}

#[test]
fn rational_powers_cancel_through_unit_algebra() {
    let cube_root = METER.pow(Power::ratio(1, 3).unwrap()).unwrap().unit().unwrap();
    let two_thirds = METER.pow(Power::ratio(2, 3).unwrap()).unwrap().unit().unwrap();

    let meter = (&cube_root * &two_thirds).unwrap().unit().unwrap();
    assert_eq!(meter, METER.to_unit());
    assert_eq!((&meter / &*METER).unwrap(), Product::Scalar(1.0));

    let liter = Unit::new(1e-3, [(&*METER, 3)]).unwrap();
    let edge = liter.pow(Power::ratio(1, 3).unwrap()).unwrap().unit().unwrap();
    assert_close(edge.factor(), 0.1);
    let ratio = (&(&edge * &cube_root).unwrap().unit().unwrap() / &two_thirds).unwrap();
    assert_close(ratio.scalar().unwrap(), 0.1);
}

#[test]
fn zero_power_leaves_a_number() {
    let u = units();
    assert_eq!(u.foot.pow(0).unwrap(), Product::Scalar(1.0));
    let length = 3.0 * &u.foot;
    assert_eq!(length.pow(0).unwrap(), Value::Scalar(1.0));
    assert_eq!(
        Value::from(u.foot.clone()).pow(&Value::from(0.0)).unwrap(),
        Value::Scalar(1.0)
    );
}

#[test]
fn addition_uses_left_operand_unit() {
    let u = units();
    let duration = (1.0 * &u.hour).add(&(20.0 * &u.minute)).unwrap();
    assert_close(duration.magnitude(), 1.3333333333333333);
    assert_eq!(duration.unit().symbol(), Some("hr"));
    assert_close(duration.magnitude_in(&u.minute).unwrap(), 80.0);
    assert_close(duration.to(&u.minute).unwrap().magnitude(), 80.0);
}

#[test]
fn mismatched_dimensions_are_rejected() {
    let u = units();
    let length = 3.0 * &u.foot;
    let time = 2.0 * &u.minute;

    let err = length.add(&time).unwrap_err();
    match err {
        UnitError::DimensionMismatch { left, right } => {
            assert_eq!(left, "(m, 1)");
            assert_eq!(right, "(s, 1)");
        }
        other => panic!("expected mismatch, got {other:?}"),
    }

    assert!(matches!(
        length.to(&*KILOGRAM),
        Err(UnitError::DimensionMismatch { .. })
    ));
}

#[test]
fn conversions_round_trip() {
    let u = units();
    let yard = Unit::new(3.0, [(&u.foot, 1)]).unwrap();
    let original = Measurement::new(12.5, &yard);

    for target in [&u.foot, &Unit::from(&*METER)] {
        let there = original.to(target).unwrap();
        let back = there.to(&yard).unwrap();
        assert_close(back.magnitude(), original.magnitude());
        assert!(back.approx_eq(&original, &Tolerance::default()));
    }
}

#[test]
fn registry_matches_direct_construction() {
    let u = units();
    let mut registry = UnitRegistry::with_si();
    registry.define("min", 60.0, [("s", 1)]).unwrap();
    registry.define("hr", 60.0, [("min", 1)]).unwrap();

    let hour = registry.resolve("hr").unwrap();
    assert_eq!(hour, u.hour);
}
