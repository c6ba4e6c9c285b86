use shaping::{hamacher_product, ShapingError};

fn grid() -> impl Iterator<Item = f64> {
    (0..=20).map(|i| f64::from(i) / 20.0)
}

#[test]
fn never_exceeds_either_operand() {
    for a in grid() {
        for b in grid() {
            let c = hamacher_product(a, b).unwrap();
            assert!(c <= a.min(b), "h({a}, {b}) = {c}");
            assert!(c >= 0.0);
        }
    }
}

#[test]
fn identities() {
    for x in grid() {
        assert_eq!(hamacher_product(x, 0.0).unwrap(), 0.0);
        assert_eq!(hamacher_product(0.0, x).unwrap(), 0.0);
        assert!((hamacher_product(x, 1.0).unwrap() - x).abs() < 1e-15);
    }
    assert_eq!(hamacher_product(0.0, 0.0).unwrap(), 0.0);
    assert_eq!(hamacher_product(1.0, 1.0).unwrap(), 1.0);
}

#[test]
fn commutative() {
    for a in grid() {
        for b in grid() {
            assert_eq!(hamacher_product(a, b).unwrap(), hamacher_product(b, a).unwrap());
        }
    }
}

#[test]
fn half_and_half() {
    // 0.25 / (1.0 - 0.25)
    let c = hamacher_product(0.5, 0.5).unwrap();
    assert!((c - 1.0 / 3.0).abs() < 1e-15);
}

#[test]
fn rejects_operands_outside_unit_interval() {
    assert_eq!(hamacher_product(1.5, 0.5), Err(ShapingError::OutOfUnitRange(1.5)));
    assert_eq!(hamacher_product(0.5, -0.1), Err(ShapingError::OutOfUnitRange(-0.1)));
    assert!(hamacher_product(f64::NAN, 0.5).is_err());
}
