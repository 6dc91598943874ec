use super::*;

fn all_params() -> impl Iterator<Item = i64> {
    [-50i64, -25, -1, 0, 1, 25, 50].into_iter()
}

#[test]
fn endpoints_are_stable() {
    for p in all_params() {
        let ease = Ease::from_param(p);
        assert_eq!(ease.apply(0.0), 0.0);
        assert_eq!(ease.apply(1.0), 1.0);
    }
}

#[test]
fn monotonic_spot_check() {
    for p in all_params() {
        let ease = Ease::from_param(p);
        let a = ease.apply(0.25);
        let b = ease.apply(0.5);
        let c = ease.apply(0.75);
        assert!(a < b);
        assert!(b < c);
    }
}

#[test]
fn sign_selects_direction() {
    assert_eq!(Ease::from_param(0), Ease::Linear);
    // p = 25 -> 1 - (1 - t)^2
    assert!((Ease::from_param(25).apply(0.5) - 0.75).abs() < 1e-12);
    // p = -25 -> t^2
    assert!((Ease::from_param(-25).apply(0.5) - 0.25).abs() < 1e-12);
}

#[test]
fn out_of_range_params_are_clamped() {
    assert_eq!(Ease::from_param(500), Ease::from_param(50));
    assert_eq!(Ease::from_param(-500), Ease::from_param(-50));
}

#[test]
fn default_is_linear() {
    assert_eq!(Ease::default(), Ease::Linear);
    assert_eq!(Ease::default(), Ease::from_param(0));
}
