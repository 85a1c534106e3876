use ehm_core::EhmError;
use ehm_param::ElementStore;

#[test]
fn scale_and_clear_touch_every_element() {
    let mut store = ElementStore::from_values(vec![1.0, -2.0, 3.5]);
    store.scale(2.0);
    assert_eq!(store.as_slice(), &[2.0, -4.0, 7.0]);
    store.clear();
    assert_eq!(store.as_slice(), &[0.0, 0.0, 0.0]);
}

#[test]
fn square_then_sqrt_restores_magnitudes() {
    let mut store = ElementStore::from_values(vec![3.0, 4.0, 0.5]);
    store.square();
    assert_eq!(store.as_slice(), &[9.0, 16.0, 0.25]);
    store.sqrt();
    assert_eq!(store.as_slice(), &[3.0, 4.0, 0.5]);
}

#[test]
fn sqrt_of_negative_yields_nan() {
    let mut store = ElementStore::from_values(vec![-1.0]);
    store.sqrt();
    assert!(store.as_slice()[0].is_nan());
}

#[test]
fn add_and_multiply_are_element_wise() {
    let mut store = ElementStore::from_values(vec![1.0, 2.0, 3.0]);
    let other = ElementStore::from_values(vec![10.0, 20.0, 30.0]);
    store.add(&other).unwrap();
    assert_eq!(store.as_slice(), &[11.0, 22.0, 33.0]);
    store.multiply(&other).unwrap();
    assert_eq!(store.as_slice(), &[110.0, 440.0, 990.0]);
}

#[test]
fn add_scaled_applies_the_factor() {
    let mut store = ElementStore::from_values(vec![1.0, 1.0]);
    let other = ElementStore::from_values(vec![2.0, 4.0]);
    store.add_scaled(&other, 0.5).unwrap();
    assert_eq!(store.as_slice(), &[2.0, 3.0]);
}

#[test]
fn binary_length_mismatch_leaves_target_unchanged() {
    let mut store = ElementStore::from_values(vec![1.0, 2.0]);
    let other = ElementStore::from_values(vec![1.0, 2.0, 3.0]);
    let err = store.add(&other).unwrap_err();
    match &err {
        EhmError::IncompatibleOperand(info) => {
            assert_eq!(info.code, "length-mismatch");
            assert_eq!(info.context.get("expected").map(String::as_str), Some("2"));
            assert_eq!(info.context.get("actual").map(String::as_str), Some("3"));
        }
        other => panic!("expected IncompatibleOperand, got {other:?}"),
    }
    assert_eq!(store.as_slice(), &[1.0, 2.0]);
    assert!(store.multiply(&other).is_err());
    assert!(store.add_scaled(&other, 1.0).is_err());
    assert_eq!(store.as_slice(), &[1.0, 2.0]);
}

#[test]
fn fill_from_rejects_wrong_length_as_io_failure() {
    let mut store = ElementStore::zeroed(4);
    let err = store.fill_from(&[1.0, 2.0]).unwrap_err();
    match err {
        EhmError::IoFailure(info) => assert_eq!(info.code, "short-read"),
        other => panic!("expected IoFailure, got {other:?}"),
    }
    assert_eq!(store.as_slice(), &[0.0; 4]);
    store.fill_from(&[1.0, 2.0, 3.0, 4.0]).unwrap();
    assert_eq!(store.as_slice(), &[1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn get_is_bounds_checked() {
    let store = ElementStore::from_values(vec![7.0]);
    assert_eq!(store.get(0), Some(7.0));
    assert_eq!(store.get(1), None);
}
