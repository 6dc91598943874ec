use super::*;
use serde_json::json;

fn defs() -> Vec<ParamDef> {
    vec![
        ParamDef::int("frames", 3, 1, 30),
        ParamDef::float("gain", 0.5, 0.0, 1.0),
        ParamDef::flag("mirror", true),
    ]
}

fn raw(v: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
    v.as_object().cloned().unwrap()
}

#[test]
fn missing_values_take_defaults() {
    let p = ParamValues::resolve(&defs(), &raw(json!({}))).unwrap();
    assert_eq!(p.int("frames").unwrap(), 3);
    assert_eq!(p.float("gain").unwrap(), 0.5);
    assert!(p.flag("mirror").unwrap());
    assert_eq!(p, ParamValues::defaults(&defs()));
}

#[test]
fn explicit_values_override_defaults() {
    let p = ParamValues::resolve(
        &defs(),
        &raw(json!({"frames": 30, "gain": 1, "mirror": false})),
    )
    .unwrap();
    assert_eq!(p.u32("frames").unwrap(), 30);
    assert_eq!(p.float("gain").unwrap(), 1.0);
    assert!(!p.flag("mirror").unwrap());
}

#[test]
fn integral_floats_are_accepted_as_ints() {
    let p = ParamValues::resolve(&defs(), &raw(json!({"frames": 4.0}))).unwrap();
    assert_eq!(p.int("frames").unwrap(), 4);
}

#[test]
fn rejects_out_of_range_values() {
    let err = ParamValues::resolve(&defs(), &raw(json!({"frames": 31}))).unwrap_err();
    assert!(matches!(err, FxError::InvalidParam(_)));
    assert!(err.to_string().contains("frames"));
    let err = ParamValues::resolve(&defs(), &raw(json!({"gain": -0.1}))).unwrap_err();
    assert!(matches!(err, FxError::InvalidParam(_)));
}

#[test]
fn rejects_wrong_types_and_unknown_names() {
    for bad in [
        json!({"frames": 2.5}),
        json!({"frames": "2"}),
        json!({"mirror": 1}),
        json!({"gain": null}),
        json!({"speed": 1}),
    ] {
        let err = ParamValues::resolve(&defs(), &raw(bad.clone())).unwrap_err();
        assert!(matches!(err, FxError::InvalidParam(_)), "{bad}");
    }
}

#[test]
fn schema_serializes_with_snake_case_kinds() {
    let v = serde_json::to_value(ParamDef::flag("mirror", false)).unwrap();
    assert_eq!(v["kind"], "bool");
    assert_eq!(v["max"], 1.0);
}
