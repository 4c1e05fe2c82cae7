use pretty_assertions::assert_eq;

use super::*;
use fastmember_host::Fault;
use crate::test_helpers::{gauge, gauge_type, Gauge};

#[test]
fn test_method_thunk_converts_args_and_result() {
    let ty = gauge_type();
    let compiler = ThunkCompiler::new();
    let thunk = compiler.compile_method(ty.method("scaled").unwrap());

    // Int argument widens to the declared float parameter.
    let result = thunk(Some(&gauge(1.5)), &[Value::Int(4)]).unwrap();

    assert_eq!(result, Value::Float(6.0));
    assert_eq!(compiler.compiled(), 1);
}

#[test]
fn test_method_thunk_rejects_wrong_arity() {
    let ty = gauge_type();
    let thunk = ThunkCompiler::new().compile_method(ty.method("scaled").unwrap());

    let err = thunk(Some(&gauge(1.0)), &[]).unwrap_err();

    assert_eq!(
        err,
        AccessError::Conversion(ConversionError::Arity {
            expected: 1,
            got: 0
        })
    );
}

#[test]
fn test_method_thunk_rejects_unconvertible_argument() {
    let ty = gauge_type();
    let thunk = ThunkCompiler::new().compile_method(ty.method("scaled").unwrap());

    let err = thunk(Some(&gauge(1.0)), &[Value::string("two")]).unwrap_err();

    assert!(matches!(
        err,
        AccessError::Conversion(ConversionError::Mismatch { .. })
    ));
}

#[test]
fn test_method_thunk_rejects_foreign_receiver() {
    let ty = gauge_type();
    let thunk = ThunkCompiler::new().compile_method(ty.method("scaled").unwrap());
    let stranger = ObjectRef::new(String::from("not a gauge"));

    let err = thunk(Some(&stranger), &[Value::Float(1.0)]).unwrap_err();

    assert!(matches!(
        err,
        AccessError::Conversion(ConversionError::Instance { .. })
    ));
}

#[test]
fn test_instance_method_without_instance_is_invalid_argument() {
    let ty = gauge_type();
    let thunk = ThunkCompiler::new().compile_method(ty.method("bump").unwrap());

    let err = thunk(None, &[]).unwrap_err();

    assert_eq!(err, instance_required());
}

#[test]
fn test_static_thunk_ignores_instance() {
    let ty = gauge_type();
    let thunk = ThunkCompiler::new().compile_method(ty.method("zero").unwrap());
    let stranger = ObjectRef::new(0_u8);

    assert_eq!(thunk(None, &[]).unwrap(), Value::Float(0.0));
    assert_eq!(thunk(Some(&stranger), &[]).unwrap(), Value::Float(0.0));
}

#[test]
fn test_body_fault_is_carried_unchanged() {
    let ty = gauge_type();
    let thunk = ThunkCompiler::new().compile_method(ty.method("fail").unwrap());

    let err = thunk(Some(&gauge(0.0)), &[]).unwrap_err();

    assert_eq!(err.fault().map(Fault::message), Some("gauge offline"));
}

#[test]
fn test_result_conversion_failure() {
    let ty = gauge_type();
    let thunk = ThunkCompiler::new().compile_method(ty.method("label").unwrap());

    let err = thunk(Some(&gauge(0.0)), &[]).unwrap_err();

    assert!(matches!(err, AccessError::Conversion(_)));
}

#[test]
fn test_mutating_method_observes_state() {
    let ty = gauge_type();
    let thunk = ThunkCompiler::new().compile_method(ty.method("bump").unwrap());
    let target = gauge(0.0);

    thunk(Some(&target), &[]).unwrap();
    let second = thunk(Some(&target), &[]).unwrap();

    assert_eq!(second, Value::Int(2));
    assert_eq!(target.with_ref(|g: &Gauge| g.bumps), Some(2));
}

#[test]
fn test_getter_and_setter_thunks() {
    let ty = gauge_type();
    let compiler = ThunkCompiler::new();
    let reading = ty.property("reading").unwrap();
    let get = compiler.compile_getter(reading).unwrap();
    let set = compiler.compile_setter(reading).unwrap();
    let target = gauge(2.5);

    assert_eq!(get(&target).unwrap(), Value::Float(2.5));
    set(&target, Value::Int(9)).unwrap();
    assert_eq!(get(&target).unwrap(), Value::Float(9.0));
    assert_eq!(compiler.compiled(), 2);
}

#[test]
fn test_setter_rejects_unconvertible_value() {
    let ty = gauge_type();
    let set = ThunkCompiler::new()
        .compile_setter(ty.property("reading").unwrap())
        .unwrap();

    let err = set(&gauge(1.0), Value::Bool(true)).unwrap_err();

    assert!(matches!(err, AccessError::Conversion(_)));
}

#[test]
fn test_setter_narrowing_is_conversion_not_fault() {
    let ty = gauge_type();
    let set = ThunkCompiler::new()
        .compile_setter(ty.property("level").unwrap())
        .unwrap();
    let target = gauge(0.0);

    let err = set(&target, Value::Int(1 << 40)).unwrap_err();

    assert_eq!(
        err,
        AccessError::Conversion(ConversionError::OutOfRange {
            value: 1 << 40,
            target: "i32",
        })
    );
    assert_eq!(target.with_ref(|g: &Gauge| g.level), Some(0));
}

#[test]
fn test_missing_setter_fails_at_build() {
    let ty = gauge_type();
    let compiler = ThunkCompiler::new();

    let err = compiler
        .compile_setter(ty.property("id").unwrap())
        .err()
        .unwrap();

    assert!(err.is_invalid_argument());
    assert_eq!(compiler.compiled(), 0);
}
