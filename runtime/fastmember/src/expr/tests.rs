use super::*;
use crate::test_helpers::gauge_type;

#[test]
fn test_direct_read_is_accepted() {
    let ty = gauge_type();
    let expr = PropertyExpr::of(&ty, "reading").unwrap();

    assert_eq!(expr.member().unwrap().name(), "reading");
}

#[test]
fn test_unknown_property_yields_none() {
    assert!(PropertyExpr::of(&gauge_type(), "missing").is_none());
}

#[test]
fn test_constant_body_is_rejected() {
    let expr = PropertyExpr::new(Expr::constant(1_i64));

    let err = expr.member().unwrap_err();
    assert!(err.is_invalid_argument());
    assert_eq!(
        err.to_string(),
        "invalid argument `property_expr`: invalid property expression"
    );
}

#[test]
fn test_bare_instance_is_rejected() {
    assert!(PropertyExpr::new(Expr::instance()).member().is_err());
}

#[test]
fn test_method_call_is_rejected() {
    let ty = gauge_type();
    let call = Expr::instance().call(ty.method("bump").unwrap(), vec![]);

    assert!(PropertyExpr::new(call).member().is_err());
}

#[test]
fn test_nested_member_read_is_rejected() {
    let ty = gauge_type();
    let reading = ty.property("reading").unwrap();
    let nested = Expr::instance().property(reading).property(reading);

    assert!(PropertyExpr::new(nested).member().is_err());
}

#[test]
fn test_member_read_of_constant_is_rejected() {
    let ty = gauge_type();
    let body = Expr::constant(3_i64).property(ty.property("id").unwrap());

    assert!(PropertyExpr::new(body).member().is_err());
}
