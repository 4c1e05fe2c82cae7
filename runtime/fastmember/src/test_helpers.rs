//! Shared fixtures for unit tests.

#![allow(clippy::unwrap_used)]

use fastmember_host::{arg, Fault, ObjectRef, TypeBuilder, TypeRef, Value, ValueType};

/// Small host type covering every member shape.
pub struct Gauge {
    pub reading: f64,
    pub id: i64,
    pub bumps: i64,
    pub level: i32,
}

pub fn gauge_type() -> TypeRef {
    TypeBuilder::<Gauge>::new("tests.Gauge")
        .method(
            "scaled",
            &[("factor", ValueType::Float)],
            ValueType::Float,
            |g, args| Ok(Value::Float(g.reading * arg::<f64>(args, 0)?)),
        )
        .method_mut("bump", &[], ValueType::Int, |g, _| {
            g.bumps += 1;
            Ok(Value::Int(g.bumps))
        })
        .method("fail", &[], ValueType::Unit, |_, _| {
            Err(Fault::new("gauge offline").into())
        })
        // Declared as int but yields a string, so result conversion fails.
        .method("label", &[], ValueType::Int, |g, _| {
            Ok(Value::string(format!("gauge-{}", g.id)))
        })
        .static_method("zero", &[], ValueType::Float, |_| Ok(Value::Float(0.0)))
        .property("reading", |g: &Gauge| g.reading, |g, v| g.reading = v)
        .readonly_property("id", |g: &Gauge| g.id)
        .property("level", |g: &Gauge| g.level, |g, v| g.level = v)
        .build()
}

pub fn gauge(reading: f64) -> ObjectRef {
    ObjectRef::new(Gauge {
        reading,
        id: 7,
        bumps: 0,
        level: 0,
    })
}
