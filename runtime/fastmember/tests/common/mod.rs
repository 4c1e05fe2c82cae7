//! Fixtures shared by the integration tests.

#![allow(dead_code, reason = "each test binary uses a subset")]

use std::sync::Arc;

use fastmember_host::{arg, Module, ModuleRef, ObjectRef, TypeBuilder, TypeRef, Value, ValueType};

/// Host type used throughout: one method and one read/write property.
pub struct Sample {
    pub name: String,
}

impl Sample {
    pub fn new() -> Self {
        Sample {
            name: "Initial".to_string(),
        }
    }
}

pub fn sample_type() -> TypeRef {
    TypeBuilder::<Sample>::new("fixtures.Sample")
        .method(
            "add",
            &[("a", ValueType::Int), ("b", ValueType::Int)],
            ValueType::Int,
            |_, args| Ok(Value::Int(arg::<i64>(args, 0)? + arg::<i64>(args, 1)?)),
        )
        .property(
            "name",
            |s: &Sample| s.name.clone(),
            |s, name: String| s.name = name,
        )
        .build()
}

pub fn sample() -> ObjectRef {
    ObjectRef::new(Sample::new())
}

pub fn sample_module() -> ModuleRef {
    Module::builder("fixtures").with_type(sample_type()).build()
}

/// A module declaring a single empty type under `full_name`.
pub fn marker_module<T: Send + Sync + 'static>(module: &str, full_name: &str) -> ModuleRef {
    Module::builder(module)
        .with_type(TypeBuilder::<T>::new(full_name).build())
        .build()
}

pub fn same_type(a: &TypeRef, b: &TypeRef) -> bool {
    Arc::ptr_eq(a, b)
}
