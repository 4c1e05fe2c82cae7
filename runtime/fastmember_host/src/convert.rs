//! Value conversion to declared member types.
//!
//! Conversion rules are deliberately narrow: an exact type match passes,
//! `Any` accepts everything and `Int` widens to `Float`. Every other pairing
//! is a `ConversionError`.

use std::sync::Arc;

use crate::value::{ObjectRef, Value, ValueType};

/// A value could not be converted to the type a member declares.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    #[error("cannot convert {found} to {expected}")]
    Mismatch {
        expected: ValueType,
        found: ValueType,
    },
    #[error("expected {expected} argument(s), got {got}")]
    Arity { expected: usize, got: usize },
    #[error("instance of `{found}` is not a `{expected}`")]
    Instance {
        expected: Arc<str>,
        found: &'static str,
    },
    #[error("{value} is out of range for {target}")]
    OutOfRange { value: i64, target: &'static str },
}

/// Conversion routine selected once for a declared type.
pub type Converter = fn(&Value) -> Result<Value, ConversionError>;

/// Select the converter for a declared type.
///
/// The returned function performs no dispatch on `ty` when called.
pub fn converter_for(ty: ValueType) -> Converter {
    match ty {
        ValueType::Unit => to_unit,
        ValueType::Bool => to_bool,
        ValueType::Int => to_int,
        ValueType::Float => to_float,
        ValueType::Str => to_str,
        ValueType::Object => to_object,
        ValueType::Any => to_any,
    }
}

fn mismatch(expected: ValueType, value: &Value) -> ConversionError {
    ConversionError::Mismatch {
        expected,
        found: value.value_type(),
    }
}

fn to_unit(value: &Value) -> Result<Value, ConversionError> {
    match value {
        Value::Unit => Ok(Value::Unit),
        other => Err(mismatch(ValueType::Unit, other)),
    }
}

fn to_bool(value: &Value) -> Result<Value, ConversionError> {
    match value {
        Value::Bool(b) => Ok(Value::Bool(*b)),
        other => Err(mismatch(ValueType::Bool, other)),
    }
}

fn to_int(value: &Value) -> Result<Value, ConversionError> {
    match value {
        Value::Int(n) => Ok(Value::Int(*n)),
        other => Err(mismatch(ValueType::Int, other)),
    }
}

#[expect(
    clippy::cast_precision_loss,
    reason = "int to float widening is the documented conversion"
)]
fn to_float(value: &Value) -> Result<Value, ConversionError> {
    match value {
        Value::Float(x) => Ok(Value::Float(*x)),
        Value::Int(n) => Ok(Value::Float(*n as f64)),
        other => Err(mismatch(ValueType::Float, other)),
    }
}

fn to_str(value: &Value) -> Result<Value, ConversionError> {
    match value {
        Value::Str(s) => Ok(Value::Str(Arc::clone(s))),
        other => Err(mismatch(ValueType::Str, other)),
    }
}

fn to_object(value: &Value) -> Result<Value, ConversionError> {
    match value {
        Value::Object(obj) => Ok(Value::Object(obj.clone())),
        other => Err(mismatch(ValueType::Object, other)),
    }
}

fn to_any(value: &Value) -> Result<Value, ConversionError> {
    Ok(value.clone())
}

impl Value {
    /// Convert this value to a declared type, dispatching on `ty` per call.
    pub fn convert_to(&self, ty: ValueType) -> Result<Value, ConversionError> {
        converter_for(ty)(self)
    }
}

/// Typed extraction from a `Value`.
pub trait FromValue: Sized {
    /// Declared type that carries this Rust type.
    const VALUE_TYPE: ValueType;

    fn from_value(value: Value) -> Result<Self, ConversionError>;
}

impl FromValue for Value {
    const VALUE_TYPE: ValueType = ValueType::Any;

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        Ok(value)
    }
}

impl FromValue for () {
    const VALUE_TYPE: ValueType = ValueType::Unit;

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        to_unit(&value).map(|_| ())
    }
}

impl FromValue for bool {
    const VALUE_TYPE: ValueType = ValueType::Bool;

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(mismatch(ValueType::Bool, &other)),
        }
    }
}

impl FromValue for i64 {
    const VALUE_TYPE: ValueType = ValueType::Int;

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Int(n) => Ok(n),
            other => Err(mismatch(ValueType::Int, &other)),
        }
    }
}

impl FromValue for i32 {
    const VALUE_TYPE: ValueType = ValueType::Int;

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        let n = i64::from_value(value)?;
        i32::try_from(n).map_err(|_| ConversionError::OutOfRange {
            value: n,
            target: "i32",
        })
    }
}

impl FromValue for f64 {
    const VALUE_TYPE: ValueType = ValueType::Float;

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match to_float(&value)? {
            Value::Float(x) => Ok(x),
            other => Err(mismatch(ValueType::Float, &other)),
        }
    }
}

impl FromValue for Arc<str> {
    const VALUE_TYPE: ValueType = ValueType::Str;

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Str(s) => Ok(s),
            other => Err(mismatch(ValueType::Str, &other)),
        }
    }
}

impl FromValue for String {
    const VALUE_TYPE: ValueType = ValueType::Str;

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        Arc::<str>::from_value(value).map(|s| s.to_string())
    }
}

impl FromValue for ObjectRef {
    const VALUE_TYPE: ValueType = ValueType::Object;

    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Object(obj) => Ok(obj),
            other => Err(mismatch(ValueType::Object, &other)),
        }
    }
}

impl From<()> for Value {
    fn from((): ()) -> Self {
        Value::Unit
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<Arc<str>> for Value {
    fn from(s: Arc<str>) -> Self {
        Value::Str(s)
    }
}

impl From<ObjectRef> for Value {
    fn from(obj: ObjectRef) -> Self {
        Value::Object(obj)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
