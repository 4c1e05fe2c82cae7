//! Dynamic values exchanged with member bodies.
//!
//! `Value` is the uniform currency of the host: arguments, results and
//! property values all travel as `Value`. Instances live behind `ObjectRef`,
//! a shared handle that remembers the concrete Rust type it wraps.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

/// Declared type of a parameter, return value or property.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueType {
    Unit,
    Bool,
    Int,
    Float,
    Str,
    Object,
    /// Accepts any value without conversion.
    Any,
}

impl ValueType {
    pub const fn name(self) -> &'static str {
        match self {
            ValueType::Unit => "unit",
            ValueType::Bool => "bool",
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::Str => "str",
            ValueType::Object => "object",
            ValueType::Any => "any",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A runtime value.
#[derive(Clone, Debug)]
pub enum Value {
    Unit,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Arc<str>),
    Object(ObjectRef),
}

impl Value {
    /// Create a string value.
    pub fn string(s: impl Into<Arc<str>>) -> Self {
        Value::Str(s.into())
    }

    /// Wrap a host object.
    pub fn object<T: Any + Send + Sync>(value: T) -> Self {
        Value::Object(ObjectRef::new(value))
    }

    /// The declared type this value satisfies without conversion.
    pub const fn value_type(&self) -> ValueType {
        match self {
            Value::Unit => ValueType::Unit,
            Value::Bool(_) => ValueType::Bool,
            Value::Int(_) => ValueType::Int,
            Value::Float(_) => ValueType::Float,
            Value::Str(_) => ValueType::Str,
            Value::Object(_) => ValueType::Object,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Unit, Value::Unit) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unit => f.write_str("()"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::Object(obj) => write!(f, "<{}>", obj.type_name()),
        }
    }
}

/// Shared, lockable handle to a host object.
///
/// Cloning the handle shares the object. Typed access goes through
/// `with_ref` / `with_mut`, which return `None` when the object is not a `T`.
#[derive(Clone)]
pub struct ObjectRef {
    type_id: TypeId,
    type_name: &'static str,
    cell: Arc<RwLock<Box<dyn Any + Send + Sync>>>,
}

impl ObjectRef {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        ObjectRef {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            cell: Arc::new(RwLock::new(Box::new(value))),
        }
    }

    /// Concrete Rust type of the wrapped object.
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Run `f` with shared access to the object.
    pub fn with_ref<T: Any, R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        let guard = self.cell.read();
        (**guard).downcast_ref::<T>().map(f)
    }

    /// Run `f` with exclusive access to the object.
    pub fn with_mut<T: Any, R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let mut guard = self.cell.write();
        (**guard).downcast_mut::<T>().map(f)
    }

    /// Identity comparison: true when both handles share one object.
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Arc::ptr_eq(&self.cell, &other.cell)
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectRef")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
