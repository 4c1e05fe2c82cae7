//! Member descriptors: methods, properties and their cache keys.
//!
//! A descriptor carries exactly what an accessor needs to reach the member:
//! declaring type, name, parameter/value types, staticness and the erased
//! body. Descriptors are immutable once built by a `TypeBuilder`.

use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;

use crate::convert::{ConversionError, FromValue};
use crate::value::{ObjectRef, Value, ValueType};

/// Error raised by code inside a member body.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct Fault {
    message: Arc<str>,
}

impl Fault {
    pub fn new(message: impl Into<Arc<str>>) -> Self {
        Fault {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Error from an erased member body.
///
/// Extraction and receiver failures raised by the erased wrapper stay
/// conversions; only what the member's own code raises is a `Fault`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MemberError {
    #[error(transparent)]
    Conversion(#[from] ConversionError),
    #[error(transparent)]
    Fault(#[from] Fault),
}

bitflags! {
    /// Capabilities and modifiers of a member.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct MemberFlags: u8 {
        const STATIC = 1 << 0;
        const READABLE = 1 << 1;
        const WRITABLE = 1 << 2;
    }
}

/// Erased method body: instance (absent for static calls) and arguments
/// already converted to the declared parameter types.
pub type MethodBody =
    Arc<dyn Fn(Option<&ObjectRef>, &[Value]) -> Result<Value, MemberError> + Send + Sync>;

/// Erased property read.
pub type PropertyGetter = Arc<dyn Fn(&ObjectRef) -> Result<Value, MemberError> + Send + Sync>;

/// Erased property write; the value is already converted to the declared
/// `ValueType`, but narrowing to the Rust field type may still fail.
pub type PropertySetter =
    Arc<dyn Fn(&ObjectRef, Value) -> Result<(), MemberError> + Send + Sync>;

/// Fetch and convert the argument at `index` inside a member body.
pub fn arg<V: FromValue>(args: &[Value], index: usize) -> Result<V, ConversionError> {
    let value = args.get(index).cloned().ok_or(ConversionError::Arity {
        expected: index.saturating_add(1),
        got: args.len(),
    })?;
    V::from_value(value)
}

/// Declared parameter of a method.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamInfo {
    pub name: Arc<str>,
    pub ty: ValueType,
}

impl ParamInfo {
    pub fn new(name: impl Into<Arc<str>>, ty: ValueType) -> Self {
        ParamInfo {
            name: name.into(),
            ty,
        }
    }
}

/// Cache key identifying one method of one declaring type.
///
/// Overloads differ by signature, so the parameter types and staticness are
/// part of the key.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct MethodKey {
    pub declaring: TypeId,
    pub declaring_name: Arc<str>,
    pub method_name: Arc<str>,
    pub signature: Arc<[ValueType]>,
    pub is_static: bool,
}

impl fmt::Display for MethodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}(", self.declaring_name, self.method_name)?;
        for (i, ty) in self.signature.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{ty}")?;
        }
        f.write_str(")")
    }
}

/// Cache key identifying one property of one declaring type.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct PropertyKey {
    pub declaring: TypeId,
    pub declaring_name: Arc<str>,
    pub property_name: Arc<str>,
    pub value_type: ValueType,
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.declaring_name, self.property_name)
    }
}

/// Descriptor of a method.
pub struct MethodInfo {
    key: MethodKey,
    params: Vec<ParamInfo>,
    return_type: ValueType,
    flags: MemberFlags,
    body: MethodBody,
}

impl MethodInfo {
    pub(crate) fn new(
        declaring: TypeId,
        declaring_name: Arc<str>,
        name: &str,
        params: Vec<ParamInfo>,
        return_type: ValueType,
        flags: MemberFlags,
        body: MethodBody,
    ) -> Self {
        let signature: Arc<[ValueType]> = params.iter().map(|p| p.ty).collect();
        MethodInfo {
            key: MethodKey {
                declaring,
                declaring_name,
                method_name: Arc::from(name),
                signature,
                is_static: flags.contains(MemberFlags::STATIC),
            },
            params,
            return_type,
            flags,
            body,
        }
    }

    #[inline]
    pub fn key(&self) -> &MethodKey {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.key.method_name
    }

    pub fn declaring_type(&self) -> TypeId {
        self.key.declaring
    }

    pub fn declaring_name(&self) -> &Arc<str> {
        &self.key.declaring_name
    }

    pub fn params(&self) -> &[ParamInfo] {
        &self.params
    }

    pub fn return_type(&self) -> ValueType {
        self.return_type
    }

    pub fn flags(&self) -> MemberFlags {
        self.flags
    }

    pub fn is_static(&self) -> bool {
        self.flags.contains(MemberFlags::STATIC)
    }

    /// The raw body. Arguments passed here must already match the declared
    /// parameter types.
    pub fn body(&self) -> &MethodBody {
        &self.body
    }
}

impl fmt::Debug for MethodInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodInfo")
            .field("key", &self.key)
            .field("return_type", &self.return_type)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

/// Descriptor of a property.
pub struct PropertyInfo {
    key: PropertyKey,
    flags: MemberFlags,
    getter: Option<PropertyGetter>,
    setter: Option<PropertySetter>,
}

impl PropertyInfo {
    pub(crate) fn new(
        declaring: TypeId,
        declaring_name: Arc<str>,
        name: &str,
        value_type: ValueType,
        getter: Option<PropertyGetter>,
        setter: Option<PropertySetter>,
    ) -> Self {
        let mut flags = MemberFlags::empty();
        flags.set(MemberFlags::READABLE, getter.is_some());
        flags.set(MemberFlags::WRITABLE, setter.is_some());
        PropertyInfo {
            key: PropertyKey {
                declaring,
                declaring_name,
                property_name: Arc::from(name),
                value_type,
            },
            flags,
            getter,
            setter,
        }
    }

    #[inline]
    pub fn key(&self) -> &PropertyKey {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.key.property_name
    }

    pub fn declaring_type(&self) -> TypeId {
        self.key.declaring
    }

    pub fn declaring_name(&self) -> &Arc<str> {
        &self.key.declaring_name
    }

    pub fn value_type(&self) -> ValueType {
        self.key.value_type
    }

    pub fn flags(&self) -> MemberFlags {
        self.flags
    }

    pub fn getter(&self) -> Option<&PropertyGetter> {
        self.getter.as_ref()
    }

    pub fn setter(&self) -> Option<&PropertySetter> {
        self.setter.as_ref()
    }
}

impl fmt::Debug for PropertyInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyInfo")
            .field("key", &self.key)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}
