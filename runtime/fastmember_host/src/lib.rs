//! Fastmember Host - the introspection model consumed by `fastmember`.
//!
//! This crate provides:
//! - Dynamic values and object handles (`Value`, `ValueType`, `ObjectRef`)
//! - Conversion to declared member types (`converter_for`, `FromValue`)
//! - Member and type descriptors (`MethodInfo`, `PropertyInfo`, `TypeInfo`)
//! - Typed registration of Rust types (`TypeBuilder`)
//! - Modules and the module-load notification stream (`Module`, `ModuleHost`)
//!
//! Nothing here caches: every call through a descriptor's raw body goes
//! through the erased, dynamically typed path.

mod convert;
mod host;
mod member;
mod module;
mod type_info;
mod value;

pub use convert::{converter_for, ConversionError, Converter, FromValue};
pub use host::{ModuleHost, ModuleLoadHandler, SubscriptionId};
pub use member::{
    arg, Fault, MemberError, MemberFlags, MethodBody, MethodInfo, MethodKey, ParamInfo,
    PropertyGetter, PropertyInfo, PropertyKey, PropertySetter,
};
pub use module::{Module, ModuleBuilder, ModuleError, ModuleRef};
pub use type_info::{TypeBuilder, TypeInfo, TypeRef};
pub use value::{ObjectRef, Value, ValueType};
