//! Fastmember - memoized reflective member access.
//!
//! Calling a method or touching a property through a descriptor is slow on
//! the generic path: every call re-checks parameter types and converts
//! arguments without knowing what to expect. This crate compiles each
//! member once into a thunk with its conversions pre-selected, caches the
//! thunk by descriptor key and reuses it for every later call.
//!
//! This crate provides:
//! - `MemberAccess`: the method invoke cache and property get/set caches
//! - `TypeRegistry`: name-to-type resolution fed by module-load
//!   notifications, with a fallback scan on a miss
//! - `PropertyExpr`: the `|x| x.prop` expressions naming a property
//! - Free functions over the process-wide instances
//!
//! # Debug Environment Variables
//!
//! - `RUST_LOG=fastmember=debug`: thunk compilation, module registration
//!   and fallback scans (after calling `init_tracing`).
//! - `RUST_LOG=fastmember=trace`: also registry cache hits and skipped
//!   types.
//! - `FASTMEMBER_STATIC_REQUIRES_INSTANCE=0`: allow static methods to be
//!   invoked without an instance.
//! - `FASTMEMBER_SEED_REGISTRY=0`: do not scan already loaded modules when
//!   the global registry attaches.

mod access;
mod compiler;
mod config;
mod errors;
mod expr;
mod once_map;
mod registry;

#[cfg(test)]
mod test_helpers;

use std::sync::Once;

pub use access::{AccessStats, MemberAccess};
pub use compiler::{GetterThunk, MethodThunk, SetterThunk, ThunkCompiler};
pub use config::{AccessConfig, RegistryConfig, SEED_REGISTRY_VAR, STATIC_REQUIRES_INSTANCE_VAR};
pub use errors::{
    instance_required, invalid_property_expression, property_not_readable,
    property_not_writable, AccessError, AccessResult,
};
pub use expr::{Expr, PropertyExpr};
pub use once_map::{OnceMap, OnceMapStats};
pub use registry::{RegistryStats, TypeRegistry};

use fastmember_host::{FromValue, MethodInfo, ObjectRef, TypeRef, Value};

/// Invoke `method` through the process-wide cache.
pub fn invoke<R: FromValue>(
    method: &MethodInfo,
    instance: Option<&ObjectRef>,
    args: &[Value],
) -> AccessResult<R> {
    MemberAccess::global().invoke(method, instance, args)
}

/// Read a property through the process-wide getter cache.
pub fn get_value<V: FromValue>(instance: &ObjectRef, expr: &PropertyExpr) -> AccessResult<V> {
    MemberAccess::global().get_value(instance, expr)
}

/// Write a property through the process-wide setter cache.
pub fn set_value(
    instance: &ObjectRef,
    expr: &PropertyExpr,
    value: impl Into<Value>,
) -> AccessResult<()> {
    MemberAccess::global().set_value(instance, expr, value)
}

/// Resolve a type name through the process-wide registry.
pub fn resolve_type(name: &str) -> Option<TypeRef> {
    TypeRegistry::global().resolve(name)
}

static TRACING_INIT: Once = Once::new();

/// Initialize tracing subscriber for debug output.
///
/// Call this early (e.g., in main or test setup) to enable tracing.
/// Controlled by `RUST_LOG` environment variable; does nothing if it is
/// unset or a global subscriber is already installed.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .try_init();
        }
    });
}
