//! Compiled member access: the method invoke cache and the property get/set
//! caches.
//!
//! Each cache maps a descriptor key to a thunk built by the `ThunkCompiler`
//! on first use. After that, a call costs one map lookup plus the thunk's
//! pre-selected conversions.

use std::fmt;
use std::sync::OnceLock;

use fastmember_host::{FromValue, MethodInfo, MethodKey, ObjectRef, PropertyKey, Value};

use crate::compiler::{GetterThunk, MethodThunk, SetterThunk, ThunkCompiler};
use crate::config::AccessConfig;
use crate::errors::{instance_required, AccessResult};
use crate::expr::PropertyExpr;
use crate::once_map::{OnceMap, OnceMapStats};

/// Snapshot of the three caches and the compiler.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct AccessStats {
    pub methods: OnceMapStats,
    pub getters: OnceMapStats,
    pub setters: OnceMapStats,
    /// Thunks built, including those discarded after losing an insert race.
    pub compiled: usize,
}

/// Memoized invocation and property access.
pub struct MemberAccess {
    config: AccessConfig,
    compiler: ThunkCompiler,
    methods: OnceMap<MethodKey, MethodThunk>,
    getters: OnceMap<PropertyKey, GetterThunk>,
    setters: OnceMap<PropertyKey, SetterThunk>,
}

impl MemberAccess {
    pub fn new() -> Self {
        Self::with_config(AccessConfig::default())
    }

    pub fn with_config(config: AccessConfig) -> Self {
        MemberAccess {
            config,
            compiler: ThunkCompiler::new(),
            methods: OnceMap::new(),
            getters: OnceMap::new(),
            setters: OnceMap::new(),
        }
    }

    /// The process-wide instance, configured from the environment.
    pub fn global() -> &'static MemberAccess {
        static GLOBAL: OnceLock<MemberAccess> = OnceLock::new();
        GLOBAL.get_or_init(|| MemberAccess::with_config(AccessConfig::from_env()))
    }

    pub fn config(&self) -> &AccessConfig {
        &self.config
    }

    /// Call `method` on `instance` with `args` and extract the result as `R`.
    ///
    /// A missing instance is rejected before any compilation, for static
    /// methods too unless `static_requires_instance` is off.
    pub fn invoke<R: FromValue>(
        &self,
        method: &MethodInfo,
        instance: Option<&ObjectRef>,
        args: &[Value],
    ) -> AccessResult<R> {
        if instance.is_none() && (self.config.static_requires_instance || !method.is_static()) {
            return Err(instance_required());
        }

        let thunk = self.prepare_method(method);
        let result = thunk(instance, args)?;
        Ok(R::from_value(result)?)
    }

    /// The cached thunk for `method`, compiling it on a miss.
    pub fn prepare_method(&self, method: &MethodInfo) -> MethodThunk {
        self.methods
            .get_or_insert_with(method.key(), || self.compiler.compile_method(method))
    }

    /// Read the property named by `expr` from `instance`.
    pub fn get_value<V: FromValue>(
        &self,
        instance: &ObjectRef,
        expr: &PropertyExpr,
    ) -> AccessResult<V> {
        let property = expr.member()?;
        let thunk = self
            .getters
            .get_or_try_insert_with(property.key(), || self.compiler.compile_getter(property))?;
        Ok(V::from_value(thunk(instance)?)?)
    }

    /// Write `value` to the property named by `expr` on `instance`.
    pub fn set_value(
        &self,
        instance: &ObjectRef,
        expr: &PropertyExpr,
        value: impl Into<Value>,
    ) -> AccessResult<()> {
        let property = expr.member()?;
        let thunk = self
            .setters
            .get_or_try_insert_with(property.key(), || self.compiler.compile_setter(property))?;
        thunk(instance, value.into())
    }

    pub fn stats(&self) -> AccessStats {
        AccessStats {
            methods: self.methods.stats(),
            getters: self.getters.stats(),
            setters: self.setters.stats(),
            compiled: self.compiler.compiled(),
        }
    }
}

impl Default for MemberAccess {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MemberAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberAccess")
            .field("config", &self.config)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
