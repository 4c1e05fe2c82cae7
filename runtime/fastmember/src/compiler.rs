//! Thunk compiler: turns a member descriptor into a directly callable closure.
//!
//! Compilation resolves everything a call would otherwise rediscover from the
//! descriptor on every invocation: the converter for each declared parameter,
//! the result converter, the receiver check and the raw body. The resulting
//! thunk only runs those pre-selected steps.
//!
//! Thunks are pure functions of their descriptor. Compiling the same
//! descriptor twice yields behaviorally identical closures, which is what
//! makes redundant compilation under a cache race harmless.

use std::any::TypeId;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use fastmember_host::{
    converter_for, ConversionError, Converter, MethodInfo, ObjectRef, PropertyInfo, Value,
};
use smallvec::SmallVec;

use crate::errors::{
    instance_required, property_not_readable, property_not_writable, AccessError, AccessResult,
};

/// Compiled method call: instance (ignored for static methods) and
/// positional arguments in, converted result out.
pub type MethodThunk = Arc<dyn Fn(Option<&ObjectRef>, &[Value]) -> AccessResult<Value> + Send + Sync>;

/// Compiled property read.
pub type GetterThunk = Arc<dyn Fn(&ObjectRef) -> AccessResult<Value> + Send + Sync>;

/// Compiled property write.
pub type SetterThunk = Arc<dyn Fn(&ObjectRef, Value) -> AccessResult<()> + Send + Sync>;

/// Builds thunks and counts how many it has built.
#[derive(Debug, Default)]
pub struct ThunkCompiler {
    compiled: AtomicUsize,
}

impl ThunkCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of thunks built so far.
    pub fn compiled(&self) -> usize {
        self.compiled.load(Ordering::Relaxed)
    }

    pub fn compile_method(&self, method: &MethodInfo) -> MethodThunk {
        let params: Box<[Converter]> = method
            .params()
            .iter()
            .map(|param| converter_for(param.ty))
            .collect();
        let convert_result = converter_for(method.return_type());
        let body = Arc::clone(method.body());
        let receiver = Receiver::of_method(method);

        self.compiled.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(
            method = %method.key(),
            params = params.len(),
            is_static = method.is_static(),
            "compiled method thunk"
        );

        Arc::new(move |instance: Option<&ObjectRef>, args: &[Value]| {
            if args.len() != params.len() {
                return Err(ConversionError::Arity {
                    expected: params.len(),
                    got: args.len(),
                }
                .into());
            }

            let target = match &receiver {
                None => None,
                Some(receiver) => {
                    let instance = instance.ok_or_else(instance_required)?;
                    receiver.check(instance)?;
                    Some(instance)
                }
            };

            let converted = params
                .iter()
                .zip(args)
                .map(|(convert, arg)| convert(arg))
                .collect::<Result<SmallVec<[Value; 4]>, _>>()?;

            let result = body(target, &converted)?;
            Ok(convert_result(&result)?)
        })
    }

    pub fn compile_getter(&self, property: &PropertyInfo) -> AccessResult<GetterThunk> {
        let getter = property
            .getter()
            .cloned()
            .ok_or_else(|| property_not_readable(property.key()))?;
        let convert = converter_for(property.value_type());
        let receiver = Receiver::of_property(property);

        self.compiled.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(property = %property.key(), "compiled getter thunk");

        Ok(Arc::new(move |instance: &ObjectRef| {
            receiver.check(instance)?;
            let value = getter(instance)?;
            Ok(convert(&value)?)
        }))
    }

    pub fn compile_setter(&self, property: &PropertyInfo) -> AccessResult<SetterThunk> {
        let setter = property
            .setter()
            .cloned()
            .ok_or_else(|| property_not_writable(property.key()))?;
        let convert = converter_for(property.value_type());
        let receiver = Receiver::of_property(property);

        self.compiled.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(property = %property.key(), "compiled setter thunk");

        Ok(Arc::new(move |instance: &ObjectRef, value: Value| {
            receiver.check(instance)?;
            let value = convert(&value)?;
            setter(instance, value).map_err(AccessError::from)
        }))
    }
}

/// Expected concrete type of the instance a thunk operates on.
struct Receiver {
    type_id: TypeId,
    name: Arc<str>,
}

impl Receiver {
    /// `None` for static methods: their instance is a placeholder.
    fn of_method(method: &MethodInfo) -> Option<Self> {
        (!method.is_static()).then(|| Receiver {
            type_id: method.declaring_type(),
            name: Arc::clone(method.declaring_name()),
        })
    }

    fn of_property(property: &PropertyInfo) -> Self {
        Receiver {
            type_id: property.declaring_type(),
            name: Arc::clone(property.declaring_name()),
        }
    }

    #[inline]
    fn check(&self, instance: &ObjectRef) -> Result<(), ConversionError> {
        if instance.type_id() == self.type_id {
            Ok(())
        } else {
            Err(ConversionError::Instance {
                expected: Arc::clone(&self.name),
                found: instance.type_name(),
            })
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
