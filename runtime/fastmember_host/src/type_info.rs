//! Type descriptors and typed registration.

use std::any::{Any, TypeId};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::convert::{ConversionError, FromValue};
use crate::member::{
    Fault, MemberError, MemberFlags, MethodBody, MethodInfo, ParamInfo, PropertyGetter,
    PropertyInfo, PropertySetter,
};
use crate::value::{ObjectRef, Value, ValueType};

/// Shared handle to a type descriptor.
pub type TypeRef = Arc<TypeInfo>;

/// Descriptor of a host type: its names and declared members.
pub struct TypeInfo {
    full_name: Option<Arc<str>>,
    name: Arc<str>,
    type_id: TypeId,
    methods: Vec<Arc<MethodInfo>>,
    properties: Vec<Arc<PropertyInfo>>,
}

impl TypeInfo {
    /// Fully qualified name, e.g. `fixtures.Sample`. Absent for types that
    /// have no stable qualified name.
    pub fn full_name(&self) -> Option<&str> {
        self.full_name.as_deref()
    }

    /// Unqualified simple name, e.g. `Sample`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn methods(&self) -> &[Arc<MethodInfo>] {
        &self.methods
    }

    pub fn properties(&self) -> &[Arc<PropertyInfo>] {
        &self.properties
    }

    /// First method with the given name.
    pub fn method(&self, name: &str) -> Option<&Arc<MethodInfo>> {
        self.methods.iter().find(|m| m.name() == name)
    }

    /// Method with the given name and exact parameter types.
    pub fn method_with(&self, name: &str, params: &[ValueType]) -> Option<&Arc<MethodInfo>> {
        self.methods
            .iter()
            .find(|m| m.name() == name && m.key().signature.as_ref() == params)
    }

    pub fn property(&self, name: &str) -> Option<&Arc<PropertyInfo>> {
        self.properties.iter().find(|p| p.name() == name)
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("full_name", &self.full_name)
            .field("name", &self.name)
            .field("methods", &self.methods.len())
            .field("properties", &self.properties.len())
            .finish()
    }
}

/// Derive the simple name from a qualified one: the segment after the last
/// `.`, `+` or `::`.
fn simple_name(full_name: &str) -> &str {
    full_name
        .rsplit(['.', '+', ':'])
        .next()
        .unwrap_or(full_name)
}

/// Typed builder for a `TypeInfo` describing Rust type `T`.
///
/// Member bodies receive `&T` / `&mut T` directly; the builder erases them
/// into the uniform descriptor signatures.
pub struct TypeBuilder<T> {
    full_name: Option<Arc<str>>,
    name: Arc<str>,
    methods: Vec<Arc<MethodInfo>>,
    properties: Vec<Arc<PropertyInfo>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Any + Send + Sync> TypeBuilder<T> {
    pub fn new(full_name: &str) -> Self {
        TypeBuilder {
            full_name: Some(Arc::from(full_name)),
            name: Arc::from(simple_name(full_name)),
            methods: Vec::new(),
            properties: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Drop the qualified name, keeping only the simple name.
    #[must_use]
    pub fn without_full_name(mut self) -> Self {
        self.full_name = None;
        self
    }

    fn display_name(&self) -> Arc<str> {
        self.full_name
            .clone()
            .unwrap_or_else(|| Arc::clone(&self.name))
    }

    fn push_method(
        &mut self,
        name: &str,
        params: &[(&str, ValueType)],
        ret: ValueType,
        flags: MemberFlags,
        body: MethodBody,
    ) {
        let params = params
            .iter()
            .map(|(param, ty)| ParamInfo::new(*param, *ty))
            .collect();
        let method = MethodInfo::new(
            TypeId::of::<T>(),
            self.display_name(),
            name,
            params,
            ret,
            flags,
            body,
        );
        self.methods.push(Arc::new(method));
    }

    /// Instance method with shared access to the receiver.
    #[must_use]
    pub fn method<F>(mut self, name: &str, params: &[(&str, ValueType)], ret: ValueType, f: F) -> Self
    where
        F: Fn(&T, &[Value]) -> Result<Value, MemberError> + Send + Sync + 'static,
    {
        let body: MethodBody = Arc::new(move |this: Option<&ObjectRef>, args: &[Value]| {
            let this = receiver::<T>(this)?;
            this.with_ref(|t: &T| f(t, args))
                .unwrap_or_else(|| Err(wrong_receiver::<T>(this).into()))
        });
        self.push_method(name, params, ret, MemberFlags::empty(), body);
        self
    }

    /// Instance method with exclusive access to the receiver.
    #[must_use]
    pub fn method_mut<F>(
        mut self,
        name: &str,
        params: &[(&str, ValueType)],
        ret: ValueType,
        f: F,
    ) -> Self
    where
        F: Fn(&mut T, &[Value]) -> Result<Value, MemberError> + Send + Sync + 'static,
    {
        let body: MethodBody = Arc::new(move |this: Option<&ObjectRef>, args: &[Value]| {
            let this = receiver::<T>(this)?;
            this.with_mut(|t: &mut T| f(t, args))
                .unwrap_or_else(|| Err(wrong_receiver::<T>(this).into()))
        });
        self.push_method(name, params, ret, MemberFlags::empty(), body);
        self
    }

    /// Static method; the body never sees an instance.
    #[must_use]
    pub fn static_method<F>(
        mut self,
        name: &str,
        params: &[(&str, ValueType)],
        ret: ValueType,
        f: F,
    ) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, MemberError> + Send + Sync + 'static,
    {
        let body: MethodBody = Arc::new(move |_: Option<&ObjectRef>, args: &[Value]| f(args));
        self.push_method(name, params, ret, MemberFlags::STATIC, body);
        self
    }

    /// Read/write property of type `V`.
    #[must_use]
    pub fn property<V, G, S>(mut self, name: &str, get: G, set: S) -> Self
    where
        V: FromValue + Into<Value> + 'static,
        G: Fn(&T) -> V + Send + Sync + 'static,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        let setter: PropertySetter = Arc::new(
            move |this: &ObjectRef, value: Value| -> Result<(), MemberError> {
                let value = V::from_value(value)?;
                this.with_mut(|t: &mut T| set(t, value))
                    .ok_or_else(|| wrong_receiver::<T>(this).into())
            },
        );
        let property = PropertyInfo::new(
            TypeId::of::<T>(),
            self.display_name(),
            name,
            V::VALUE_TYPE,
            Some(erase_getter(get)),
            Some(setter),
        );
        self.properties.push(Arc::new(property));
        self
    }

    /// Property of type `V` without a setter.
    #[must_use]
    pub fn readonly_property<V, G>(mut self, name: &str, get: G) -> Self
    where
        V: FromValue + Into<Value> + 'static,
        G: Fn(&T) -> V + Send + Sync + 'static,
    {
        let property = PropertyInfo::new(
            TypeId::of::<T>(),
            self.display_name(),
            name,
            V::VALUE_TYPE,
            Some(erase_getter(get)),
            None,
        );
        self.properties.push(Arc::new(property));
        self
    }

    pub fn build(self) -> TypeRef {
        Arc::new(TypeInfo {
            full_name: self.full_name,
            name: self.name,
            type_id: TypeId::of::<T>(),
            methods: self.methods,
            properties: self.properties,
        })
    }
}

fn erase_getter<T, V, G>(get: G) -> PropertyGetter
where
    T: Any,
    V: Into<Value>,
    G: Fn(&T) -> V + Send + Sync + 'static,
{
    Arc::new(move |this: &ObjectRef| -> Result<Value, MemberError> {
        this.with_ref(|t: &T| get(t).into())
            .ok_or_else(|| wrong_receiver::<T>(this).into())
    })
}

fn receiver<T>(this: Option<&ObjectRef>) -> Result<&ObjectRef, Fault> {
    this.ok_or_else(|| {
        Fault::new(format!(
            "instance method of `{}` called without an instance",
            std::any::type_name::<T>()
        ))
    })
}

fn wrong_receiver<T>(this: &ObjectRef) -> ConversionError {
    ConversionError::Instance {
        expected: Arc::from(std::any::type_name::<T>()),
        found: this.type_name(),
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
