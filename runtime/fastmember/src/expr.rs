//! Member-access expressions.
//!
//! A `PropertyExpr` is a one-parameter lambda over the instance, `|x| body`.
//! Property accessors accept only the direct member read `|x| x.prop`; any
//! other body shape is rejected when the accessor is requested.

use std::sync::Arc;

use fastmember_host::{MethodInfo, PropertyInfo, TypeInfo, Value};

use crate::errors::{invalid_property_expression, AccessResult};

/// Expression tree over a single instance parameter.
#[derive(Clone, Debug)]
pub enum Expr {
    /// The lambda's instance parameter.
    Instance,
    Constant(Value),
    Property {
        target: Box<Expr>,
        property: Arc<PropertyInfo>,
    },
    Call {
        target: Box<Expr>,
        method: Arc<MethodInfo>,
        args: Vec<Expr>,
    },
}

impl Expr {
    pub fn instance() -> Self {
        Expr::Instance
    }

    pub fn constant(value: impl Into<Value>) -> Self {
        Expr::Constant(value.into())
    }

    /// `self.property`
    #[must_use]
    pub fn property(self, property: &Arc<PropertyInfo>) -> Self {
        Expr::Property {
            target: Box::new(self),
            property: Arc::clone(property),
        }
    }

    /// `self.method(args..)`
    #[must_use]
    pub fn call(self, method: &Arc<MethodInfo>, args: Vec<Expr>) -> Self {
        Expr::Call {
            target: Box::new(self),
            method: Arc::clone(method),
            args,
        }
    }
}

/// Lambda `|instance| body` naming the property an accessor should reach.
#[derive(Clone, Debug)]
pub struct PropertyExpr {
    body: Expr,
}

impl PropertyExpr {
    pub fn new(body: Expr) -> Self {
        PropertyExpr { body }
    }

    /// The direct read `|x| x.property`.
    pub fn direct(property: &Arc<PropertyInfo>) -> Self {
        PropertyExpr::new(Expr::instance().property(property))
    }

    /// The direct read of the property `name` declared by `ty`.
    pub fn of(ty: &TypeInfo, name: &str) -> Option<Self> {
        ty.property(name).map(PropertyExpr::direct)
    }

    pub fn body(&self) -> &Expr {
        &self.body
    }

    /// The property read by this expression, if the body is a direct
    /// member read of the instance parameter.
    pub fn member(&self) -> AccessResult<&Arc<PropertyInfo>> {
        match &self.body {
            Expr::Property { target, property } if matches!(**target, Expr::Instance) => {
                Ok(property)
            }
            _ => Err(invalid_property_expression()),
        }
    }
}

impl From<&Arc<PropertyInfo>> for PropertyExpr {
    fn from(property: &Arc<PropertyInfo>) -> Self {
        PropertyExpr::direct(property)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
