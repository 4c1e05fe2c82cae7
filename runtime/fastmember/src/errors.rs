//! Error taxonomy of the accessor caches.
//!
//! Every failure reaches the immediate caller synchronously. Nothing is
//! retried or logged here; recovery belongs to the embedding application.

use fastmember_host::{ConversionError, Fault, MemberError};

/// Result of an accessor operation.
pub type AccessResult<T> = Result<T, AccessError>;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    /// Malformed request: a property expression that is not a direct member
    /// read, a missing instance, or a property lacking the requested accessor.
    #[error("invalid argument `{param}`: {message}")]
    InvalidArgument {
        param: &'static str,
        message: String,
    },
    /// An argument, result or instance did not match the member's declared
    /// types. Raised when a thunk runs, never when it is built.
    #[error(transparent)]
    Conversion(#[from] ConversionError),
    /// Fault raised by the member body, carried as raised.
    #[error(transparent)]
    Target(Fault),
}

impl AccessError {
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, AccessError::InvalidArgument { .. })
    }

    /// The member body's fault, if this error carries one.
    pub fn fault(&self) -> Option<&Fault> {
        match self {
            AccessError::Target(fault) => Some(fault),
            _ => None,
        }
    }
}

impl From<MemberError> for AccessError {
    fn from(err: MemberError) -> Self {
        match err {
            MemberError::Conversion(err) => AccessError::Conversion(err),
            MemberError::Fault(fault) => AccessError::Target(fault),
        }
    }
}

// Constructors

pub fn instance_required() -> AccessError {
    AccessError::InvalidArgument {
        param: "instance",
        message: "instance required".to_string(),
    }
}

pub fn invalid_property_expression() -> AccessError {
    AccessError::InvalidArgument {
        param: "property_expr",
        message: "invalid property expression".to_string(),
    }
}

pub fn property_not_readable(property: impl std::fmt::Display) -> AccessError {
    AccessError::InvalidArgument {
        param: "property_expr",
        message: format!("property `{property}` has no getter"),
    }
}

pub fn property_not_writable(property: impl std::fmt::Display) -> AccessError {
    AccessError::InvalidArgument {
        param: "property_expr",
        message: format!("property `{property}` has no setter"),
    }
}
