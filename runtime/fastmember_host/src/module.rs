//! Modules: units of code that declare types.
//!
//! Enumerating a module's types can fail partially (some declared types do
//! not load) or entirely (the module cannot be introspected). Both cases are
//! reported through `ModuleError` so callers decide what to keep.

use std::fmt;
use std::sync::Arc;

use crate::type_info::TypeRef;

/// Shared handle to a module.
pub type ModuleRef = Arc<Module>;

/// One declared type slot of a module.
#[derive(Clone)]
enum TypeSlot {
    Loaded(TypeRef),
    Failed { name: Arc<str>, reason: Arc<str> },
}

/// Why a module's types could not all be enumerated.
#[derive(Clone, Debug, thiserror::Error)]
pub enum ModuleError {
    #[error("module `{module}`: {} type(s) failed to load", .failures.len())]
    PartialLoad {
        module: Arc<str>,
        /// Types that did load, in declaration order.
        loaded: Vec<TypeRef>,
        /// Names and reasons of the types that did not.
        failures: Vec<(Arc<str>, Arc<str>)>,
    },
    #[error("module `{module}` cannot be introspected")]
    Opaque { module: Arc<str> },
}

/// A unit of code made available to the process.
pub struct Module {
    name: Arc<str>,
    slots: Vec<TypeSlot>,
    opaque: bool,
}

impl Module {
    pub fn builder(name: &str) -> ModuleBuilder {
        ModuleBuilder {
            name: Arc::from(name),
            slots: Vec::new(),
            opaque: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Enumerate the declared types.
    pub fn types(&self) -> Result<Vec<TypeRef>, ModuleError> {
        if self.opaque {
            return Err(ModuleError::Opaque {
                module: Arc::clone(&self.name),
            });
        }

        let mut loaded = Vec::with_capacity(self.slots.len());
        let mut failures = Vec::new();
        for slot in &self.slots {
            match slot {
                TypeSlot::Loaded(ty) => loaded.push(Arc::clone(ty)),
                TypeSlot::Failed { name, reason } => {
                    failures.push((Arc::clone(name), Arc::clone(reason)));
                }
            }
        }

        if failures.is_empty() {
            Ok(loaded)
        } else {
            Err(ModuleError::PartialLoad {
                module: Arc::clone(&self.name),
                loaded,
                failures,
            })
        }
    }
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Module")
            .field("name", &self.name)
            .field("slots", &self.slots.len())
            .field("opaque", &self.opaque)
            .finish()
    }
}

/// Builder for `Module`.
pub struct ModuleBuilder {
    name: Arc<str>,
    slots: Vec<TypeSlot>,
    opaque: bool,
}

impl ModuleBuilder {
    #[must_use]
    pub fn with_type(mut self, ty: TypeRef) -> Self {
        self.slots.push(TypeSlot::Loaded(ty));
        self
    }

    /// Declare a type that fails to load when enumerated.
    #[must_use]
    pub fn with_broken_type(mut self, name: &str, reason: &str) -> Self {
        self.slots.push(TypeSlot::Failed {
            name: Arc::from(name),
            reason: Arc::from(reason),
        });
        self
    }

    /// Mark the module as impossible to introspect.
    #[must_use]
    pub fn opaque(mut self) -> Self {
        self.opaque = true;
        self
    }

    pub fn build(self) -> ModuleRef {
        Arc::new(Module {
            name: self.name,
            slots: self.slots,
            opaque: self.opaque,
        })
    }
}
