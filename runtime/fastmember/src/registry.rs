//! Name-to-type registry fed by module-load notifications.
//!
//! The registry subscribes to its `ModuleHost` and records every type with a
//! full name as modules become available. Lookups that miss fall back to a
//! scan of all modules currently loaded, which also reaches types from
//! modules loaded before the registry attached and types named by their
//! simple name.
//!
//! Entries are never removed or replaced: the first type registered under a
//! full name keeps it.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use fastmember_host::{ModuleError, ModuleHost, ModuleRef, SubscriptionId, TypeRef};

use crate::config::RegistryConfig;
use crate::once_map::OnceMap;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RegistryStats {
    /// Types cached under their full name.
    pub entries: usize,
    /// Lookups that missed the cache and scanned the host's modules.
    pub fallback_scans: u64,
    /// Scans that found nothing.
    pub unresolved: u64,
}

pub struct TypeRegistry {
    host: Arc<ModuleHost>,
    config: RegistryConfig,
    entries: OnceMap<Arc<str>, TypeRef>,
    subscription: OnceLock<SubscriptionId>,
    fallback_scans: AtomicU64,
    unresolved: AtomicU64,
}

impl TypeRegistry {
    /// Attach a registry to `host` with the default configuration.
    pub fn attach(host: &Arc<ModuleHost>) -> Arc<Self> {
        Self::with_config(host, RegistryConfig::default())
    }

    pub fn with_config(host: &Arc<ModuleHost>, config: RegistryConfig) -> Arc<Self> {
        let registry = Arc::new(TypeRegistry {
            host: Arc::clone(host),
            config,
            entries: OnceMap::new(),
            subscription: OnceLock::new(),
            fallback_scans: AtomicU64::new(0),
            unresolved: AtomicU64::new(0),
        });

        // The host must not keep the registry alive.
        let weak = Arc::downgrade(&registry);
        let id = host.subscribe(move |module: &ModuleRef| {
            if let Some(registry) = weak.upgrade() {
                registry.register_module(module);
            }
        });
        let _ = registry.subscription.set(id);

        // Subscribe first: a module loading in between is seen at least once,
        // and registering it twice is harmless.
        if registry.config.seed_on_attach {
            for module in host.modules() {
                registry.register_module(&module);
            }
        }

        registry
    }

    /// The process-wide registry, attached to `ModuleHost::global()`.
    pub fn global() -> &'static Arc<TypeRegistry> {
        static GLOBAL: OnceLock<Arc<TypeRegistry>> = OnceLock::new();
        GLOBAL.get_or_init(|| {
            TypeRegistry::with_config(ModuleHost::global(), RegistryConfig::from_env())
        })
    }

    pub fn host(&self) -> &Arc<ModuleHost> {
        &self.host
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Find a type by full name, or by simple name through the fallback scan.
    ///
    /// A type found by scanning is cached under its full name. If another
    /// thread cached a different type under that name first, that type is
    /// returned instead.
    pub fn resolve(&self, name: &str) -> Option<TypeRef> {
        if let Some(hit) = self.entries.get(name) {
            tracing::trace!(name, "type cache hit");
            return Some(hit);
        }

        self.fallback_scans.fetch_add(1, Ordering::Relaxed);
        let Some(found) = self.scan(name) else {
            self.unresolved.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(name, "fallback scan found no type");
            return None;
        };

        tracing::debug!(name, found = found.name(), "fallback scan resolved type");
        match found.full_name() {
            Some(full_name) => Some(self.entries.insert_if_absent(Arc::from(full_name), found).0),
            None => Some(found),
        }
    }

    /// The type cached under `full_name`, without scanning.
    pub fn cached(&self, full_name: &str) -> Option<TypeRef> {
        self.entries.get(full_name)
    }

    /// Record every named type `module` can enumerate. Returns how many
    /// names were newly bound.
    pub fn register_module(&self, module: &ModuleRef) -> usize {
        let mut added = 0;
        for ty in loadable_types(module) {
            let Some(full_name) = ty.full_name() else {
                tracing::trace!(
                    module = module.name(),
                    name = ty.name(),
                    "skipping type without a full name"
                );
                continue;
            };
            if self.entries.contains_key(full_name) {
                continue;
            }
            if self.entries.insert_if_absent(Arc::from(full_name), Arc::clone(&ty)).1 {
                added += 1;
            }
        }

        tracing::debug!(module = module.name(), added, "module registered");
        added
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            entries: self.entries.len(),
            fallback_scans: self.fallback_scans.load(Ordering::Relaxed),
            unresolved: self.unresolved.load(Ordering::Relaxed),
        }
    }

    /// Single pass over the loaded modules in load order. The first type
    /// whose full name or simple name equals `name` wins.
    fn scan(&self, name: &str) -> Option<TypeRef> {
        self.host.modules().iter().find_map(|module| {
            loadable_types(module)
                .into_iter()
                .find(|ty| ty.full_name() == Some(name) || ty.name() == name)
        })
    }
}

impl Drop for TypeRegistry {
    fn drop(&mut self) {
        if let Some(id) = self.subscription.get() {
            self.host.unsubscribe(*id);
        }
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("config", &self.config)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

/// The types of `module` that load. Types that fail to load are skipped, and
/// a module that cannot be introspected contributes nothing.
fn loadable_types(module: &ModuleRef) -> Vec<TypeRef> {
    match module.types() {
        Ok(types) => types,
        Err(ModuleError::PartialLoad {
            loaded, failures, ..
        }) => {
            tracing::trace!(
                module = module.name(),
                loaded = loaded.len(),
                failed = failures.len(),
                "partial module load"
            );
            loaded
        }
        Err(err @ ModuleError::Opaque { .. }) => {
            tracing::trace!(module = module.name(), %err, "skipping module");
            Vec::new()
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
