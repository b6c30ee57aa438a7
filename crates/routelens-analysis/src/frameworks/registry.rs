//! Framework registry: name → adapter factory, with lazily built instances.
//!
//! Constructed once per process (or per test) and passed explicitly. The
//! instance cache is the only shared mutable state in the engine.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use routelens_core::errors::RegistryError;
use routelens_core::FxHashMap;

use super::adapter::Adapter;
use super::{NextJsAdapter, NuxtAdapter, ReactRouterAdapter, RemixAdapter, SvelteKitAdapter};

/// Builds a fresh adapter instance.
pub type AdapterFactory = Box<dyn Fn() -> Adapter + Send + Sync>;

pub struct FrameworkRegistry {
    factories: BTreeMap<String, AdapterFactory>,
    instances: Mutex<FxHashMap<String, Arc<Adapter>>>,
}

impl FrameworkRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
            instances: Mutex::new(FxHashMap::default()),
        }
    }

    /// Registry with every built-in adapter.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("sveltekit", || SvelteKitAdapter::new().into());
        registry.register("nextjs", || NextJsAdapter::new().into());
        registry.register("nuxt", || NuxtAdapter::new().into());
        registry.register("remix", || RemixAdapter::new().into());
        registry.register("react-router", || ReactRouterAdapter::new().into());
        registry
    }

    /// Register (or replace) a factory. Any cached instance under `name` is dropped.
    pub fn register<F>(&mut self, name: &str, factory: F)
    where
        F: Fn() -> Adapter + Send + Sync + 'static,
    {
        self.factories.insert(name.to_string(), Box::new(factory));
        self.lock_instances().remove(name);
    }

    /// The adapter registered under `name`, built on first use.
    pub fn get(&self, name: &str) -> Result<Arc<Adapter>, RegistryError> {
        let Some(factory) = self.factories.get(name) else {
            return Err(RegistryError::NotFound {
                name: name.to_string(),
                registered: self.names(),
            });
        };

        let mut instances = self.lock_instances();
        let adapter = instances
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(factory()));
        Ok(Arc::clone(adapter))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.factories.keys().cloned().collect()
    }

    /// Number of adapters built so far.
    pub fn instantiated(&self) -> usize {
        self.lock_instances().len()
    }

    fn lock_instances(&self) -> MutexGuard<'_, FxHashMap<String, Arc<Adapter>>> {
        // A panic while holding the lock cannot leave the map half-written.
        self.instances.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for FrameworkRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl std::fmt::Debug for FrameworkRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameworkRegistry")
            .field("names", &self.names())
            .field("instantiated", &self.instantiated())
            .finish()
    }
}
