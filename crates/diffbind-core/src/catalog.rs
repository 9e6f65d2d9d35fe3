//! Runtime lookup of generated comparison engines and dispatchers.
//!
//! Two paths exist and callers pick one explicitly:
//! - [`CatalogResolver`]: the merged, process-wide catalog emitted by the
//!   aggregator unit. Fails with `CatalogUnavailable` when no aggregator ran.
//! - [`DirectRegistry`]: one unit's own registrations, with no merge step.
//!   Only ever fails with `NotFound`. [`CachedRegistry`] wraps one and keeps
//!   the first artifact built per key.
//!
//! Neither path falls back to the other on its own.

use crate::{
    compare::ComparisonEngine,
    dispatch::Dispatcher,
    error::ResolveError,
};
use std::{
    collections::BTreeMap,
    fmt,
    sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError},
};

pub type EngineRef = Arc<dyn ComparisonEngine>;
pub type DispatcherRef = Arc<dyn Dispatcher>;

///
/// Catalog
///
/// Immutable model-key → artifact table. Shared read-only once built.
///

#[derive(Clone, Default)]
pub struct Catalog {
    engines: BTreeMap<String, EngineRef>,
    dispatchers: BTreeMap<String, DispatcherRef>,
    instructors: BTreeMap<String, String>,
}

impl Catalog {
    #[must_use]
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    #[must_use]
    pub fn comparison_engine(&self, model_key: &str) -> Option<EngineRef> {
        self.engines.get(model_key).cloned()
    }

    #[must_use]
    pub fn dispatcher(&self, model_key: &str) -> Option<DispatcherRef> {
        self.dispatchers.get(model_key).cloned()
    }

    #[must_use]
    pub fn dispatcher_for_instructor(&self, instructor_key: &str) -> Option<DispatcherRef> {
        self.instructors
            .get(instructor_key)
            .and_then(|model_key| self.dispatcher(model_key))
    }

    /// Every model key with an engine or a dispatcher, ascending.
    pub fn model_keys(&self) -> impl Iterator<Item = &str> {
        let mut keys: Vec<&str> = self
            .engines
            .keys()
            .chain(self.dispatchers.keys())
            .map(String::as_str)
            .collect();
        keys.sort_unstable();
        keys.dedup();

        keys.into_iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.model_keys().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.engines.is_empty() && self.dispatchers.is_empty()
    }
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("engines", &self.engines.keys().collect::<Vec<_>>())
            .field("dispatchers", &self.dispatchers.keys().collect::<Vec<_>>())
            .field("instructors", &self.instructors)
            .finish()
    }
}

///
/// CatalogBuilder
///
/// Keys are unique per model; the first registration for a key is kept.
///

#[derive(Default)]
pub struct CatalogBuilder {
    catalog: Catalog,
}

impl CatalogBuilder {
    #[must_use]
    pub fn engine(mut self, engine: impl ComparisonEngine + 'static) -> Self {
        let key = engine.model_key().to_string();
        self.catalog
            .engines
            .entry(key)
            .or_insert_with(|| Arc::new(engine));

        self
    }

    #[must_use]
    pub fn dispatcher(mut self, dispatcher: impl Dispatcher + 'static) -> Self {
        let model_key = dispatcher.model_key().to_string();
        let instructor_key = dispatcher.instructor_key().to_string();

        if !self.catalog.dispatchers.contains_key(&model_key) {
            self.catalog
                .instructors
                .insert(instructor_key, model_key.clone());
            self.catalog
                .dispatchers
                .insert(model_key, Arc::new(dispatcher));
        }

        self
    }

    #[must_use]
    pub fn build(self) -> Catalog {
        self.catalog
    }
}

///
/// CatalogResolver
///
/// Lazily materialises the merged catalog on first use and serves every
/// later call from the process-local cache. Generated aggregator code holds
/// one of these in a `static`.
///

pub struct CatalogResolver {
    loader: Option<fn() -> Catalog>,
    cell: OnceLock<Catalog>,
}

impl CatalogResolver {
    #[must_use]
    pub const fn new(loader: fn() -> Catalog) -> Self {
        Self {
            loader: Some(loader),
            cell: OnceLock::new(),
        }
    }

    /// Resolver for a build graph in which no aggregator ran.
    #[must_use]
    pub const fn unavailable() -> Self {
        Self {
            loader: None,
            cell: OnceLock::new(),
        }
    }

    pub fn catalog(&self) -> Result<&Catalog, ResolveError> {
        let loader = self.loader.ok_or(ResolveError::CatalogUnavailable)?;

        Ok(self.cell.get_or_init(loader))
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    pub fn resolve_comparison_engine(&self, model_key: &str) -> Result<EngineRef, ResolveError> {
        self.catalog()?
            .comparison_engine(model_key)
            .ok_or_else(|| ResolveError::engine_not_found(model_key))
    }

    pub fn resolve_dispatcher(&self, model_key: &str) -> Result<DispatcherRef, ResolveError> {
        self.catalog()?
            .dispatcher(model_key)
            .ok_or_else(|| ResolveError::dispatcher_not_found(model_key))
    }

    pub fn resolve_dispatcher_for_instructor(
        &self,
        instructor_key: &str,
    ) -> Result<DispatcherRef, ResolveError> {
        self.catalog()?
            .dispatcher_for_instructor(instructor_key)
            .ok_or_else(|| ResolveError::dispatcher_not_found(instructor_key))
    }
}

///
/// DirectRegistry
///
/// One unit's own constructors, looked up by key without any merge step.
/// Each resolve constructs a fresh artifact.
///

#[derive(Clone, Debug, Default)]
pub struct DirectRegistry {
    engines: BTreeMap<&'static str, fn() -> EngineRef>,
    dispatchers: BTreeMap<&'static str, fn() -> DispatcherRef>,
    instructors: BTreeMap<&'static str, &'static str>,
}

impl DirectRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn engine(mut self, model_key: &'static str, ctor: fn() -> EngineRef) -> Self {
        self.engines.entry(model_key).or_insert(ctor);
        self
    }

    #[must_use]
    pub fn dispatcher(
        mut self,
        model_key: &'static str,
        instructor_key: &'static str,
        ctor: fn() -> DispatcherRef,
    ) -> Self {
        if !self.dispatchers.contains_key(model_key) {
            self.dispatchers.insert(model_key, ctor);
            self.instructors.insert(instructor_key, model_key);
        }

        self
    }

    pub fn resolve_comparison_engine(&self, model_key: &str) -> Result<EngineRef, ResolveError> {
        self.engines
            .get(model_key)
            .map(|ctor| ctor())
            .ok_or_else(|| ResolveError::engine_not_found(model_key))
    }

    pub fn resolve_dispatcher(&self, model_key: &str) -> Result<DispatcherRef, ResolveError> {
        self.dispatchers
            .get(model_key)
            .map(|ctor| ctor())
            .ok_or_else(|| ResolveError::dispatcher_not_found(model_key))
    }

    pub fn resolve_dispatcher_for_instructor(
        &self,
        instructor_key: &str,
    ) -> Result<DispatcherRef, ResolveError> {
        self.instructors
            .get(instructor_key)
            .and_then(|model_key| self.dispatchers.get(model_key))
            .map(|ctor| ctor())
            .ok_or_else(|| ResolveError::dispatcher_not_found(instructor_key))
    }

    /// Wrap this registry so each key is constructed at most once.
    #[must_use]
    pub fn cached(self) -> CachedRegistry {
        CachedRegistry::new(self)
    }
}

///
/// CachedRegistry
///
/// Direct lookup that builds each artifact once and shares it afterwards.
/// `clear_cache` drops every shared artifact; the next resolve builds anew.
///

#[derive(Default)]
pub struct CachedRegistry {
    registry: DirectRegistry,
    engines: Mutex<BTreeMap<String, EngineRef>>,
    dispatchers: Mutex<BTreeMap<String, DispatcherRef>>,
}

impl CachedRegistry {
    #[must_use]
    pub fn new(registry: DirectRegistry) -> Self {
        Self {
            registry,
            ..Self::default()
        }
    }

    pub fn resolve_comparison_engine(&self, model_key: &str) -> Result<EngineRef, ResolveError> {
        let mut engines = lock(&self.engines);
        if let Some(engine) = engines.get(model_key) {
            return Ok(Arc::clone(engine));
        }

        let engine = self.registry.resolve_comparison_engine(model_key)?;
        engines.insert(model_key.to_string(), Arc::clone(&engine));

        Ok(engine)
    }

    pub fn resolve_dispatcher(&self, model_key: &str) -> Result<DispatcherRef, ResolveError> {
        let mut dispatchers = lock(&self.dispatchers);
        if let Some(dispatcher) = dispatchers.get(model_key) {
            return Ok(Arc::clone(dispatcher));
        }

        let dispatcher = self.registry.resolve_dispatcher(model_key)?;
        dispatchers.insert(model_key.to_string(), Arc::clone(&dispatcher));

        Ok(dispatcher)
    }

    // Instructor lookups share the per-model cache entry.
    pub fn resolve_dispatcher_for_instructor(
        &self,
        instructor_key: &str,
    ) -> Result<DispatcherRef, ResolveError> {
        let model_key = self
            .registry
            .instructors
            .get(instructor_key)
            .copied()
            .ok_or_else(|| ResolveError::dispatcher_not_found(instructor_key))?;

        self.resolve_dispatcher(model_key)
    }

    pub fn clear_cache(&self) {
        lock(&self.engines).clear();
        lock(&self.dispatchers).clear();
    }

    #[must_use]
    pub fn cached_len(&self) -> usize {
        lock(&self.engines).len() + lock(&self.dispatchers).len()
    }
}

impl fmt::Debug for CachedRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedRegistry")
            .field("registry", &self.registry)
            .field("engines", &lock(&self.engines).keys().collect::<Vec<_>>())
            .field("dispatchers", &lock(&self.dispatchers).keys().collect::<Vec<_>>())
            .finish()
    }
}

// A panic while holding the lock cannot leave a half-written map entry.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
