//! Role collections - append-only, order-preserving lists of role handles
//!
//! All role lists live in one place. Contributors append during wiring,
//! list-consumers take a snapshot at their own wiring time, and the pipeline
//! router keeps a shared handle that observes boot-time growth. Whether a
//! late contribution is visible therefore depends on which of the two access
//! paths a consumer was given, never on luck.

use crate::module::{
    MapDataFinder, MapDataGetter, MapDataParser, MapReplacementProvider, ModParser, PipelineSink,
    SettingsProvider,
};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// An ordered list of role handles, shared between the wirer and anything
/// holding a clone.
pub struct RoleList<T: ?Sized> {
    inner: Arc<RwLock<Vec<Arc<T>>>>,
}

impl<T: ?Sized> Clone for RoleList<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: ?Sized> Default for RoleList<T> {
    fn default() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl<T: ?Sized> RoleList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, item: Arc<T>) {
        self.write().push(item);
    }

    /// Membership as of now. Later appends are invisible to the caller.
    pub fn snapshot(&self) -> Vec<Arc<T>> {
        self.read().clone()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn clear(&self) {
        self.write().clear();
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Arc<T>>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Arc<T>>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The single ownership point for every role collection.
#[derive(Default, Clone)]
pub struct RoleCollections {
    pub settings_providers: RoleList<dyn SettingsProvider>,
    pub mod_parsers: RoleList<dyn ModParser>,
    pub map_finders: RoleList<dyn MapDataFinder>,
    pub map_parsers: RoleList<dyn MapDataParser>,
    pub map_getters: RoleList<dyn MapDataGetter>,
    pub map_replacers: RoleList<dyn MapReplacementProvider>,
    pub pipeline_sinks: RoleList<dyn PipelineSink>,
}
