//! Name-keyed registries.
//!
//! Color models, blend modes, filters and projections all live in a
//! process-wide [`Registry`]: a `BTreeMap` of `Arc` descriptors behind an
//! `RwLock`. Each owning crate wraps one in a `OnceLock` and seeds it with its
//! built-ins on first access:
//!
//! ```rust
//! use std::sync::OnceLock;
//! use gfx_core::Registry;
//!
//! #[derive(Debug)]
//! struct Shape { sides: u32 }
//!
//! fn global() -> &'static Registry<Shape> {
//!     static INSTANCE: OnceLock<Registry<Shape>> = OnceLock::new();
//!     INSTANCE.get_or_init(|| {
//!         let reg = Registry::new("shape");
//!         let _ = reg.register("triangle", Shape { sides: 3 });
//!         reg
//!     })
//! }
//!
//! assert_eq!(global().get("triangle").unwrap().sides, 3);
//! assert!(global().register("triangle", Shape { sides: 3 }).unwrap_err().is_duplicate());
//! ```
//!
//! # Locking
//!
//! Lookups take a shared lock, registration an exclusive one. A poisoned lock
//! is recovered: every write is a single map insert, so the map is never left
//! half-updated.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::error::{Error, Result};

/// Thread-safe map from unique names to shared descriptors.
pub struct Registry<T> {
    kind: &'static str,
    entries: RwLock<BTreeMap<String, Arc<T>>>,
}

impl<T> Registry<T> {
    /// Creates an empty registry. `kind` names the entries in error messages.
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    /// Entry kind used in error messages.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Adds an entry. Fails on an empty or already registered name.
    pub fn register(&self, name: impl Into<String>, entry: T) -> Result<Arc<T>> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::invalid_argument(format!("{} name must not be empty", self.kind)));
        }
        let mut map = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if map.contains_key(&name) {
            return Err(Error::duplicate(self.kind, name));
        }
        debug!(kind = self.kind, name = %name, "registry::register");
        let entry = Arc::new(entry);
        map.insert(name, Arc::clone(&entry));
        Ok(entry)
    }

    /// Looks up an entry by exact name.
    pub fn get(&self, name: &str) -> Result<Arc<T>> {
        let map = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        map.get(name).cloned().ok_or_else(|| Error::unknown_name(self.kind, name))
    }

    /// Returns `true` if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        let map = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        map.contains_key(name)
    }

    /// Registered names in ascending order.
    pub fn list(&self) -> Vec<String> {
        let map = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        map.keys().cloned().collect()
    }

    /// Entries matching `pred`, in name order.
    pub fn filter(&self, pred: impl Fn(&T) -> bool) -> Vec<Arc<T>> {
        let map = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        map.values().filter(|e| pred(e)).cloned().collect()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
