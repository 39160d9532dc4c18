//! Teleport Registry - the shared ordered record store.
//!
//! Manages the lifecycle of teleport records:
//! - Keyed storage with `Rc` hand-out (holders observe live signal cells)
//! - ReactiveSet for the key set (deriveds react to add/remove)
//! - Position ordering with insertion-order tie-break
//! - Destroy callbacks per key
//!
//! The registry is an explicit object, not a process-wide global. Handles
//! are cheap clones sharing one store, so every holder of a handle sees
//! every mutation; independent registries (one per test, one per app) stay
//! fully isolated.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use spark_signals::{ReactiveSet, signal};
use tracing::debug;

use crate::error::TeleportError;
use crate::handle::TeleportHandle;
use crate::record::{Teleport, TeleportAttrs, TeleportUpdate};
use crate::view::TeleportView;

// =============================================================================
// Configuration
// =============================================================================

/// What `create` does when the requested key is already registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateKeyPolicy {
    /// Last write wins: the existing record is destroyed (its destroy
    /// callbacks fire), then the new record is created.
    #[default]
    Replace,
    /// `create` returns [`TeleportError::DuplicateKey`] and leaves the
    /// registry untouched.
    Reject,
}

/// Registry behavior knobs.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Prefix for generated keys. A record created without an explicit key
    /// gets `{key_prefix}-{insertion stamp}`.
    pub key_prefix: String,
    /// Duplicate key handling for `create`.
    pub duplicate_keys: DuplicateKeyPolicy,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            key_prefix: "teleport".to_string(),
            duplicate_keys: DuplicateKeyPolicy::default(),
        }
    }
}

// =============================================================================
// Registry
// =============================================================================

/// Shared ordered store of active teleports.
///
/// Cloning a `Registry` clones a handle, not the store: all clones operate
/// on the same records. The content type `C` is opaque to the registry;
/// the `Clone + PartialEq + 'static` bounds are what signal cells require.
///
/// # Example
///
/// ```
/// use spark_teleport::{Registry, TeleportAttrs};
///
/// let registry: Registry<&str> = Registry::new();
///
/// let tooltip = registry.create(TeleportAttrs::new("overlay", "tip").key("tooltip"))?;
/// registry.create(TeleportAttrs::new("overlay", "menu"))?;
///
/// assert_eq!(registry.index().len(), 2);
///
/// // Signal fields are live: every view observes the write.
/// tooltip.disabled.set(true);
///
/// registry.destroy("tooltip");
/// assert_eq!(registry.index().len(), 1);
/// # Ok::<(), spark_teleport::TeleportError>(())
/// ```
pub struct Registry<C: Clone + PartialEq + 'static> {
    inner: Rc<RegistryInner<C>>,
}

impl<C: Clone + PartialEq + 'static> Clone for Registry<C> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

struct RegistryInner<C: Clone + PartialEq + 'static> {
    config: RegistryConfig,

    /// Key → record. Lookups go through here; reactivity does not (plain
    /// RefCell), so reads that must track membership go through `keys`.
    records: RefCell<HashMap<String, Rc<Teleport<C>>>>,

    /// Key set mirror of `records`. Using ReactiveSet so deriveds that
    /// list records automatically react when teleports are added or
    /// removed.
    keys: RefCell<ReactiveSet<String>>,

    /// Monotonic insertion stamp: position tie-break and generated keys.
    next_seq: Cell<u64>,

    /// Destroy callbacks registered per key.
    destroy_callbacks: RefCell<HashMap<String, Vec<Box<dyn FnOnce()>>>>,
}

impl<C: Clone + PartialEq + 'static> Registry<C> {
    /// Create an empty registry with the default configuration.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create an empty registry with an explicit configuration.
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            inner: Rc::new(RegistryInner {
                config,
                records: RefCell::new(HashMap::new()),
                keys: RefCell::new(ReactiveSet::new()),
                next_seq: Cell::new(0),
                destroy_callbacks: RefCell::new(HashMap::new()),
            }),
        }
    }

    // =========================================================================
    // Create
    // =========================================================================

    /// Register a teleport.
    ///
    /// `attrs.to` must be non-empty. A missing key is generated from the
    /// configured prefix; a missing position appends. An explicit position
    /// `p` inserts before every existing record whose position is `>= p`
    /// (those records shift up by one).
    ///
    /// Returns the stored record. It is shared, not copied: mutating its
    /// signal fields later is observed by the next read of every view.
    pub fn create(&self, attrs: TeleportAttrs<C>) -> Result<Rc<Teleport<C>>, TeleportError> {
        if attrs.to.is_empty() {
            return Err(TeleportError::InvalidDestination);
        }

        let seq = self.next_seq();
        let key = match attrs.key {
            Some(key) => key,
            None => format!("{}-{}", self.inner.config.key_prefix, seq),
        };

        if self.inner.records.borrow().contains_key(&key) {
            match self.inner.config.duplicate_keys {
                DuplicateKeyPolicy::Reject => {
                    return Err(TeleportError::DuplicateKey(key));
                }
                DuplicateKeyPolicy::Replace => {
                    debug!(key = %key, "replacing existing teleport");
                    self.destroy(&key);
                }
            }
        }

        let position = match attrs.position {
            Some(position) => {
                self.shift_at(position);
                position
            }
            None => self.inner.records.borrow().len(),
        };

        let record = Rc::new(Teleport {
            key: key.clone(),
            seq,
            position: signal(position),
            to: signal(attrs.to),
            disabled: signal(attrs.disabled),
            content: signal(attrs.content),
            context: attrs.context,
        });

        self.inner
            .records
            .borrow_mut()
            .insert(key.clone(), record.clone());
        self.inner.keys.borrow_mut().insert(key);
        self.normalize_positions();

        debug!(
            key = %record.key,
            to = %record.to.get(),
            position = record.position.get(),
            "teleport created"
        );

        Ok(record)
    }

    /// Register a teleport and tie its lifetime to the returned handle.
    ///
    /// The record is destroyed when the handle is dropped or closed - the
    /// authoring-layer pattern: open at mount, drop at teardown.
    pub fn teleport(&self, attrs: TeleportAttrs<C>) -> Result<TeleportHandle<C>, TeleportError> {
        let record = self.create(attrs)?;
        Ok(TeleportHandle::new(self.clone(), record))
    }

    // =========================================================================
    // Update
    // =========================================================================

    /// Merge partial attributes into the record with the given key.
    ///
    /// Absent keys are an error - update does not create. A position
    /// change re-inserts with the same shift rule as create. Returns the
    /// merged record.
    pub fn update(
        &self,
        key: &str,
        changes: TeleportUpdate<C>,
    ) -> Result<Rc<Teleport<C>>, TeleportError> {
        let Some(record) = self.get(key) else {
            return Err(TeleportError::NotFound(key.to_string()));
        };

        if let Some(to) = changes.to {
            if to.is_empty() {
                return Err(TeleportError::InvalidDestination);
            }
            record.to.set(to);
        }
        if let Some(disabled) = changes.disabled {
            record.disabled.set(disabled);
        }
        if let Some(content) = changes.content {
            record.content.set(content);
        }
        if let Some(position) = changes.position {
            self.shift_at(position);
            record.position.set(position);
            self.normalize_positions();
        }

        debug!(key = %record.key, "teleport updated");

        Ok(record)
    }

    // =========================================================================
    // Destroy
    // =========================================================================

    /// Remove the record with the given key. Destroying an absent key is a
    /// no-op.
    pub fn destroy(&self, key: &str) {
        let record = self.inner.records.borrow_mut().remove(key);
        let Some(record) = record else { return };

        self.inner.keys.borrow_mut().remove(&key.to_string());
        self.run_destroy_callbacks(key);
        self.normalize_positions();

        debug!(key = %record.key, "teleport destroyed");
    }

    /// Remove every record, idempotently, and reset the insertion stamp so
    /// an independent session (test, page navigation) starts fresh.
    pub fn destroy_all(&self) {
        let keys: Vec<String> = self.inner.records.borrow().keys().cloned().collect();
        let count = keys.len();

        for key in &keys {
            self.destroy(key);
        }

        self.inner.destroy_callbacks.borrow_mut().clear();
        self.inner.next_seq.set(0);

        if count > 0 {
            debug!(count, "destroyed all teleports");
        }
    }

    // =========================================================================
    // Destroy Callbacks
    // =========================================================================

    /// Register a callback to run when the record with `key` is destroyed
    /// (individually, via `destroy_all`, or when replaced).
    pub fn on_destroy(&self, key: &str, callback: impl FnOnce() + 'static) {
        self.inner
            .destroy_callbacks
            .borrow_mut()
            .entry(key.to_string())
            .or_default()
            .push(Box::new(callback));
    }

    /// Run and clear destroy callbacks for a key.
    fn run_destroy_callbacks(&self, key: &str) {
        let callbacks = self.inner.destroy_callbacks.borrow_mut().remove(key);
        if let Some(callbacks) = callbacks {
            for callback in callbacks {
                callback();
            }
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Get the record for a key.
    ///
    /// A plain lookup: does not create a reactive dependency. Use the
    /// views (or [`Registry::index`]) for reads that must track.
    pub fn get(&self, key: &str) -> Option<Rc<Teleport<C>>> {
        self.inner.records.borrow().get(key).cloned()
    }

    /// Check whether a key is registered.
    ///
    /// Note: This creates a reactive dependency when called from a
    /// derived/effect.
    pub fn contains(&self, key: &str) -> bool {
        self.inner.keys.borrow().contains(&key.to_string())
    }

    /// Number of registered records.
    ///
    /// Note: This creates a reactive dependency when called from a
    /// derived/effect.
    pub fn len(&self) -> usize {
        self.inner.keys.borrow().len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.keys.borrow().is_empty()
    }

    /// All current records in render order (position, ties by insertion).
    ///
    /// Reads the key set and every record's position, so deriveds and
    /// effects that call this re-run when teleports are added, removed, or
    /// repositioned. Returns the live records; use [`Registry::index`] for
    /// immutable snapshots.
    pub fn sorted_records(&self) -> Vec<Rc<Teleport<C>>> {
        let mut records: Vec<(usize, Rc<Teleport<C>>)> = self
            .inner
            .keys
            .borrow()
            .iter()
            .filter_map(|key| self.inner.records.borrow().get(key).cloned())
            .map(|record| (record.position.get(), record))
            .collect();

        records.sort_by_key(|(position, record)| (*position, record.seq));
        records.into_iter().map(|(_, record)| record).collect()
    }

    /// The derived, read-only listing: every record as an immutable
    /// snapshot, sorted by position, positions compacted to `0..n-1`.
    ///
    /// Recomputed from the live records on every call; wrap it in a
    /// derived (see [`create_index_derived`]) for lazy cached reads.
    ///
    /// [`create_index_derived`]: crate::view::create_index_derived
    pub fn index(&self) -> Vec<TeleportView<C>> {
        self.sorted_records()
            .iter()
            .enumerate()
            .map(|(position, record)| TeleportView::capture(record, position))
            .collect()
    }

    // =========================================================================
    // Position Maintenance
    // =========================================================================

    fn next_seq(&self) -> u64 {
        let seq = self.inner.next_seq.get();
        self.inner.next_seq.set(seq + 1);
        seq
    }

    /// Make room at `position`: every record at or after it shifts up by
    /// one.
    fn shift_at(&self, position: usize) {
        let records: Vec<Rc<Teleport<C>>> =
            self.inner.records.borrow().values().cloned().collect();

        for record in records {
            let current = record.position.get();
            if current >= position {
                record.position.set(current + 1);
            }
        }
    }

    /// Restore the contiguous `0..n-1` position invariant after a
    /// mutation. Sorts by (position, insertion stamp) and rewrites only
    /// the positions that moved.
    fn normalize_positions(&self) {
        let mut records: Vec<(usize, Rc<Teleport<C>>)> = self
            .inner
            .records
            .borrow()
            .values()
            .map(|record| (record.position.get(), record.clone()))
            .collect();

        records.sort_by_key(|(position, record)| (*position, record.seq));

        for (index, (_, record)) in records.iter().enumerate() {
            if record.position.get() != index {
                record.position.set(index);
            }
        }
    }
}

impl<C: Clone + PartialEq + 'static> Default for Registry<C> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    fn keys_of(registry: &Registry<&'static str>) -> Vec<String> {
        registry
            .index()
            .into_iter()
            .map(|view| view.key)
            .collect()
    }

    #[test]
    fn test_create_appends_in_insertion_order() {
        let registry: Registry<&str> = Registry::new();

        registry
            .create(TeleportAttrs::new("dest", "a").key("1"))
            .unwrap();
        registry
            .create(TeleportAttrs::new("dest", "b").key("2"))
            .unwrap();

        let index = registry.index();
        assert_eq!(index.len(), 2);
        assert_eq!(index[0].key, "1");
        assert_eq!(index[0].position, 0);
        assert_eq!(index[1].key, "2");
        assert_eq!(index[1].position, 1);
    }

    #[test]
    fn test_create_defaults() {
        let registry: Registry<&str> = Registry::new();

        let record = registry.create(TeleportAttrs::new("dest", "a")).unwrap();

        assert_eq!(record.key, "teleport-0");
        assert_eq!(record.position.get(), 0);
        assert!(!record.disabled.get());
        assert!(record.context.is_empty());
    }

    #[test]
    fn test_create_empty_destination_errors() {
        let registry: Registry<&str> = Registry::new();

        let result = registry.create(TeleportAttrs::new("", "a"));

        assert_eq!(result.unwrap_err(), TeleportError::InvalidDestination);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_create_with_position_inserts_before_existing() {
        let registry: Registry<&str> = Registry::new();

        registry
            .create(TeleportAttrs::new("dest", "a").key("1"))
            .unwrap();
        registry
            .create(TeleportAttrs::new("dest", "b").key("2"))
            .unwrap();
        registry
            .create(TeleportAttrs::new("dest", "c").key("ins").position(0))
            .unwrap();

        assert_eq!(keys_of(&registry), ["ins", "1", "2"]);
    }

    #[test]
    fn test_create_with_position_past_end_appends() {
        let registry: Registry<&str> = Registry::new();

        registry
            .create(TeleportAttrs::new("dest", "a").key("1"))
            .unwrap();
        registry
            .create(TeleportAttrs::new("dest", "b").key("far").position(99))
            .unwrap();

        let index = registry.index();
        assert_eq!(keys_of(&registry), ["1", "far"]);
        // positions compact to 0..n-1 regardless of the requested value
        assert_eq!(index[1].position, 1);
    }

    #[test]
    fn test_duplicate_key_replaces_by_default() {
        let registry: Registry<&str> = Registry::new();

        registry
            .create(TeleportAttrs::new("dest", "old").key("dup"))
            .unwrap();
        let replaced = Rc::new(Cell::new(false));
        let flag = replaced.clone();
        registry.on_destroy("dup", move || flag.set(true));

        let record = registry
            .create(TeleportAttrs::new("elsewhere", "new").key("dup"))
            .unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(record.to.get(), "elsewhere");
        assert_eq!(record.content.get(), "new");
        assert!(replaced.get());
    }

    #[test]
    fn test_duplicate_key_reject_policy() {
        let registry: Registry<&str> = Registry::with_config(RegistryConfig {
            duplicate_keys: DuplicateKeyPolicy::Reject,
            ..RegistryConfig::default()
        });

        let original = registry
            .create(TeleportAttrs::new("dest", "old").key("dup"))
            .unwrap();
        let result = registry.create(TeleportAttrs::new("dest", "new").key("dup"));

        assert_eq!(
            result.unwrap_err(),
            TeleportError::DuplicateKey("dup".to_string())
        );
        assert_eq!(registry.len(), 1);
        assert_eq!(original.content.get(), "old");
    }

    #[test]
    fn test_generated_keys_unique_across_destroy_cycles() {
        let registry: Registry<&str> = Registry::new();

        let first = registry.create(TeleportAttrs::new("dest", "a")).unwrap();
        let second = registry.create(TeleportAttrs::new("dest", "b")).unwrap();
        registry.destroy(&first.key);

        let third = registry.create(TeleportAttrs::new("dest", "c")).unwrap();

        assert_ne!(third.key, second.key);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_update_merges_fields() {
        let registry: Registry<&str> = Registry::new();

        registry
            .create(TeleportAttrs::new("dest", "a").key("k"))
            .unwrap();
        let record = registry
            .update("k", TeleportUpdate::new().to("other").disabled(true))
            .unwrap();

        assert_eq!(record.to.get(), "other");
        assert!(record.disabled.get());
        // untouched fields stay put
        assert_eq!(record.content.get(), "a");
    }

    #[test]
    fn test_update_missing_key_errors() {
        let registry: Registry<&str> = Registry::new();

        let result = registry.update("ghost", TeleportUpdate::new().disabled(true));

        assert_eq!(
            result.unwrap_err(),
            TeleportError::NotFound("ghost".to_string())
        );
    }

    #[test]
    fn test_update_empty_destination_errors() {
        let registry: Registry<&str> = Registry::new();

        registry
            .create(TeleportAttrs::new("dest", "a").key("k"))
            .unwrap();
        let result = registry.update("k", TeleportUpdate::new().to(""));

        assert_eq!(result.unwrap_err(), TeleportError::InvalidDestination);
        assert_eq!(registry.get("k").unwrap().to.get(), "dest");
    }

    #[test]
    fn test_update_position_reinserts() {
        let registry: Registry<&str> = Registry::new();

        registry
            .create(TeleportAttrs::new("dest", "a").key("1"))
            .unwrap();
        registry
            .create(TeleportAttrs::new("dest", "b").key("2"))
            .unwrap();
        registry
            .create(TeleportAttrs::new("dest", "c").key("3"))
            .unwrap();

        registry
            .update("3", TeleportUpdate::new().position(0))
            .unwrap();

        assert_eq!(keys_of(&registry), ["3", "1", "2"]);
    }

    #[test]
    fn test_destroy_removes_record() {
        let registry: Registry<&str> = Registry::new();

        registry
            .create(TeleportAttrs::new("dest", "a").key("k"))
            .unwrap();
        registry.destroy("k");

        assert!(registry.index().is_empty());
        assert!(registry.get("k").is_none());
    }

    #[test]
    fn test_destroy_absent_key_is_noop() {
        let registry: Registry<&str> = Registry::new();

        registry
            .create(TeleportAttrs::new("dest", "a").key("k"))
            .unwrap();
        registry.destroy("ghost");

        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_destroy_compacts_positions() {
        let registry: Registry<&str> = Registry::new();

        registry
            .create(TeleportAttrs::new("dest", "a").key("1"))
            .unwrap();
        registry
            .create(TeleportAttrs::new("dest", "b").key("2"))
            .unwrap();
        registry
            .create(TeleportAttrs::new("dest", "c").key("3"))
            .unwrap();

        registry.destroy("2");

        let index = registry.index();
        assert_eq!(keys_of(&registry), ["1", "3"]);
        assert_eq!(index[0].position, 0);
        assert_eq!(index[1].position, 1);
        // stored positions renormalized too, not just the snapshot
        assert_eq!(registry.get("3").unwrap().position.get(), 1);
    }

    #[test]
    fn test_destroy_all_idempotent() {
        let registry: Registry<&str> = Registry::new();

        registry.create(TeleportAttrs::new("dest", "a")).unwrap();
        registry.create(TeleportAttrs::new("dest", "b")).unwrap();

        registry.destroy_all();
        assert!(registry.index().is_empty());

        registry.destroy_all();
        assert!(registry.index().is_empty());
    }

    #[test]
    fn test_destroy_all_resets_generated_keys() {
        let registry: Registry<&str> = Registry::new();

        registry.create(TeleportAttrs::new("dest", "a")).unwrap();
        registry.create(TeleportAttrs::new("dest", "b")).unwrap();
        registry.destroy_all();

        let record = registry.create(TeleportAttrs::new("dest", "c")).unwrap();
        assert_eq!(record.key, "teleport-0");
    }

    #[test]
    fn test_record_mutation_reflected_in_index() {
        let registry: Registry<&str> = Registry::new();

        let record = registry
            .create(TeleportAttrs::new("dest", "a").key("k"))
            .unwrap();

        record.to.set("new-dest".to_string());

        assert_eq!(registry.index()[0].to, "new-dest");
    }

    #[test]
    fn test_position_tie_breaks_by_insertion_order() {
        let registry: Registry<&str> = Registry::new();

        let first = registry
            .create(TeleportAttrs::new("dest", "a").key("1"))
            .unwrap();
        let second = registry
            .create(TeleportAttrs::new("dest", "b").key("2"))
            .unwrap();

        // force a tie through direct mutation
        first.position.set(5);
        second.position.set(5);

        assert_eq!(keys_of(&registry), ["1", "2"]);
    }

    #[test]
    fn test_shared_handles_see_same_state() {
        let registry: Registry<&str> = Registry::new();
        let other = registry.clone();

        registry
            .create(TeleportAttrs::new("dest", "a").key("k"))
            .unwrap();

        assert_eq!(other.len(), 1);
        assert!(other.contains("k"));

        other.destroy("k");
        assert!(registry.is_empty());
    }

    #[test]
    fn test_on_destroy_runs_on_destroy_all() {
        let registry: Registry<&str> = Registry::new();

        registry
            .create(TeleportAttrs::new("dest", "a").key("k"))
            .unwrap();

        let called = Rc::new(Cell::new(false));
        let flag = called.clone();
        registry.on_destroy("k", move || flag.set(true));

        registry.destroy_all();
        assert!(called.get());
    }
}
