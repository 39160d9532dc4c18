//! Teleport Handle - authoring-layer lifetime tie.
//!
//! The authoring side of a teleport follows the component lifecycle: the
//! record is created when the teleporting element mounts and destroyed
//! when it tears down. [`TeleportHandle`] packages that pattern: hold the
//! handle for the element's lifetime, drop it (or `close()` it) at
//! teardown, and the record is removed from the registry.

use std::cell::Cell;
use std::rc::Rc;

use crate::record::Teleport;
use crate::registry::Registry;

/// Handle returned by [`Registry::teleport`] that destroys its record on
/// drop.
///
/// # Example
///
/// ```
/// use spark_teleport::{Registry, TeleportAttrs};
///
/// let registry: Registry<&str> = Registry::new();
///
/// {
///     let handle = registry.teleport(TeleportAttrs::new("overlay", "tip"))?;
///     handle.record().disabled.set(true); // prop updates via the record
///     assert_eq!(registry.len(), 1);
/// } // handle dropped - record destroyed
///
/// assert!(registry.is_empty());
/// # Ok::<(), spark_teleport::TeleportError>(())
/// ```
pub struct TeleportHandle<C: Clone + PartialEq + 'static> {
    registry: Registry<C>,
    record: Rc<Teleport<C>>,
    /// Cleared by `into_record` so Drop leaves the record registered.
    armed: Cell<bool>,
}

impl<C: Clone + PartialEq + 'static> TeleportHandle<C> {
    pub(crate) fn new(registry: Registry<C>, record: Rc<Teleport<C>>) -> Self {
        Self {
            registry,
            record,
            armed: Cell::new(true),
        }
    }

    /// The live record, for prop updates while the handle is open.
    pub fn record(&self) -> &Rc<Teleport<C>> {
        &self.record
    }

    /// The record's key.
    pub fn key(&self) -> &str {
        &self.record.key
    }

    /// Destroy the record now. Equivalent to dropping the handle; spelled
    /// out for call sites where the teardown should be visible.
    pub fn close(self) {}

    /// Release the record from the handle's lifetime without destroying
    /// it. The record then lives until `destroy`/`destroy_all`.
    pub fn into_record(self) -> Rc<Teleport<C>> {
        self.armed.set(false);
        self.record.clone()
    }
}

impl<C: Clone + PartialEq + 'static> Drop for TeleportHandle<C> {
    fn drop(&mut self) {
        if self.armed.get() {
            self.registry.destroy(&self.record.key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::TeleportAttrs;

    #[test]
    fn test_drop_destroys_record() {
        let registry: Registry<&str> = Registry::new();

        let handle = registry
            .teleport(TeleportAttrs::new("dest", "a").key("k"))
            .unwrap();
        assert!(registry.contains("k"));

        drop(handle);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_close_destroys_record() {
        let registry: Registry<&str> = Registry::new();

        let handle = registry
            .teleport(TeleportAttrs::new("dest", "a").key("k"))
            .unwrap();
        handle.close();

        assert!(registry.is_empty());
    }

    #[test]
    fn test_into_record_detaches_lifetime() {
        let registry: Registry<&str> = Registry::new();

        let handle = registry
            .teleport(TeleportAttrs::new("dest", "a").key("k"))
            .unwrap();
        let record = handle.into_record();

        assert!(registry.contains("k"));
        assert_eq!(record.key, "k");

        registry.destroy("k");
        assert!(registry.is_empty());
    }

    #[test]
    fn test_record_updates_through_handle() {
        let registry: Registry<&str> = Registry::new();

        let handle = registry
            .teleport(TeleportAttrs::new("dest", "a").key("k"))
            .unwrap();
        handle.record().to.set("other".to_string());

        assert_eq!(registry.index()[0].to, "other");
    }

    #[test]
    fn test_drop_after_external_destroy_is_noop() {
        let registry: Registry<&str> = Registry::new();

        let handle = registry
            .teleport(TeleportAttrs::new("dest", "a").key("k"))
            .unwrap();
        registry.destroy("k");

        drop(handle); // destroy is idempotent
        assert!(registry.is_empty());
    }
}
