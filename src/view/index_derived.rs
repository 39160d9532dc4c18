//! Index Derived - reactive sorted listing of all teleports.

use spark_signals::{Derived, derived};

use super::TeleportView;
use crate::registry::Registry;

/// Create the index derived: every current record as an immutable
/// snapshot, sorted by position (ties by insertion order), positions
/// compacted to `0..n-1`.
///
/// The derived is lazy and cached: it recomputes on the next `.get()`
/// after a teleport is created, destroyed, or mutated, and not otherwise.
///
/// # Example
///
/// ```
/// use spark_teleport::{Registry, TeleportAttrs, create_index_derived};
///
/// let registry: Registry<&str> = Registry::new();
/// let index = create_index_derived(&registry);
///
/// assert!(index.get().is_empty());
///
/// registry.create(TeleportAttrs::new("overlay", "tip").key("tooltip"))?;
///
/// let listing = index.get();
/// assert_eq!(listing[0].key, "tooltip");
/// assert_eq!(listing[0].position, 0);
/// # Ok::<(), spark_teleport::TeleportError>(())
/// ```
pub fn create_index_derived<C: Clone + PartialEq + 'static>(
    registry: &Registry<C>,
) -> Derived<Vec<TeleportView<C>>> {
    let registry = registry.clone();

    derived(move || registry.index())
}
