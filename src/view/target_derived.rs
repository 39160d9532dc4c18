//! Target Derived - one destination's renderable records.

use spark_signals::{Derived, derived};

use super::TeleportView;
use crate::registry::Registry;

/// Create a derived for a single destination: the records whose `to`
/// equals `target`, in position order, skipping disabled records.
///
/// This is the rendering layer's view - a target mounts each snapshot's
/// content in order and re-reads when the derived invalidates. Positions
/// in the snapshots are the global compacted positions, so relative order
/// across destinations stays comparable.
///
/// # Example
///
/// ```
/// use spark_teleport::{Registry, TeleportAttrs, create_target_derived};
///
/// let registry: Registry<&str> = Registry::new();
/// let overlay = create_target_derived(&registry, "overlay");
///
/// registry.create(TeleportAttrs::new("overlay", "tip"))?;
/// registry.create(TeleportAttrs::new("sidebar", "nav"))?;
///
/// assert_eq!(overlay.get().len(), 1);
/// assert_eq!(overlay.get()[0].content, "tip");
/// # Ok::<(), spark_teleport::TeleportError>(())
/// ```
pub fn create_target_derived<C: Clone + PartialEq + 'static>(
    registry: &Registry<C>,
    target: impl Into<String>,
) -> Derived<Vec<TeleportView<C>>> {
    let registry = registry.clone();
    let target = target.into();

    derived(move || {
        registry
            .index()
            .into_iter()
            .filter(|view| !view.disabled && view.to == target)
            .collect()
    })
}
