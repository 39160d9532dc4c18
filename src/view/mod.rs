//! Derived Views - read-only listings over the registry.
//!
//! Consumers never walk the registry's storage directly; they read derived
//! views:
//! - [`create_index_derived`] - every record, sorted by position
//! - [`create_target_derived`] - one destination's records, skipping
//!   disabled ones (what a render target consumes)
//!
//! Views are pure computations over the registry's reactive state. Reads
//! inside the derived closure (key set, positions, record fields) create
//! the dependencies, so a view recomputes exactly when a teleport is
//! added, removed, or mutated - lazily, on the next `.get()`.

mod index_derived;
mod target_derived;

pub use index_derived::*;
pub use target_derived::*;

use crate::context::ContextBag;
use crate::record::Teleport;

/// Immutable snapshot of one record, as reported by the views.
///
/// `position` is the compacted position: the record's index in the sorted
/// listing, contiguous `0..n-1` even when stored positions have been
/// scattered by direct signal writes.
#[derive(Debug, Clone, PartialEq)]
pub struct TeleportView<C: Clone + PartialEq + 'static> {
    pub key: String,
    pub position: usize,
    pub to: String,
    pub disabled: bool,
    pub content: C,
    pub context: ContextBag,
}

impl<C: Clone + PartialEq + 'static> TeleportView<C> {
    /// Snapshot a record at a compacted position. Reads the record's
    /// signal fields, creating reactive dependencies in the caller's
    /// tracking scope.
    pub(crate) fn capture(record: &Teleport<C>, position: usize) -> Self {
        Self {
            key: record.key.clone(),
            position,
            to: record.to.get(),
            disabled: record.disabled.get(),
            content: record.content.get(),
            context: record.context.clone(),
        }
    }
}
