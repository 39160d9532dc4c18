//! Teleport record - the per-teleport reactive object.
//!
//! Each active teleport is one persistent [`Teleport`] shared via `Rc`.
//! The mutable fields (`position`, `to`, `disabled`, `content`) are
//! reactive `Signal` cells, so writing a field from the authoring side is
//! observed by every derived view without an explicit notification step.
//! Changing `to` only invalidates readers of `to` - fine-grained tracking,
//! not whole-record diffing.

use std::fmt;

use spark_signals::Signal;

use crate::context::ContextBag;

// =============================================================================
// Teleport Record
// =============================================================================

/// One active teleport: content authored at an origin, rendered at the
/// destination named by `to`.
///
/// Records are handed out as `Rc<Teleport<C>>` by the registry, never
/// copied, so every holder observes the same signal cells. `C` is the
/// opaque content reference - whatever the host rendering layer mounts at
/// the target (a component index, a build closure behind an `Rc`, an
/// element id).
pub struct Teleport<C: Clone + PartialEq + 'static> {
    /// Unique, stable identity within the registry.
    pub key: String,

    /// Monotonic insertion stamp. Breaks position ties in favor of
    /// insertion order.
    pub(crate) seq: u64,

    /// Render order among all records, lower first. The registry keeps
    /// stored positions contiguous `0..n-1` after each mutation.
    pub position: Signal<usize>,

    /// Destination name. Many records may share one destination.
    pub to: Signal<String>,

    /// Disabled records stay registered but are skipped by target views.
    pub disabled: Signal<bool>,

    /// Opaque content reference for the rendering layer.
    pub content: Signal<C>,

    /// Context values forwarded from the origin, fixed at creation.
    pub context: ContextBag,
}

impl<C: Clone + PartialEq + fmt::Debug + 'static> fmt::Debug for Teleport<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Teleport")
            .field("key", &self.key)
            .field("position", &self.position.get())
            .field("to", &self.to.get())
            .field("disabled", &self.disabled.get())
            .field("content", &self.content.get())
            .field("context", &self.context)
            .finish()
    }
}

// =============================================================================
// Create Attributes
// =============================================================================

/// Attributes for creating a teleport.
///
/// `to` and `content` are required; everything else has a default. Optional
/// attributes chain builder-style:
///
/// ```
/// use spark_teleport::TeleportAttrs;
///
/// let attrs = TeleportAttrs::new("overlay", "content")
///     .key("tooltip")
///     .position(0)
///     .disabled(false);
/// ```
#[derive(Debug, Clone)]
pub struct TeleportAttrs<C> {
    /// Destination name. Must be non-empty.
    pub to: String,
    /// Opaque content reference.
    pub content: C,
    /// Explicit key. Generated from the registry's key prefix and the
    /// insertion stamp when absent.
    pub key: Option<String>,
    /// Explicit position. Inserts before existing records at or after it.
    /// Defaults to the current record count (append).
    pub position: Option<usize>,
    /// Start out disabled. Defaults to false.
    pub disabled: bool,
    /// Context values to forward. Defaults to empty.
    pub context: ContextBag,
}

impl<C> TeleportAttrs<C> {
    /// Attributes with the required fields set and all defaults.
    pub fn new(to: impl Into<String>, content: C) -> Self {
        Self {
            to: to.into(),
            content,
            key: None,
            position: None,
            disabled: false,
            context: ContextBag::new(),
        }
    }

    /// Set an explicit key.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Set an explicit position.
    pub fn position(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }

    /// Set the initial disabled flag.
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Attach a context bag.
    pub fn context(mut self, context: ContextBag) -> Self {
        self.context = context;
        self
    }
}

// =============================================================================
// Update Attributes
// =============================================================================

/// Partial attributes for [`Registry::update`]. `None` fields are left
/// untouched. The context bag is fixed at creation and cannot be updated.
///
/// [`Registry::update`]: crate::registry::Registry::update
#[derive(Debug, Clone)]
pub struct TeleportUpdate<C> {
    /// New destination name. Must be non-empty when present.
    pub to: Option<String>,
    /// Re-insert at this position (same shift rule as create).
    pub position: Option<usize>,
    /// New disabled flag.
    pub disabled: Option<bool>,
    /// New content reference.
    pub content: Option<C>,
}

// Manual impl: `#[derive(Default)]` would demand `C: Default` even though
// every field defaults to `None`.
impl<C> Default for TeleportUpdate<C> {
    fn default() -> Self {
        Self {
            to: None,
            position: None,
            disabled: None,
            content: None,
        }
    }
}

impl<C> TeleportUpdate<C> {
    /// An update that changes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Change the destination name.
    pub fn to(mut self, to: impl Into<String>) -> Self {
        self.to = Some(to.into());
        self
    }

    /// Re-insert at a position.
    pub fn position(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }

    /// Change the disabled flag.
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = Some(disabled);
        self
    }

    /// Replace the content reference.
    pub fn content(mut self, content: C) -> Self {
        self.content = Some(content);
        self
    }
}
