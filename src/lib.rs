//! # spark-teleport
//!
//! Reactive content teleportation for Rust.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for
//! fine-grained reactivity.
//!
//! A teleport redirects content from the point where it is authored (the
//! origin) to a named destination rendered elsewhere in the tree. The core
//! is a registry of active teleports - key, position, destination,
//! disabled flag, opaque content reference, forwarded context - that every
//! consumer reads through derived views, so origins, targets, and
//! inspection tooling stay consistent without talking to each other.
//!
//! ## Architecture
//!
//! The data flow is purely derived-based:
//!
//! ```text
//! Origin → Registry records (Signal fields) → indexDerived / targetDeriveds → render targets
//! ```
//!
//! Record fields are reactive cells: writing `record.disabled.set(true)`
//! invalidates exactly the views that read the flag, and the next `.get()`
//! recomputes the listing. Rendering and mounting belong to the host
//! framework; this crate only keeps the registry consistent.
//!
//! ## Modules
//!
//! - [`registry`] - The shared ordered record store (create/update/destroy)
//! - [`record`] - `Teleport` records and their attribute types
//! - [`view`] - Derived listings (full index, per-destination targets)
//! - [`handle`] - Lifetime-tied authoring handle
//! - [`context`] - Serializable context bag forwarded with each record
//! - [`error`] - Error taxonomy

pub mod context;
pub mod error;
pub mod handle;
pub mod record;
pub mod registry;
pub mod view;

// Re-export commonly used items
pub use context::ContextBag;
pub use error::TeleportError;
pub use handle::TeleportHandle;
pub use record::{Teleport, TeleportAttrs, TeleportUpdate};
pub use registry::{DuplicateKeyPolicy, Registry, RegistryConfig};
pub use view::{TeleportView, create_index_derived, create_target_derived};
