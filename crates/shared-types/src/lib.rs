//! # Shared Types Crate
//!
//! Identity, roster and group entities consumed by the invitation subsystem
//! and produced by the external source adapters.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: Every cross-crate entity is defined here.
//! - **Immutable Snapshots**: Sources deliver whole values; nothing here is
//!   patched in place after delivery.
//! - **Identity by `PeerId`**: Equality of peers across sources is decided by
//!   identity alone, never by display metadata.

pub mod entities;

pub use entities::*;
