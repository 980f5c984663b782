//! # Adapters Layer (Hexagonal Architecture)
//!
//! - `subscription`: fans the source ports into one update stream
//! - `memory`: feed-backed sources and recording action doubles

pub mod memory;
pub mod subscription;

pub use memory::{
    MemorySources, ReadyOnceRoster, RecordedActions, RecordingClipboard, RecordingMemberGateway,
    ScriptedPrompt,
};
pub use subscription::{SourceKind, SourceSubscriptionManager, SourceUpdate};
