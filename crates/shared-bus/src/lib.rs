//! # Shared Bus - Live Sequences
//!
//! Every source the invitation subsystem consumes is a *live sequence*: a
//! stream that delivers a whole new value whenever the underlying data
//! changes and never fails. This crate provides the plumbing:
//!
//! ```text
//! ┌──────────────┐   publish()   ┌──────────────┐  subscribe()  ┌──────────────┐
//! │   Adapter    │ ────────────→ │ FeedPublisher│ ────────────→ │ Subscription │
//! │ (fetch/push) │               │ latest value │               │   (Stream)   │
//! └──────────────┘               └──────────────┘               └──────────────┘
//! ```
//!
//! ## Semantics
//!
//! - **Latest-value only:** a slow subscriber observes the newest value, not
//!   every intermediate one. Combine-latest consumers need nothing more.
//! - **Late subscribers** receive the current value immediately.
//! - **Teardown:** dropping a subscription releases it; dropping the publisher
//!   ends every subscription's stream.

#![allow(clippy::missing_const_for_fn)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod feed;
pub mod subscription;

use std::pin::Pin;
use tokio_stream::Stream;

pub use feed::FeedPublisher;
pub use subscription::{FeedError, FeedSubscription};

/// A boxed, never-failing live sequence of values.
pub type LiveSequence<T> = Pin<Box<dyn Stream<Item = T> + Send + 'static>>;

/// A live sequence that delivers one value and completes.
pub fn once<T: Send + 'static>(value: T) -> LiveSequence<T> {
    Box::pin(tokio_stream::once(value))
}

/// A live sequence that delivers the given values in order and completes.
pub fn from_values<T: Send + 'static>(values: Vec<T>) -> LiveSequence<T> {
    Box::pin(tokio_stream::iter(values))
}

/// A live sequence that never delivers and never completes.
pub fn pending<T: Send + 'static>() -> LiveSequence<T> {
    Box::pin(tokio_stream::pending())
}
