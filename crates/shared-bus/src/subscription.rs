//! # Feed Subscription
//!
//! The receiving side of a live sequence.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tokio_stream::{Stream, StreamExt};
use tracing::debug;

/// Errors from subscription operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FeedError {
    /// The publisher was dropped.
    #[error("Feed closed")]
    Closed,
}

/// A subscription to a `FeedPublisher`.
///
/// Yields the feed's current value first (if any), then every value
/// published afterwards, coalescing values the subscriber was too slow to see.
/// When dropped, the subscription is released.
pub struct FeedSubscription<T> {
    /// Watch-backed stream; `None` items mean "not yet published".
    inner: WatchStream<Option<T>>,

    /// Feed name for log fields.
    name: Arc<str>,
}

impl<T> FeedSubscription<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub(crate) fn new(receiver: watch::Receiver<Option<T>>, name: Arc<str>) -> Self {
        Self {
            inner: WatchStream::new(receiver),
            name,
        }
    }

    /// Receive the next value.
    ///
    /// # Errors
    ///
    /// `FeedError::Closed` once the publisher has been dropped.
    pub async fn recv(&mut self) -> Result<T, FeedError> {
        self.next().await.ok_or(FeedError::Closed)
    }

    /// Name of the feed this subscription reads.
    #[must_use]
    pub fn feed_name(&self) -> &str {
        &self.name
    }
}

impl<T> Stream for FeedSubscription<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            match Pin::new(&mut self.inner).poll_next(cx) {
                Poll::Ready(Some(Some(value))) => return Poll::Ready(Some(value)),
                // Feed not yet published
                Poll::Ready(Some(None)) => continue,
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

impl<T> Drop for FeedSubscription<T> {
    fn drop(&mut self) {
        debug!(feed = %self.name, "Feed subscription dropped");
    }
}
