//! # Feed Publisher
//!
//! The publishing side of a live sequence.

use crate::subscription::FeedSubscription;
use crate::LiveSequence;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// Latest-value publisher backed by `tokio::sync::watch`.
///
/// The feed starts empty; subscribers see nothing until the first
/// `publish`. Publishing with no subscribers still records the value so that
/// later subscribers start from it.
pub struct FeedPublisher<T> {
    /// Watch sender; `None` until the first publish.
    sender: watch::Sender<Option<T>>,

    /// Feed name used in log fields.
    name: Arc<str>,

    /// Total values published.
    values_published: AtomicU64,

    /// Total subscriptions ever opened.
    subscriptions_opened: AtomicU64,
}

impl<T> FeedPublisher<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create an empty feed.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            sender,
            name: name.into(),
            values_published: AtomicU64::new(0),
            subscriptions_opened: AtomicU64::new(0),
        }
    }

    /// Create a feed that already holds `value`.
    #[must_use]
    pub fn with_value(name: impl Into<Arc<str>>, value: T) -> Self {
        let feed = Self::new(name);
        feed.publish(value);
        feed
    }

    /// Replace the feed's value and wake every subscriber.
    ///
    /// # Returns
    ///
    /// The number of live subscriptions that will observe the value.
    pub fn publish(&self, value: T) -> usize {
        self.values_published.fetch_add(1, Ordering::Relaxed);
        self.sender.send_replace(Some(value));
        let receivers = self.sender.receiver_count();
        debug!(feed = %self.name, receivers, "Feed value published");
        receivers
    }

    /// Subscribe to this feed.
    #[must_use]
    pub fn subscribe(&self) -> FeedSubscription<T> {
        self.subscriptions_opened.fetch_add(1, Ordering::Relaxed);
        debug!(feed = %self.name, "New feed subscription created");
        FeedSubscription::new(self.sender.subscribe(), Arc::clone(&self.name))
    }

    /// Subscribe and box the subscription as a `LiveSequence`.
    #[must_use]
    pub fn sequence(&self) -> LiveSequence<T> {
        Box::pin(self.subscribe())
    }

    /// The most recently published value.
    #[must_use]
    pub fn latest(&self) -> Option<T> {
        self.sender.borrow().clone()
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Total values published since creation.
    #[must_use]
    pub fn values_published(&self) -> u64 {
        self.values_published.load(Ordering::Relaxed)
    }

    /// Total subscriptions opened since creation, including dropped ones.
    #[must_use]
    pub fn subscriptions_opened(&self) -> u64 {
        self.subscriptions_opened.load(Ordering::Relaxed)
    }

    /// Feed name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}
