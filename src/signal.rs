//! Synchronous, payload-free change notification
//!
//! Subscribers are plain callbacks invoked in subscription order, in-line
//! with the mutation that fired the signal. There is no queue and no
//! isolation: a panicking subscriber propagates to the caller, and whatever
//! mutation already happened stays applied.

use std::fmt;

/// Handle identifying one subscription, for later removal
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut() + Send>;

/// An ordered list of subscriber callbacks fired once per change
pub struct ChangeSignal {
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_id: u64,
}

impl ChangeSignal {
    /// Create a signal with no subscribers
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
            next_id: 0,
        }
    }

    /// Add a subscriber, invoked on every emit until unsubscribed
    pub fn subscribe(&mut self, callback: impl FnMut() + Send + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a subscriber
    ///
    /// Returns false if the subscription was already removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() != before
    }

    /// Invoke every subscriber synchronously, in subscription order
    ///
    /// Carries no payload; subscribers re-read whatever state they observe.
    pub fn emit(&mut self) {
        for (_, callback) in self.subscribers.iter_mut() {
            callback();
        }
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl Default for ChangeSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ChangeSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChangeSignal({} subscribers)", self.subscribers.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn test_emit_reaches_subscriber() {
        let mut signal = ChangeSignal::new();
        let count = Arc::new(Mutex::new(0));

        let count_clone = Arc::clone(&count);
        signal.subscribe(move || *count_clone.lock() += 1);

        signal.emit();
        signal.emit();
        assert_eq!(*count.lock(), 2);
    }

    #[test]
    fn test_delivery_in_subscription_order() {
        let mut signal = ChangeSignal::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let order_clone = Arc::clone(&order);
            signal.subscribe(move || order_clone.lock().push(tag));
        }

        signal.emit();
        assert_eq!(*order.lock(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let mut signal = ChangeSignal::new();
        let count = Arc::new(Mutex::new(0));

        let count_clone = Arc::clone(&count);
        let id = signal.subscribe(move || *count_clone.lock() += 1);

        signal.emit();
        assert!(signal.unsubscribe(id));
        signal.emit();

        assert_eq!(*count.lock(), 1);
        assert_eq!(signal.subscriber_count(), 0);
    }

    #[test]
    fn test_unsubscribe_twice_reports_false() {
        let mut signal = ChangeSignal::new();
        let id = signal.subscribe(|| {});

        assert!(signal.unsubscribe(id));
        assert!(!signal.unsubscribe(id));
    }

    #[test]
    fn test_emit_without_subscribers_is_noop() {
        let mut signal = ChangeSignal::new();
        signal.emit();
        assert_eq!(signal.subscriber_count(), 0);
    }
}
