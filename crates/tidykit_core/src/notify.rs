//! Change notification for state holders.
//!
//! Services publish typed events after each committed or rolled-back
//! mutation; observers subscribe and unsubscribe by dropping the receiver.

use tokio::sync::broadcast;

const DEFAULT_CAPACITY: usize = 64;

/// Broadcasts `E` to every live subscriber.
///
/// Sending never blocks and never fails when nobody listens. Slow
/// subscribers observe `RecvError::Lagged` rather than stalling the sender.
#[derive(Debug, Clone)]
pub struct ChangeNotifier<E: Clone> {
    tx: broadcast::Sender<E>,
}

impl<E: Clone> Default for ChangeNotifier<E> {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl<E: Clone> ChangeNotifier<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Starts receiving events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<E> {
        self.tx.subscribe()
    }

    pub fn notify(&self, event: E) {
        let _ = self.tx.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::ChangeNotifier;

    #[test]
    fn subscribers_receive_events_until_dropped() {
        let notifier = ChangeNotifier::<u32>::new();
        notifier.notify(0);

        let mut rx = notifier.subscribe();
        assert_eq!(notifier.subscriber_count(), 1);
        notifier.notify(7);
        assert_eq!(rx.try_recv().unwrap(), 7);
        assert!(rx.try_recv().is_err());

        drop(rx);
        assert_eq!(notifier.subscriber_count(), 0);
        notifier.notify(8);
    }
}
