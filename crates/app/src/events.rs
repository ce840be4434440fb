//! Scoped event subscriptions
//!
//! An [`EventHub`] fans events out to every live [`Subscription`]. Dropping
//! a subscription unregisters it, so a component that goes away cannot
//! leave a listener behind.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::mpsc;

struct Registry<E> {
    next_id: u64,
    senders: Vec<(u64, mpsc::UnboundedSender<E>)>,
}

/// Broadcast point for one kind of event
pub struct EventHub<E> {
    registry: Arc<Mutex<Registry<E>>>,
}

impl<E> Clone for EventHub<E> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
        }
    }
}

impl<E: Clone> Default for EventHub<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Clone> EventHub<E> {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry {
                next_id: 0,
                senders: Vec::new(),
            })),
        }
    }

    /// Register a new listener
    pub fn subscribe(&self) -> Subscription<E> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        let id = registry.next_id;
        registry.next_id += 1;
        registry.senders.push((id, tx));

        Subscription {
            id,
            rx,
            registry: self.registry.clone(),
        }
    }

    /// Deliver `event` to every live subscriber, pruning closed ones
    pub fn emit(&self, event: E) {
        let mut registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        registry
            .senders
            .retain(|(_, tx)| tx.send(event.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .senders
            .len()
    }
}

/// A live registration on an [`EventHub`]
pub struct Subscription<E> {
    id: u64,
    rx: mpsc::UnboundedReceiver<E>,
    registry: Arc<Mutex<Registry<E>>>,
}

impl<E> Subscription<E> {
    /// Wait for the next event
    pub async fn recv(&mut self) -> Option<E> {
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<E> {
        self.rx.try_recv().ok()
    }
}

impl<E> Drop for Subscription<E> {
    fn drop(&mut self) {
        let mut registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        registry.senders.retain(|(id, _)| *id != self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fan_out() {
        let hub = EventHub::new();
        let mut a = hub.subscribe();
        let mut b = hub.subscribe();

        hub.emit(7u32);
        assert_eq!(a.recv().await, Some(7));
        assert_eq!(b.recv().await, Some(7));
    }

    #[test]
    fn test_drop_unregisters() {
        let hub: EventHub<u32> = EventHub::new();
        let first = hub.subscribe();
        {
            let _second = hub.subscribe();
            assert_eq!(hub.subscriber_count(), 2);
        }
        assert_eq!(hub.subscriber_count(), 1);
        drop(first);
        assert_eq!(hub.subscriber_count(), 0);

        // Emitting with nobody listening is fine
        hub.emit(1);
    }

    #[test]
    fn test_late_subscriber_misses_earlier_events() {
        let hub = EventHub::new();
        hub.emit("early");
        let mut sub = hub.subscribe();
        assert_eq!(sub.try_recv(), None);
        hub.emit("late");
        assert_eq!(sub.try_recv(), Some("late"));
    }
}
