// input/bus.rs
//
// Explicit event source handed to scenes through the engine context.
// Scenes subscribe to the channels they care about and keep the returned
// `Subscription`; passing it back to `unsubscribe` is the only way to stop
// delivery, and the handle cannot be copied.

use crate::input::queue::{InputChannel, InputEvent, InputQueue};

/// Disposer for a bus subscription. Not `Clone`: one handle, one unsubscribe.
#[derive(Debug, PartialEq, Eq)]
pub struct Subscription(u32);

impl Subscription {
    pub fn id(&self) -> u32 {
        self.0
    }
}

struct Subscriber {
    id: u32,
    channels: Vec<InputChannel>,
    queue: InputQueue,
}

pub struct InputBus {
    subscribers: Vec<Subscriber>,
    next_id: u32,
}

impl InputBus {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
            next_id: 1,
        }
    }

    /// Start receiving events on `channels`.
    pub fn subscribe(&mut self, channels: &[InputChannel]) -> Subscription {
        let id = self.next_id;
        self.next_id += 1;
        self.subscribers.push(Subscriber {
            id,
            channels: channels.to_vec(),
            queue: InputQueue::new(),
        });
        Subscription(id)
    }

    /// Stop delivery and drop anything still queued for this subscriber.
    pub fn unsubscribe(&mut self, subscription: Subscription) {
        self.subscribers.retain(|s| s.id != subscription.0);
    }

    /// Deliver an event to every live subscriber listening on its channel.
    pub fn publish(&mut self, event: InputEvent) {
        let channel = event.channel();
        for sub in self.subscribers.iter_mut() {
            if sub.channels.contains(&channel) {
                sub.queue.push(event);
            }
        }
    }

    /// Take the events queued for `subscription` since the last drain.
    pub fn drain(&mut self, subscription: &Subscription) -> Vec<InputEvent> {
        self.subscribers
            .iter_mut()
            .find(|s| s.id == subscription.0)
            .map(|s| s.queue.drain())
            .unwrap_or_default()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Remove every subscription (teardown).
    pub fn clear(&mut self) {
        if !self.subscribers.is_empty() {
            log::debug!("dropping {} input subscriptions", self.subscribers.len());
        }
        self.subscribers.clear();
    }
}

impl Default for InputBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::keys::KeyCode;

    #[test]
    fn delivers_only_matching_channels() {
        let mut bus = InputBus::new();
        let keys = bus.subscribe(&[InputChannel::Keyboard]);
        let ui = bus.subscribe(&[InputChannel::Ui]);
        bus.publish(InputEvent::KeyDown { key: KeyCode::W });
        assert_eq!(bus.drain(&keys).len(), 1);
        assert!(bus.drain(&ui).is_empty());
    }

    #[test]
    fn unsubscribed_handle_stops_delivery() {
        let mut bus = InputBus::new();
        let sub = bus.subscribe(&[InputChannel::Keyboard]);
        let id = sub.id();
        bus.unsubscribe(sub);
        bus.publish(InputEvent::KeyDown { key: KeyCode::W });
        assert_eq!(bus.subscriber_count(), 0);
        assert!(bus.drain(&Subscription(id)).is_empty());
    }

    #[test]
    fn each_subscriber_gets_its_own_copy() {
        let mut bus = InputBus::new();
        let a = bus.subscribe(&[InputChannel::Pointer]);
        let b = bus.subscribe(&[InputChannel::Pointer, InputChannel::Keyboard]);
        bus.publish(InputEvent::Wheel { delta: 1.0 });
        assert_eq!(bus.drain(&a).len(), 1);
        assert_eq!(bus.drain(&b).len(), 1);
        assert!(bus.drain(&a).is_empty());
    }
}
