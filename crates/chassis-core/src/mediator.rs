use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde_json::Value;

/// A subscriber callback. Receives each published payload by reference.
pub type Callback = Rc<dyn Fn(&Value)>;

/// A synchronous publish/subscribe bus.
///
/// Channels are open-ended strings mapped to ordered subscriber lists. A
/// channel is created lazily by the first `subscribe` to its name and is
/// never removed; there is no unsubscribe operation. Delivery is synchronous
/// and FIFO: `publish` invokes every subscriber in subscription order and
/// returns once all of them have run.
///
/// `Mediator` is a cheap handle: cloning it (or calling
/// [`handle`](Mediator::handle)) yields another identity backed by the
/// *same* channel store, so any handle can grant mediator capability to
/// another owner without forking the bus.
#[derive(Clone)]
pub struct Mediator {
    channels: Rc<RefCell<HashMap<String, Vec<Callback>>>>,
}

impl Default for Mediator {
    fn default() -> Self {
        Self::new()
    }
}

impl Mediator {
    /// Create a bus with no channels.
    pub fn new() -> Self {
        Self {
            channels: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    /// Append `callback` to the channel's subscriber list, creating the
    /// channel if it does not exist yet. Returns self for chaining.
    ///
    /// Any channel name and callback are accepted; there are no error
    /// conditions.
    pub fn subscribe(
        &self,
        channel: impl Into<String>,
        callback: impl Fn(&Value) + 'static,
    ) -> &Self {
        self.channels
            .borrow_mut()
            .entry(channel.into())
            .or_default()
            .push(Rc::new(callback));
        self
    }

    /// Deliver `payload` to every subscriber of `channel`, in subscription
    /// order. A channel nobody has subscribed to is a no-op. Returns self
    /// for chaining once all subscribers have run.
    ///
    /// The subscriber list is snapshotted before dispatch, so callbacks may
    /// re-enter the bus. A subscription added while a publish is in flight
    /// does not receive that publish.
    pub fn publish(&self, channel: &str, payload: Value) -> &Self {
        let subscribers: Vec<Callback> = match self.channels.borrow().get(channel) {
            Some(subscribers) => subscribers.to_vec(),
            None => return self,
        };

        for callback in subscribers {
            callback(&payload);
        }

        self
    }

    /// Return a new handle backed by the same channel store.
    ///
    /// This is how another owner is granted publish/subscribe capability:
    /// every handle dispatches through the one shared bus.
    pub fn handle(&self) -> Mediator {
        self.clone()
    }

    /// Number of subscribers currently registered on `channel`.
    pub fn subscriber_count(&self, channel: &str) -> usize {
        self.channels
            .borrow()
            .get(channel)
            .map_or(0, |subscribers| subscribers.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    type Seen = Rc<RefCell<Vec<String>>>;

    fn recording(seen: &Seen, tag: &'static str) -> impl Fn(&Value) {
        let seen = seen.clone();
        move |payload| seen.borrow_mut().push(format!("{tag}:{payload}"))
    }

    #[test]
    fn publish_without_subscribers_is_noop() {
        let bus = Mediator::new();
        bus.publish("nobody-home", json!(1)).publish("nobody-home", json!(2));
        assert_eq!(bus.subscriber_count("nobody-home"), 0);
    }

    #[test]
    fn subscribe_creates_channel_lazily() {
        let bus = Mediator::new();
        assert_eq!(bus.subscriber_count("tick"), 0);
        bus.subscribe("tick", |_| {});
        assert_eq!(bus.subscriber_count("tick"), 1);
    }

    #[test]
    fn delivery_order_matches_subscription_order() {
        let bus = Mediator::new();
        let seen: Seen = Rc::new(RefCell::new(Vec::new()));

        bus.subscribe("ping", recording(&seen, "first"))
            .subscribe("ping", recording(&seen, "second"));
        bus.publish("ping", json!(42));

        assert_eq!(seen.borrow().as_slice(), &["first:42", "second:42"]);
    }

    #[test]
    fn publish_only_reaches_the_named_channel() {
        let bus = Mediator::new();
        let seen: Seen = Rc::new(RefCell::new(Vec::new()));

        bus.subscribe("ping", recording(&seen, "ping"));
        bus.subscribe("pong", recording(&seen, "pong"));
        bus.publish("pong", json!("x"));

        assert_eq!(seen.borrow().as_slice(), &["pong:\"x\""]);
    }

    #[test]
    fn handles_share_one_channel_store() {
        let bus = Mediator::new();
        let other = bus.handle();
        let seen: Seen = Rc::new(RefCell::new(Vec::new()));

        bus.subscribe("shared", recording(&seen, "sub"));
        other.publish("shared", json!(7));

        assert_eq!(seen.borrow().as_slice(), &["sub:7"]);
        assert_eq!(other.subscriber_count("shared"), 1);
    }

    #[test]
    fn subscription_added_mid_publish_misses_that_publish() {
        let bus = Mediator::new();
        let seen: Seen = Rc::new(RefCell::new(Vec::new()));

        let inner_bus = bus.clone();
        let inner_seen = seen.clone();
        bus.subscribe("late", move |_| {
            inner_bus.subscribe("late", recording(&inner_seen, "added"));
        });

        bus.publish("late", json!(1));
        assert!(seen.borrow().is_empty());

        bus.publish("late", json!(2));
        assert_eq!(seen.borrow().as_slice(), &["added:2"]);
    }

    #[test]
    fn callback_may_publish_reentrantly() {
        let bus = Mediator::new();
        let seen: Seen = Rc::new(RefCell::new(Vec::new()));

        let inner_bus = bus.clone();
        bus.subscribe("outer", move |_| {
            inner_bus.publish("inner", json!("nested"));
        });
        bus.subscribe("inner", recording(&seen, "inner"));

        bus.publish("outer", json!(0));
        assert_eq!(seen.borrow().as_slice(), &["inner:\"nested\""]);
    }

    #[test]
    fn subscribe_and_publish_chain() {
        let bus = Mediator::new();
        let seen: Seen = Rc::new(RefCell::new(Vec::new()));

        bus.subscribe("a", recording(&seen, "a"))
            .publish("a", json!(1))
            .publish("a", json!(2));

        assert_eq!(seen.borrow().as_slice(), &["a:1", "a:2"]);
    }
}
