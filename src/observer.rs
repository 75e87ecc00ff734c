// Observer contract - state-change notification for model collaborators
//
// The model is single-threaded by contract, so observers are plain `Rc`
// handles. Membership is keyed by pointer identity: subscribing the same
// handle twice has no additional effect. Observers are stored weakly; one
// that is dropped simply stops being notified.

use std::rc::{Rc, Weak};

/// A collaborator interested in model state changes. `update` is invoked
/// synchronously after every committed mutation and on manual refreshes;
/// implementations re-query the model and take shared `&self`, so any state
/// they touch needs interior mutability.
pub trait ModelObserver {
    fn update(&self);
}

/// The set of subscribed observers.
#[derive(Default)]
pub struct ObserverSet {
    observers: Vec<Weak<dyn ModelObserver>>,
}

impl ObserverSet {
    pub fn new() -> Self {
        ObserverSet::default()
    }

    /// Register an observer. Idempotent for the same handle.
    pub fn subscribe(&mut self, observer: &Rc<dyn ModelObserver>) {
        self.prune();
        let handle = Rc::downgrade(observer);
        if !self.observers.iter().any(|o| Weak::ptr_eq(o, &handle)) {
            self.observers.push(handle);
        }
    }

    /// Remove an observer by identity. No-op if it was never subscribed.
    pub fn unsubscribe(&mut self, observer: &Rc<dyn ModelObserver>) {
        let handle = Rc::downgrade(observer);
        self.observers.retain(|o| !Weak::ptr_eq(o, &handle));
    }

    /// Invoke every live observer's `update` callback. Iteration order is
    /// unspecified by contract.
    pub fn notify(&self) {
        for observer in &self.observers {
            if let Some(observer) = observer.upgrade() {
                observer.update();
            }
        }
    }

    /// Count of live observers.
    pub fn len(&self) -> usize {
        self.observers.iter().filter(|o| o.strong_count() > 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn prune(&mut self) {
        self.observers.retain(|o| o.strong_count() > 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct CountingObserver {
        calls: Cell<usize>,
    }

    impl CountingObserver {
        fn new() -> Rc<Self> {
            Rc::new(CountingObserver { calls: Cell::new(0) })
        }
    }

    impl ModelObserver for CountingObserver {
        fn update(&self) {
            self.calls.set(self.calls.get() + 1);
        }
    }

    #[test]
    fn test_notify_reaches_every_observer() {
        let mut set = ObserverSet::new();
        let first = CountingObserver::new();
        let second = CountingObserver::new();

        set.subscribe(&(first.clone() as Rc<dyn ModelObserver>));
        set.subscribe(&(second.clone() as Rc<dyn ModelObserver>));
        assert_eq!(set.len(), 2);

        set.notify();
        set.notify();

        assert_eq!(first.calls.get(), 2);
        assert_eq!(second.calls.get(), 2);
    }

    #[test]
    fn test_subscribe_is_idempotent() {
        let mut set = ObserverSet::new();
        let observer = CountingObserver::new();
        let handle = observer.clone() as Rc<dyn ModelObserver>;

        set.subscribe(&handle);
        set.subscribe(&handle);
        assert_eq!(set.len(), 1);

        set.notify();
        assert_eq!(observer.calls.get(), 1);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let mut set = ObserverSet::new();
        let observer = CountingObserver::new();
        let handle = observer.clone() as Rc<dyn ModelObserver>;

        set.subscribe(&handle);
        set.notify();
        assert_eq!(observer.calls.get(), 1);

        set.unsubscribe(&handle);
        assert!(set.is_empty());

        set.notify();
        assert_eq!(observer.calls.get(), 1);
    }

    #[test]
    fn test_unsubscribe_unknown_observer_is_noop() {
        let mut set = ObserverSet::new();
        let subscribed = CountingObserver::new();
        let stranger = CountingObserver::new();

        set.subscribe(&(subscribed.clone() as Rc<dyn ModelObserver>));
        set.unsubscribe(&(stranger as Rc<dyn ModelObserver>));

        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_dropped_observer_falls_away() {
        let mut set = ObserverSet::new();
        let observer = CountingObserver::new();
        set.subscribe(&(observer.clone() as Rc<dyn ModelObserver>));

        drop(observer);
        set.notify(); // must not panic on the dead handle
        assert!(set.is_empty());
    }
}
