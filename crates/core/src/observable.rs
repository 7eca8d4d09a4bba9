//! Observable value with synchronous subscriber notification
//!
//! Shared by the session and theme stores. A listener is called once with the
//! current value when it subscribes and then after every change. Listeners run
//! after the write lock is released, so a listener that reads the value back
//! always sees the new one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock, Weak};

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Thread-safe value that broadcasts changes to its subscribers
///
/// Notifications are not serialized across threads: when two threads call
/// [`Observable::set`] at once, a subscriber may see the two values in the
/// opposite order of the writes, so its last callback can carry the value
/// that was overwritten. [`Observable::get`] always returns the stored value.
/// On a single thread, callbacks follow the writes in order, including writes
/// made from inside a listener.
pub struct Observable<T> {
    inner: Arc<ObservableInner<T>>,
}

struct ObservableInner<T> {
    value: RwLock<T>,
    listeners: Mutex<Vec<(u64, Listener<T>)>>,
    next_id: AtomicU64,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(ObservableInner {
                value: RwLock::new(value),
                listeners: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Get a copy of the current value
    pub fn get(&self) -> T {
        self.inner
            .value
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the value and notify every subscriber
    pub fn set(&self, value: T) {
        {
            let mut current = self
                .inner
                .value
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            *current = value.clone();
        }
        self.notify(&value);
    }

    /// Derive the next value from the current one, store it and return it
    pub fn update(&self, f: impl FnOnce(&T) -> T) -> T {
        let next = {
            let mut current = self
                .inner
                .value
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            let next = f(&current);
            *current = next.clone();
            next
        };
        self.notify(&next);
        next
    }

    /// Register a listener; it is invoked immediately with the current value
    pub fn subscribe(&self, listener: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let listener: Listener<T> = Arc::new(listener);
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);

        listener(&self.get());

        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, listener));

        let owner: Weak<dyn Detach> = Arc::downgrade(&self.inner) as Weak<dyn Detach>;
        Subscription { id, owner }
    }

    /// Number of live subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn notify(&self, value: &T) {
        // Snapshot so listeners may subscribe, unsubscribe or set re-entrantly.
        let listeners: Vec<Listener<T>> = self
            .inner
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        for listener in listeners {
            listener(value);
        }
    }
}

trait Detach: Send + Sync {
    fn detach(&self, id: u64);
}

impl<T: Send + Sync> Detach for ObservableInner<T> {
    fn detach(&self, id: u64) {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(listener_id, _)| *listener_id != id);
    }
}

/// Handle returned by `subscribe`
///
/// Dropping the handle keeps the listener registered; call
/// [`Subscription::unsubscribe`] to detach it.
#[must_use = "keep the handle to be able to unsubscribe later"]
pub struct Subscription {
    id: u64,
    owner: Weak<dyn Detach>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        if let Some(owner) = self.owner.upgrade() {
            owner.detach(self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscribe_receives_current_then_changes() {
        let value = Observable::new(1);
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        let _sub = value.subscribe(move |v| sink.lock().unwrap().push(*v));
        value.set(2);
        value.update(|v| v + 1);

        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let value = Observable::new(0);
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        let sub = value.subscribe(move |v| sink.lock().unwrap().push(*v));
        assert_eq!(value.subscriber_count(), 1);

        sub.unsubscribe();
        value.set(5);

        assert_eq!(value.subscriber_count(), 0);
        assert_eq!(*seen.lock().unwrap(), vec![0]);
    }

    #[test]
    fn test_listener_may_set_reentrantly() {
        let value = Observable::new(0);
        let seen = Arc::new(Mutex::new(Vec::new()));

        let writer = value.clone();
        let sink = Arc::clone(&seen);
        let _sub = value.subscribe(move |v| {
            sink.lock().unwrap().push(*v);
            if *v == 1 {
                writer.set(2);
            }
        });
        value.set(1);

        assert_eq!(value.get(), 2);
        assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_listener_reading_during_notification_sees_new_value() {
        let value = Observable::new(String::from("old"));
        let observed = Arc::new(Mutex::new(Vec::new()));

        let reader = value.clone();
        let sink = Arc::clone(&observed);
        let _sub = value.subscribe(move |_| sink.lock().unwrap().push(reader.get()));
        value.set("new".to_string());

        assert_eq!(*observed.lock().unwrap(), vec!["old", "new"]);
    }
}
