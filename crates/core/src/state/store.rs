use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync + 'static>;

struct StoreInner<T> {
    value: T,
    subscribers: HashMap<u64, Callback<T>>,
    next_id: u64,
}

/// Single-value observable container. One instance per cross-cutting fact
/// (share target, feedback message, cookie consent); each store has exactly
/// one writer role even when it has many readers.
///
/// Clones are handles onto the same underlying value.
pub struct SharedState<T> {
    inner: Arc<Mutex<StoreInner<T>>>,
}

impl<T> Clone for SharedState<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone> SharedState<T> {
    pub fn new(initial: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(StoreInner {
                value: initial,
                subscribers: HashMap::new(),
                next_id: 0,
            })),
        }
    }

    /// Current value, synchronously. Never blocks on anything but the
    /// store's own short critical section, never fails.
    pub fn read(&self) -> T {
        lock(&self.inner).value.clone()
    }

    /// Replaces the value atomically and notifies every current subscriber
    /// before returning. Callbacks run outside the internal lock so a
    /// subscriber may read the store again.
    pub fn update(&self, value: T) {
        let (current, callbacks) = {
            let mut inner = lock(&self.inner);
            inner.value = value;
            let callbacks: Vec<Callback<T>> = inner.subscribers.values().cloned().collect();
            (inner.value.clone(), callbacks)
        };

        for callback in callbacks {
            callback(&current);
        }
    }

    pub fn subscribe(&self, callback: impl Fn(&T) + Send + Sync + 'static) -> Subscription<T> {
        let mut inner = lock(&self.inner);
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subscribers.insert(id, Arc::new(callback));
        Subscription {
            store: Arc::downgrade(&self.inner),
            id,
        }
    }
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Unsubscribe handle returned by [`SharedState::subscribe`]. Calling it
/// after the store is gone is a no-op.
pub struct Subscription<T> {
    store: Weak<Mutex<StoreInner<T>>>,
    id: u64,
}

impl<T> Subscription<T> {
    pub fn unsubscribe(self) {
        if let Some(inner) = self.store.upgrade() {
            lock(&inner).subscribers.remove(&self.id);
        }
    }
}
