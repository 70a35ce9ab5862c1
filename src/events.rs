//! Listener registry used by every component to publish events.
//!
//! Each `on` call returns a [`Subscription`] disposer. Dropping the disposer (or
//! calling [`Subscription::unsubscribe`]) removes the listener. Owners that hold
//! many subscriptions keep them in a [`Subscriptions`] list and release them in one
//! pass on teardown.

use std::{
    cell::RefCell,
    fmt,
    rc::{Rc, Weak},
};

type Listener<E> = Rc<RefCell<dyn FnMut(&E)>>;

struct Entry<E> {
    id: u64,
    once: bool,
    listener: Listener<E>,
}

struct Registry<E> {
    next_id: u64,
    entries: Vec<Entry<E>>,
}

impl<E> Registry<E> {
    fn contains(&self, id: u64) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    fn remove(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        before != self.entries.len()
    }
}

/// Single-threaded event emitter.
pub struct Emitter<E> {
    registry: Rc<RefCell<Registry<E>>>,
}

impl<E> Default for Emitter<E> {
    fn default() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }
}

impl<E: 'static> fmt::Debug for Emitter<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl<E: 'static> Emitter<E> {
    /// Create an emitter without listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener invoked for every emitted event.
    pub fn on(&self, listener: impl FnMut(&E) + 'static) -> Subscription {
        self.register(listener, false)
    }

    /// Register a listener that is removed after its first invocation.
    pub fn once(&self, listener: impl FnMut(&E) + 'static) -> Subscription {
        self.register(listener, true)
    }

    fn register(&self, listener: impl FnMut(&E) + 'static, once: bool) -> Subscription {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.entries.push(Entry {
            id,
            once,
            listener: Rc::new(RefCell::new(listener)),
        });
        let weak: Weak<RefCell<Registry<E>>> = Rc::downgrade(&self.registry);
        Subscription::new(move || {
            if let Some(registry) = weak.upgrade() {
                registry.borrow_mut().remove(id);
            }
        })
    }

    /// Deliver `event` to every registered listener.
    ///
    /// Listeners run against a snapshot of the registry; a listener removed by an
    /// earlier listener in the same pass is skipped.
    pub fn emit(&self, event: &E) {
        let snapshot: Vec<(u64, bool, Listener<E>)> = {
            let mut registry = self.registry.borrow_mut();
            let snapshot = registry
                .entries
                .iter()
                .map(|entry| (entry.id, entry.once, Rc::clone(&entry.listener)))
                .collect();
            registry.entries.retain(|entry| !entry.once);
            snapshot
        };
        for (id, once, listener) in snapshot {
            if !once && !self.registry.borrow().contains(id) {
                continue;
            }
            if let Ok(mut callback) = listener.try_borrow_mut() {
                callback(event);
            }
        }
    }

    /// Number of live listeners.
    pub fn listener_count(&self) -> usize {
        self.registry.borrow().entries.len()
    }

    /// Drop every listener at once.
    pub fn clear(&self) {
        self.registry.borrow_mut().entries.clear();
    }
}

/// Disposer handle for a registered listener or any other scoped hook.
#[must_use = "dropping a Subscription disposes it immediately"]
pub struct Subscription {
    dispose: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Wrap an arbitrary disposer closure.
    pub fn new(dispose: impl FnOnce() + 'static) -> Self {
        Self {
            dispose: Some(Box::new(dispose)),
        }
    }

    /// Run the disposer now.
    pub fn unsubscribe(mut self) {
        self.dispose_now();
    }

    fn dispose_now(&mut self) {
        if let Some(dispose) = self.dispose.take() {
            dispose();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.dispose.is_some())
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.dispose_now();
    }
}

/// Owned list of disposers released together.
#[derive(Debug, Default)]
pub struct Subscriptions {
    items: Vec<Subscription>,
}

impl Subscriptions {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep `subscription` alive until the next [`release`](Self::release).
    pub fn push(&mut self, subscription: Subscription) {
        self.items.push(subscription);
    }

    /// Number of held disposers.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when nothing is held.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Dispose every held subscription.
    pub fn release(&mut self) {
        for subscription in self.items.drain(..) {
            subscription.unsubscribe();
        }
    }
}

impl Extend<Subscription> for Subscriptions {
    fn extend<T: IntoIterator<Item = Subscription>>(&mut self, iter: T) {
        self.items.extend(iter);
    }
}
