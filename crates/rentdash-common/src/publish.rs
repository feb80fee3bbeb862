//! Snapshot publishing shared by the stores.
//!
//! A `Publisher` keeps the latest immutable snapshot and the store's
//! request bookkeeping behind one lock. Every transition clones the
//! snapshot, lets the store edit the copy, derives `loading` from the
//! pending counter and hands the new `Arc` to every listener, outside the
//! lock.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub type Listener<S> = Arc<dyn Fn(&Arc<S>) + Send + Sync>;

/// Snapshots that expose an in-flight flag.
pub trait Loading: Clone {
    fn set_loading(&mut self, loading: bool);
}

/// Per-store bookkeeping that never reaches the views.
pub(crate) struct Books<X> {
    /// Actions awaiting the backend.
    pub pending: usize,
    /// Sequence ids of the latest read per slot.
    pub seq: X,
}

struct Locked<S, X> {
    snapshot: Arc<S>,
    books: Books<X>,
}

pub(crate) struct Publisher<S, X> {
    state: Mutex<Locked<S, X>>,
    listeners: Mutex<Vec<Listener<S>>>,
}

impl<S: Loading, X> Publisher<S, X> {
    pub fn new(initial: S, seq: X) -> Self {
        Self {
            state: Mutex::new(Locked {
                snapshot: Arc::new(initial),
                books: Books { pending: 0, seq },
            }),
            listeners: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Locked<S, X>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> Arc<S> {
        Arc::clone(&self.lock().snapshot)
    }

    pub fn subscribe(&self, listener: Listener<S>) {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(listener);
    }

    /// Apply `f` to a copy of the snapshot and publish the result.
    pub fn transition<R>(&self, f: impl FnOnce(&mut Books<X>, &mut S) -> R) -> R {
        let (snapshot, out) = {
            let mut locked = self.lock();
            let mut next = (*locked.snapshot).clone();
            let out = f(&mut locked.books, &mut next);
            next.set_loading(locked.books.pending > 0);
            let snapshot = Arc::new(next);
            locked.snapshot = Arc::clone(&snapshot);
            (snapshot, out)
        };
        let listeners = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for listener in listeners {
            listener(&snapshot);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Counter {
        value: u32,
        loading: bool,
    }

    impl Loading for Counter {
        fn set_loading(&mut self, loading: bool) {
            self.loading = loading;
        }
    }

    #[test]
    fn loading_follows_pending_and_listeners_see_each_snapshot() {
        let publisher = Publisher::new(Counter::default(), ());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        publisher.subscribe(Arc::new(move |s: &Arc<Counter>| {
            sink.lock().unwrap().push((s.value, s.loading));
        }));

        publisher.transition(|books, s| {
            books.pending += 1;
            s.value = 1;
        });
        publisher.transition(|books, s| {
            books.pending -= 1;
            s.value = 2;
        });

        assert_eq!(*seen.lock().unwrap(), [(1, true), (2, false)]);
        assert_eq!(publisher.snapshot().value, 2);
    }

    #[test]
    fn earlier_snapshots_are_not_mutated() {
        let publisher = Publisher::new(Counter::default(), ());
        let before = publisher.snapshot();
        publisher.transition(|_, s| s.value = 9);
        assert_eq!(before.value, 0);
        assert_eq!(publisher.snapshot().value, 9);
    }
}
