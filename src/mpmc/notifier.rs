use std::sync::{Arc, Condvar, Mutex, PoisonError};

/// Wake-up target for one in-progress `select` call.
///
/// Peers that complete a qualifying operation on a channel walk that
/// channel's wait-list under the channel lock and call [`notify`] on every
/// entry. The owning select call sleeps in [`wait`] until the flag is set.
///
/// The flag closes the race between releasing the channel locks and going to
/// sleep: a signal delivered in that window is recorded and observed by the
/// `while` predicate, so the owner never sleeps through it.
///
/// [`notify`]: Notifier::notify
/// [`wait`]: Notifier::wait
pub(super) struct Notifier {
    signal: Mutex<bool>,
    cond: Condvar,
}

impl Notifier {
    pub(super) fn new() -> Arc<Self> {
        Arc::new(Self {
            signal: Mutex::new(false),
            cond: Condvar::new(),
        })
    }

    /// Records a pending wake-up and signals the owner.
    ///
    /// Called by peers while they hold the channel lock through which they
    /// found this notifier. The notifier lock is only ever taken inside a
    /// channel lock or with none held, so the ordering is acyclic.
    pub(super) fn notify(&self) {
        let mut signal = self.signal.lock().unwrap_or_else(PoisonError::into_inner);
        *signal = true;
        self.cond.notify_one();
    }

    /// Sleeps until a wake-up is pending, then consumes it.
    ///
    /// Must be called with no channel lock held. Spurious condvar wakes
    /// re-enter the wait; only a recorded signal gets through.
    pub(super) fn wait(&self) {
        let mut signal = self.signal.lock().unwrap_or_else(PoisonError::into_inner);
        while !*signal {
            signal = self
                .cond
                .wait(signal)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *signal = false;
    }
}

/// Per-channel, per-direction set of sleeping select calls.
///
/// Entries are keyed on the notifier's allocation address: the same select
/// call is present at most once per list, and removal targets exactly the
/// entry that was inserted, never another notifier that happens to compare
/// equal. Lookup is a linear walk, like the registration lists this grew
/// out of.
///
/// Mutated only while the owning channel's state lock is held.
pub(super) struct WaitList {
    entries: Vec<Arc<Notifier>>,
}

impl WaitList {
    pub(super) fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub(super) fn contains(&self, notifier: &Arc<Notifier>) -> bool {
        self.entries.iter().any(|e| Arc::ptr_eq(e, notifier))
    }

    /// Registers a notifier. The caller deduplicates through [`contains`];
    /// a double insert would double-walk the entry on every wake.
    ///
    /// [`contains`]: WaitList::contains
    pub(super) fn insert(&mut self, notifier: Arc<Notifier>) {
        self.entries.push(notifier);
    }

    /// Drops the entry with this identity, if registered.
    pub(super) fn remove(&mut self, notifier: &Arc<Notifier>) {
        if let Some(at) = self.entries.iter().position(|e| Arc::ptr_eq(e, notifier)) {
            self.entries.remove(at);
        }
    }

    /// Wakes every registered select call, leaving the entries in place:
    /// each owner purges its own registrations on its next attempt.
    pub(super) fn notify_all(&self) {
        for entry in &self.entries {
            entry.notify();
        }
    }
}
