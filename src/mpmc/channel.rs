use std::fmt;
use std::sync::{Arc, Condvar, Mutex, PoisonError};

use crossbeam_utils::CachePadded;

use crate::fifo::Fifo;
use crate::mpmc::error::{
    CloseError, DestroyError, RecvError, SendError, TryRecvError, TrySendError,
};
use crate::mpmc::notifier::WaitList;

/// Everything the channel lock protects.
pub(super) struct State<T> {
    pub(super) fifo: Fifo<T>,
    /// Cleared exactly once by `close`; never set again.
    pub(super) open: bool,
    /// Select calls sleeping until room frees up.
    pub(super) send_waiters: WaitList,
    /// Select calls sleeping until a value arrives.
    pub(super) recv_waiters: WaitList,
}

pub(super) struct Shared<T> {
    pub(super) state: CachePadded<Mutex<State<T>>>,
    /// Signalled when a slot frees up.
    pub(super) not_full: CachePadded<Condvar>,
    /// Signalled when a value arrives.
    pub(super) not_empty: CachePadded<Condvar>,
}

impl<T> Shared<T> {
    /// Post-push wake-ups: one blocked receiver plus every select call
    /// sleeping on a receive intent for this channel.
    pub(super) fn wake_receivers(&self, state: &State<T>) {
        self.not_empty.notify_one();
        state.recv_waiters.notify_all();
    }

    /// Post-pop wake-ups, symmetric to [`wake_receivers`].
    ///
    /// [`wake_receivers`]: Shared::wake_receivers
    pub(super) fn wake_senders(&self, state: &State<T>) {
        self.not_full.notify_one();
        state.send_waiters.notify_all();
    }
}

/// A handle to a bounded MPMC channel.
///
/// Every clone refers to the same channel and may send and receive from any
/// thread. The channel stays open until [`close`] is called explicitly;
/// dropping handles never closes it.
///
/// [`close`]: Channel::close
pub struct Channel<T> {
    inner: Arc<Shared<T>>,
}

impl<T> Channel<T> {
    /// Creates an open channel whose buffer holds up to `capacity` values.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0: rendezvous channels are not supported.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Shared {
                state: CachePadded::new(Mutex::new(State {
                    fifo: Fifo::new(capacity),
                    open: true,
                    send_waiters: WaitList::new(),
                    recv_waiters: WaitList::new(),
                })),
                not_full: CachePadded::new(Condvar::new()),
                not_empty: CachePadded::new(Condvar::new()),
            }),
        }
    }

    /// Sends a value, blocking while the buffer is full.
    ///
    /// Returns the value inside the error if the channel is closed before
    /// room frees up. Closing the channel is the only way to unblock a
    /// stuck send.
    pub fn send(&self, value: T) -> Result<(), SendError<T>> {
        let mut state = match self.inner.state.lock() {
            Ok(guard) => guard,
            Err(_) => return Err(SendError::Poisoned(value)),
        };
        if !state.open {
            return Err(SendError::Closed(value));
        }
        while state.fifo.is_full() {
            state = match self.inner.not_full.wait(state) {
                Ok(guard) => guard,
                Err(_) => return Err(SendError::Poisoned(value)),
            };
            // The wake may have been close() rather than a freed slot.
            if !state.open {
                return Err(SendError::Closed(value));
            }
        }
        match state.fifo.push(value) {
            Ok(()) => {}
            // Guarded by the predicate above; surfaced rather than swallowed.
            Err(value) => return Err(SendError::Poisoned(value)),
        }
        self.inner.wake_receivers(&state);
        Ok(())
    }

    /// Receives the oldest value, blocking while the buffer is empty.
    pub fn recv(&self) -> Result<T, RecvError> {
        let mut state = self
            .inner
            .state
            .lock()
            .map_err(|_| RecvError::Poisoned)?;
        if !state.open {
            return Err(RecvError::Closed);
        }
        while state.fifo.is_empty() {
            state = self
                .inner
                .not_empty
                .wait(state)
                .map_err(|_| RecvError::Poisoned)?;
            if !state.open {
                return Err(RecvError::Closed);
            }
        }
        let value = match state.fifo.pop() {
            Some(value) => value,
            None => return Err(RecvError::Poisoned),
        };
        self.inner.wake_senders(&state);
        Ok(value)
    }

    /// Sends a value if the buffer has room right now.
    pub fn try_send(&self, value: T) -> Result<(), TrySendError<T>> {
        let mut state = match self.inner.state.lock() {
            Ok(guard) => guard,
            Err(_) => return Err(TrySendError::Poisoned(value)),
        };
        if !state.open {
            return Err(TrySendError::Closed(value));
        }
        match state.fifo.push(value) {
            Ok(()) => {}
            Err(value) => return Err(TrySendError::Full(value)),
        }
        self.inner.wake_receivers(&state);
        Ok(())
    }

    /// Receives a value if one is buffered right now.
    pub fn try_recv(&self) -> Result<T, TryRecvError> {
        let mut state = self
            .inner
            .state
            .lock()
            .map_err(|_| TryRecvError::Poisoned)?;
        if !state.open {
            return Err(TryRecvError::Closed);
        }
        let value = state.fifo.pop().ok_or(TryRecvError::Empty)?;
        self.inner.wake_senders(&state);
        Ok(value)
    }

    /// Closes the channel.
    ///
    /// Closing is immediate and terminal: every blocked and future
    /// operation on any handle observes `Closed`, and buffered values are
    /// dropped with the channel rather than drained. Both condvars are
    /// broadcast and every sleeping select call is woken; their wait-list
    /// entries stay put, since each select call purges its own
    /// registrations when it wakes.
    pub fn close(&self) -> Result<(), CloseError> {
        let mut state = self
            .inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !state.open {
            return Err(CloseError);
        }
        state.open = false;
        self.inner.not_full.notify_all();
        self.inner.not_empty.notify_all();
        state.recv_waiters.notify_all();
        state.send_waiters.notify_all();
        Ok(())
    }

    /// Destroys this handle, erroring if the channel has not been closed.
    ///
    /// On error the handle comes back inside [`DestroyError`] and the
    /// channel remains fully usable. Other clones of the handle keep the
    /// channel's memory alive; buffered values are dropped when the last
    /// clone goes away.
    pub fn destroy(self) -> Result<(), DestroyError<T>> {
        let still_open = {
            let state = self
                .inner
                .state
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            state.open
        };
        if still_open {
            return Err(DestroyError(self));
        }
        Ok(())
    }

    /// Returns true once [`close`] has run.
    ///
    /// [`close`]: Channel::close
    pub fn is_closed(&self) -> bool {
        self.with_state(|state| !state.open)
    }

    /// Returns the fixed buffer capacity.
    pub fn capacity(&self) -> usize {
        self.with_state(|state| state.fifo.capacity())
    }

    /// Returns the number of buffered values.
    pub fn len(&self) -> usize {
        self.with_state(|state| state.fifo.len())
    }

    /// Returns true if no values are buffered.
    pub fn is_empty(&self) -> bool {
        self.with_state(|state| state.fifo.is_empty())
    }

    /// Returns true if the buffer is at capacity.
    pub fn is_full(&self) -> bool {
        self.with_state(|state| state.fifo.is_full())
    }

    /// Iterates over the values that can be received without blocking.
    ///
    /// The iterator ends at the first [`try_recv`] failure, whether the
    /// channel is empty, closed, or poisoned.
    ///
    /// [`try_recv`]: Channel::try_recv
    pub fn try_iter(&self) -> TryIter<'_, T> {
        TryIter { channel: self }
    }

    pub(super) fn shared(&self) -> &Shared<T> {
        &self.inner
    }

    fn with_state<R>(&self, f: impl FnOnce(&State<T>) -> R) -> R {
        let state = self
            .inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }
}

impl<T> Clone for Channel<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> fmt::Debug for Channel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel").finish_non_exhaustive()
    }
}

/// The iterator returned by [`Channel::try_iter`].
pub struct TryIter<'a, T> {
    channel: &'a Channel<T>,
}

impl<T> Iterator for TryIter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.channel.try_recv().ok()
    }
}
