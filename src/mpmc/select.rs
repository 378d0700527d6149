use std::fmt;
use std::ptr;
use std::sync::{MutexGuard, PoisonError};

use crate::mpmc::channel::{Channel, Shared, State};
use crate::mpmc::error::{SelectError, SelectErrorKind};
use crate::mpmc::notifier::Notifier;

/// A pending send or receive intent, evaluated by [`select`].
///
/// Operations are single-shot: once [`select`] commits a send op, the op has
/// surrendered its value, and offering it to `select` again panics. A
/// committed receive op holds the popped value until [`take_received`] is
/// called.
///
/// [`take_received`]: SelectOp::take_received
pub struct SelectOp<'a, T> {
    channel: &'a Channel<T>,
    kind: OpKind<T>,
}

enum OpKind<T> {
    /// Value still to be sent; `None` once committed.
    Send(Option<T>),
    /// Slot for the popped value; `Some` once committed.
    Recv(Option<T>),
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Direction {
    Send,
    Recv,
}

impl<'a, T> SelectOp<'a, T> {
    /// An intent to send `value` into `channel`.
    pub fn send(channel: &'a Channel<T>, value: T) -> Self {
        Self {
            channel,
            kind: OpKind::Send(Some(value)),
        }
    }

    /// An intent to receive a value from `channel`.
    pub fn recv(channel: &'a Channel<T>) -> Self {
        Self {
            channel,
            kind: OpKind::Recv(None),
        }
    }

    /// The channel this operation targets.
    pub fn channel(&self) -> &'a Channel<T> {
        self.channel
    }

    /// Takes the value a committed receive op popped, if any.
    pub fn take_received(&mut self) -> Option<T> {
        match &mut self.kind {
            OpKind::Recv(slot) => slot.take(),
            OpKind::Send(_) => None,
        }
    }

    fn direction(&self) -> Direction {
        match self.kind {
            OpKind::Send(_) => Direction::Send,
            OpKind::Recv(_) => Direction::Recv,
        }
    }
}

impl<T> fmt::Debug for SelectOp<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.direction() {
            Direction::Send => "SelectOp::Send",
            Direction::Recv => "SelectOp::Recv",
        };
        f.debug_struct(name).finish_non_exhaustive()
    }
}

/// The distinct channels of a select set, locked in canonical order.
///
/// Channels are deduped by allocation identity and locked sorted by address,
/// so two overlapping select calls always contend in the same order and an
/// op set naming one channel twice never locks it twice.
struct LockSet<'a, T> {
    /// One entry per distinct channel, sorted by address.
    channels: Vec<&'a Shared<T>>,
    /// Guards in the same order as `channels`.
    guards: Vec<MutexGuard<'a, State<T>>>,
}

impl<'a, T> LockSet<'a, T> {
    fn acquire(ops: &[SelectOp<'a, T>]) -> Self {
        let mut channels: Vec<&'a Shared<T>> = Vec::with_capacity(ops.len());
        for op in ops {
            let shared = op.channel.shared();
            if !channels.iter().any(|c| ptr::eq(*c, shared)) {
                channels.push(shared);
            }
        }
        channels.sort_by_key(|c| *c as *const Shared<T> as usize);

        // A poisoned lock does not abort the call: the multi-lock and
        // wait-list bookkeeping must stay consistent, so the state is
        // recovered and the attempt proceeds.
        let guards = channels
            .iter()
            .map(|shared| {
                shared
                    .state
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
            })
            .collect();

        Self { channels, guards }
    }

    fn state_for(&mut self, shared: &Shared<T>) -> &mut State<T> {
        let at = self
            .channels
            .iter()
            .position(|c| ptr::eq(*c, shared))
            .expect("channel missing from lock set");
        &mut *self.guards[at]
    }
}

/// Waits on a set of pending operations and commits exactly one.
///
/// Returns the index of the committed operation. If any operation's channel
/// is observed closed, that operation's index comes back in the error
/// instead and nothing is committed.
///
/// When several operations are immediately fireable, the lowest index wins.
/// When none is, the call sleeps until a peer operation or a close on one of
/// the channels makes a retry worthwhile; there is no fairness guarantee
/// among concurrent sleepers.
///
/// # Panics
///
/// Panics if `ops` is empty (the call could never return), or if a send op
/// that already committed in an earlier call is offered again.
pub fn select<T>(ops: &mut [SelectOp<'_, T>]) -> Result<usize, SelectError> {
    assert!(!ops.is_empty(), "select() called on an empty operation set");

    // One wake-up target per call, registered with every candidate channel
    // before each sleep and purged again on the next attempt.
    let notifier = Notifier::new();

    loop {
        let mut locks = LockSet::acquire(ops);

        // Purge registrations left by a previous sleep. Every return below
        // happens after this point and before any new registration, so no
        // entry for this call survives the return.
        for op in ops.iter() {
            let state = locks.state_for(op.channel.shared());
            match op.direction() {
                Direction::Send => state.send_waiters.remove(&notifier),
                Direction::Recv => state.recv_waiters.remove(&notifier),
            }
        }

        // Fire the first ready operation, in array order.
        for (i, op) in ops.iter_mut().enumerate() {
            let shared = op.channel.shared();
            let state = locks.state_for(shared);
            if !state.open {
                return Err(SelectError {
                    index: i,
                    kind: SelectErrorKind::Closed,
                });
            }
            match &mut op.kind {
                OpKind::Send(slot) => {
                    if !state.fifo.is_full() {
                        let value = slot
                            .take()
                            .expect("select send operation already committed");
                        match state.fifo.push(value) {
                            Ok(()) => {}
                            Err(_) => {
                                return Err(SelectError {
                                    index: i,
                                    kind: SelectErrorKind::Poisoned,
                                });
                            }
                        }
                        shared.wake_receivers(state);
                        return Ok(i);
                    }
                }
                OpKind::Recv(slot) => {
                    if let Some(value) = state.fifo.pop() {
                        *slot = Some(value);
                        shared.wake_senders(state);
                        return Ok(i);
                    }
                }
            }
        }

        // Nothing fireable and nothing closed: register with every
        // (channel, direction) pair once, release the channel locks, and
        // sleep. A peer that fires afterwards must take one of these
        // channel locks to walk the wait-list, so its signal lands on the
        // notifier flag and the wait cannot miss it.
        for op in ops.iter() {
            let state = locks.state_for(op.channel.shared());
            let waiters = match op.direction() {
                Direction::Send => &mut state.send_waiters,
                Direction::Recv => &mut state.recv_waiters,
            };
            // Dedup on (channel, direction): the purge above emptied our
            // entries, so presence means an earlier op in this very pass.
            if !waiters.contains(&notifier) {
                waiters.insert(notifier.clone());
            }
        }

        drop(locks);
        notifier.wait();
    }
}
