//! Blocking Bounded MPMC Channel
//!
//! A bounded, multi-producer multi-consumer (MPMC) channel built on a mutex,
//! two condition variables, and a fixed-capacity FIFO, plus a multi-way
//! [`select`] that waits on several channels at once and commits exactly one
//! pending operation.
//!
//! ## How It Works
//!
//! ```text
//! senders ──► ┌───┬───┬───┬───┐ ──► receivers
//!             │ 0 │ 1 │ 2 │ 3 │      FIFO, capacity fixed at creation
//!             └───┴───┴───┴───┘
//!                     ▲
//!        one lock ── open flag ── wait-lists of sleeping select calls
//! ```
//!
//! - **send** blocks on `not_full` while the buffer is at capacity
//! - **recv** blocks on `not_empty` while the buffer is empty
//! - **close** is explicit, immediate and terminal: every blocked operation
//!   unblocks with `Closed`, and buffered values drop with the channel
//! - **select** locks its distinct channels in a canonical address order,
//!   fires the first ready operation, and otherwise registers a per-call
//!   notifier with every candidate channel before sleeping
//!
//! ## Synchronization
//!
//! | State | Protected by |
//! |-------|--------------|
//! | buffer, open flag, wait-lists | the channel mutex |
//! | a select call's wake-up flag | that call's notifier mutex |
//!
//! Channel locks are always taken before notifier locks, and several channel
//! locks are only ever taken together in address order, so the lock graph
//! stays acyclic. Every wait sits in a `while` predicate, so spurious
//! condvar wakes re-sleep.
//!
//! ## Example
//!
//! ```
//! use staffetta::mpmc::{SelectOp, bounded, select};
//!
//! let ch = bounded::<&str>(2);
//!
//! let worker = {
//!     let ch = ch.clone();
//!     std::thread::spawn(move || ch.recv())
//! };
//! ch.send("hello").unwrap();
//! assert_eq!(worker.join().unwrap(), Ok("hello"));
//!
//! // A select over two channels commits exactly one operation.
//! let a = bounded::<i32>(1);
//! let b = bounded::<i32>(1);
//! b.try_send(7).unwrap();
//! let mut ops = [SelectOp::send(&a, 1), SelectOp::recv(&b)];
//! assert_eq!(select(&mut ops), Ok(0)); // both are ready: array order wins
//!
//! ch.close().unwrap();
//! assert!(ch.send("late").is_err());
//! ```

mod channel;
mod error;
mod notifier;
mod select;

pub use channel::{Channel, TryIter};
pub use error::{
    CloseError, DestroyError, RecvError, SelectError, SelectErrorKind, SendError, TryRecvError,
    TrySendError,
};
pub use select::{SelectOp, select};

/// Creates an open channel whose buffer holds up to `capacity` values.
///
/// # Panics
///
/// Panics if `capacity` is 0: rendezvous channels are not supported.
pub fn bounded<T>(capacity: usize) -> Channel<T> {
    Channel::new(capacity)
}
