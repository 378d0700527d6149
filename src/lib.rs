//! Blocking bounded channels for OS threads.
//!
//! `staffetta` is a small concurrency toolkit around one primitive: a
//! bounded MPMC channel with explicit close semantics and a multi-way
//! select. No async runtime, no background threads; just mutexes and
//! condition variables arranged so that nothing deadlocks and no wake-up is
//! lost.
//!
//! See the [`mpmc`] module for the full story and examples.

pub mod mpmc;

pub(crate) mod fifo;
