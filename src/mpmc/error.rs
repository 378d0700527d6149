use std::error;
use std::fmt;

use super::channel::Channel;

/// An error returned when a blocking send fails.
///
/// The rejected value rides along so the caller keeps ownership of it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SendError<T> {
    /// The channel was closed before or while waiting for room.
    Closed(T),
    /// The channel lock was poisoned by a panicking thread.
    Poisoned(T),
}

impl<T> SendError<T> {
    /// Returns the value that could not be sent.
    pub fn into_inner(self) -> T {
        match self {
            SendError::Closed(v) | SendError::Poisoned(v) => v,
        }
    }
}

impl<T: fmt::Debug> error::Error for SendError<T> {}

impl<T> fmt::Display for SendError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendError::Closed(_) => "sending into a closed channel".fmt(f),
            SendError::Poisoned(_) => "channel lock poisoned".fmt(f),
        }
    }
}

/// An error returned when a non-blocking send fails.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TrySendError<T> {
    /// The buffer is at capacity.
    Full(T),
    /// The channel is closed.
    Closed(T),
    /// The channel lock was poisoned by a panicking thread.
    Poisoned(T),
}

impl<T> TrySendError<T> {
    /// Returns the value that could not be sent.
    pub fn into_inner(self) -> T {
        match self {
            TrySendError::Full(v) | TrySendError::Closed(v) | TrySendError::Poisoned(v) => v,
        }
    }
}

impl<T: fmt::Debug> error::Error for TrySendError<T> {}

impl<T> fmt::Display for TrySendError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrySendError::Full(_) => "sending into a full channel".fmt(f),
            TrySendError::Closed(_) => "sending into a closed channel".fmt(f),
            TrySendError::Poisoned(_) => "channel lock poisoned".fmt(f),
        }
    }
}

/// An error returned when a blocking receive fails.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RecvError {
    /// The channel was closed before or while waiting for data.
    Closed,
    /// The channel lock was poisoned by a panicking thread.
    Poisoned,
}

impl error::Error for RecvError {}

impl fmt::Display for RecvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecvError::Closed => "receiving from a closed channel".fmt(f),
            RecvError::Poisoned => "channel lock poisoned".fmt(f),
        }
    }
}

/// An error returned when a non-blocking receive fails.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TryRecvError {
    /// The buffer holds no values.
    Empty,
    /// The channel is closed.
    Closed,
    /// The channel lock was poisoned by a panicking thread.
    Poisoned,
}

impl error::Error for TryRecvError {}

impl fmt::Display for TryRecvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TryRecvError::Empty => "receiving from an empty channel".fmt(f),
            TryRecvError::Closed => "receiving from a closed channel".fmt(f),
            TryRecvError::Poisoned => "channel lock poisoned".fmt(f),
        }
    }
}

/// An error returned by [`Channel::close`] on an already-closed channel.
///
/// [`Channel::close`]: super::Channel::close
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CloseError;

impl error::Error for CloseError {}

impl fmt::Display for CloseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        "closing a channel that is already closed".fmt(f)
    }
}

/// An error returned by [`Channel::destroy`] on a channel that is still open.
///
/// The handle comes back inside, fully usable.
///
/// [`Channel::destroy`]: super::Channel::destroy
pub struct DestroyError<T>(pub Channel<T>);

impl<T> DestroyError<T> {
    /// Recovers the channel handle.
    pub fn into_channel(self) -> Channel<T> {
        self.0
    }
}

impl<T> error::Error for DestroyError<T> {}

impl<T> fmt::Debug for DestroyError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DestroyError").finish_non_exhaustive()
    }
}

impl<T> fmt::Display for DestroyError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        "destroying a channel that is still open".fmt(f)
    }
}

/// An error returned by [`select`] when one of the channels cannot complete
/// its operation.
///
/// [`select`]: super::select
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SelectError {
    /// Position of the offending operation in the select set.
    pub index: usize,
    /// What went wrong on that channel.
    pub kind: SelectErrorKind,
}

/// The failure observed by [`select`] on a single channel.
///
/// [`select`]: super::select
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SelectErrorKind {
    /// The operation's channel is closed.
    Closed,
    /// The operation's channel lock was poisoned by a panicking thread.
    Poisoned,
}

impl error::Error for SelectError {}

impl fmt::Display for SelectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            SelectErrorKind::Closed => {
                write!(f, "select operation {} hit a closed channel", self.index)
            }
            SelectErrorKind::Poisoned => {
                write!(f, "select operation {} hit a poisoned lock", self.index)
            }
        }
    }
}
