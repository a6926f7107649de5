//! Caller-supplied cancellation and deadline signal
//!
//! Every cache operation takes a [`Context`]. When its token is cancelled or
//! its deadline passes, the in-flight store request is dropped and the
//! operation returns [`CacheError::Cancelled`] or
//! [`CacheError::DeadlineExceeded`] instead of a store error.

use crate::error::{CacheError, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Cancellation token plus optional deadline
///
/// Cloning a context shares its token, so cancelling any clone cancels them
/// all. Use [`Context::child`] for a context that can be cancelled on its own
/// while still following its parent.
///
/// # Example
///
/// ```rust,ignore
/// use cache_facade::{CacheStore, Context};
/// use std::time::Duration;
///
/// let ctx = Context::with_timeout(Duration::from_millis(250));
/// let value = cache.get(&ctx, "user:123").await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct Context {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Context {
    /// A context that is never cancelled and has no deadline
    pub fn background() -> Self {
        Self::default()
    }

    /// A context that expires after `timeout`
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// A context that expires at `deadline`
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: Some(deadline),
        }
    }

    /// A context driven by an existing cancellation token
    pub fn with_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Narrow the deadline to at most `timeout` from now
    pub fn timeout(mut self, timeout: Duration) -> Self {
        let candidate = Instant::now() + timeout;
        self.deadline = Some(match self.deadline {
            Some(current) if current < candidate => current,
            _ => candidate,
        });
        self
    }

    /// A context cancelled with this one but cancellable independently
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// The error this context would fail with right now, if any
    pub fn err(&self) -> Option<CacheError> {
        if self.token.is_cancelled() {
            return Some(CacheError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(CacheError::DeadlineExceeded),
            _ => None,
        }
    }

    pub fn is_done(&self) -> bool {
        self.err().is_some()
    }

    /// Drive `fut` to completion unless the context fires first
    ///
    /// Cancellation wins over a simultaneously ready result.
    pub async fn run<T, F>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        if let Some(err) = self.err() {
            return Err(err);
        }

        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(CacheError::Cancelled),
            _ = expired => Err(CacheError::DeadlineExceeded),
            result = fut => result,
        }
    }
}
