//! Per-call deadlines.
//!
//! # Responsibilities
//! - Arm a timer that cancels one call's token when it fires
//! - Race the in-flight work against that token
//! - Release the timer on every exit path
//!
//! # Design Decisions
//! - One token per call; firing it never touches another call
//! - The timer task is aborted when the [`Deadline`] is dropped

use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Text reported when a call is cancelled by its deadline.
pub const ABORT_MESSAGE: &str = "The user aborted a request.";

/// The deadline fired before the guarded work completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{}", ABORT_MESSAGE)]
pub struct Aborted;

/// A cancellation token paired with the timer that cancels it.
pub struct Deadline {
    token: CancellationToken,
    timer: JoinHandle<()>,
}

impl Deadline {
    /// Start the timer. Must be called inside a Tokio runtime.
    pub fn arm(after: Duration) -> Self {
        let token = CancellationToken::new();
        let fire = token.clone();
        let timer = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            fire.cancel();
        });
        Self { token, timer }
    }

    /// The token cancelled by this deadline's timer.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn has_fired(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Run `work` until it completes or the deadline fires, whichever is
    /// first. On expiry `work` is dropped, which aborts any I/O it owns.
    pub async fn guard<F: Future>(&self, work: F) -> Result<F::Output, Aborted> {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(Aborted),
            output = work => Ok(output),
        }
    }
}

impl Drop for Deadline {
    fn drop(&mut self) {
        self.timer.abort();
    }
}
