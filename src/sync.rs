//! Optimistic mutations against the remote backend.
//!
//! Every mutating gesture goes through [`SyncCoordinator::perform_optimistic`]:
//! the local change is applied synchronously, the remote write is awaited,
//! and on failure the local change is reverted and the failure logged.
//! Failures are reported as a [`SyncOutcome`], never as an `Err`, so a
//! rejected write cannot break the caller's event handling.

use crate::error::{BoardError, Result};
use std::{
    future::Future,
    sync::atomic::{AtomicUsize, Ordering},
};
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

/// How an optimistic mutation ended
#[derive(Debug)]
pub enum SyncOutcome<T> {
    /// The remote accepted the change
    Committed(T),
    /// The remote rejected the change and the local state was reverted
    RolledBack(BoardError),
    /// The local change could not be applied; nothing was sent
    NotApplied(BoardError),
}

impl<T> SyncOutcome<T> {
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed(_))
    }

    pub fn is_rolled_back(&self) -> bool {
        matches!(self, Self::RolledBack(_))
    }
}

/// Runs optimistic mutations and counts the ones awaiting the remote
#[derive(Debug, Default)]
pub struct SyncCoordinator {
    in_flight: AtomicUsize,
}

impl SyncCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of remote commits currently awaited
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Applies a change locally, commits it remotely, reverts it on failure
    ///
    /// `apply` runs immediately and returns whatever `revert` needs to undo
    /// exactly that change. `revert` only runs when `commit` fails. Neither
    /// `apply` nor `revert` may wait on I/O.
    pub async fn perform_optimistic<P, T, Apply, Commit, Fut, Revert>(
        &self,
        label: &str,
        apply: Apply,
        commit: Commit,
        revert: Revert,
    ) -> SyncOutcome<T>
    where
        Apply: FnOnce() -> Result<P>,
        Commit: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
        Revert: FnOnce(P),
    {
        let mutation = Uuid::new_v4();

        let patch = match apply() {
            Ok(patch) => patch,
            Err(err) => {
                debug!(%mutation, label, error = %err, "optimistic change not applied");
                return SyncOutcome::NotApplied(err);
            }
        };

        let result = {
            let _guard = InFlight::enter(&self.in_flight);
            commit()
                .instrument(info_span!("commit", %mutation, label))
                .await
        };

        match result {
            Ok(value) => {
                info!(%mutation, label, "optimistic change committed");
                SyncOutcome::Committed(value)
            }
            Err(err) => {
                revert(patch);
                warn!(%mutation, label, error = %err, "remote rejected change, reverted locally");
                SyncOutcome::RolledBack(err)
            }
        }
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
