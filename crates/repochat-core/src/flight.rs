use std::future::Future;

use futures_util::FutureExt;
use tokio::task::{JoinError, JoinHandle};

use crate::error::GatewayError;

type Outcome<T> = Result<T, GatewayError>;

/// The one request a controller may have outstanding.
///
/// Dropping it detaches the task: whatever the request returns afterwards is
/// never seen by anyone.
pub(crate) struct InFlight<T> {
    handle: Option<JoinHandle<Outcome<T>>>,
}

impl<T: Send + 'static> InFlight<T> {
    pub(crate) fn new() -> Self {
        Self { handle: None }
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.handle.is_some()
    }

    /// Callers check `is_pending` first; a second launch would orphan the first.
    pub(crate) fn launch<F>(&mut self, request: F)
    where
        F: Future<Output = Outcome<T>> + Send + 'static,
    {
        debug_assert!(self.handle.is_none());
        self.handle = Some(tokio::spawn(request));
    }

    /// The result, if the request has finished. Never blocks.
    pub(crate) fn try_take(&mut self) -> Option<Outcome<T>> {
        let handle = self.handle.as_mut()?;
        if !handle.is_finished() {
            return None;
        }
        // Can still be Pending if the task's coop budget is spent; retry next time.
        let joined = handle.now_or_never()?;
        self.handle = None;
        Some(joined.unwrap_or_else(join_failure))
    }

    /// Wait for the outstanding request, if there is one.
    pub(crate) async fn wait(&mut self) -> Option<Outcome<T>> {
        let handle = self.handle.take()?;
        Some(handle.await.unwrap_or_else(join_failure))
    }
}

fn join_failure<T>(err: JoinError) -> Outcome<T> {
    Err(GatewayError::Unrecognized(Some(err.to_string())))
}
