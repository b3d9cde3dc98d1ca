use crate::error::NovaPayError;
use std::future::Future;
use tokio::task::JoinHandle;

/// Spawned remote call owned by a screen. Dropping it aborts the task, so a closed
/// overlay never receives a late completion.
#[derive(Debug)]
pub(crate) struct PendingTask<T> {
    operation: &'static str,
    handle: JoinHandle<Result<T, NovaPayError>>,
}

impl<T: Send + 'static> PendingTask<T> {
    pub(crate) fn spawn<F>(operation: &'static str, future: F) -> Self
    where
        F: Future<Output = Result<T, NovaPayError>> + Send + 'static,
    {
        Self {
            operation,
            handle: tokio::spawn(future),
        }
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub(crate) async fn join(mut self) -> Result<T, NovaPayError> {
        match (&mut self.handle).await {
            Ok(result) => result,
            Err(_) => Err(NovaPayError::Cancelled(self.operation.to_string())),
        }
    }
}

impl<T> Drop for PendingTask<T> {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
