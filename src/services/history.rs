use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::{models::Submission, services::stores::HistoryStore};

/// Non-blocking destination for finished submissions
#[cfg_attr(test, mockall::automock)]
pub trait SubmissionSink: Send + Sync {
    /// Hands a submission off for persistence. Must not block the caller.
    fn dispatch(&self, submission: Submission);
}

/// Fire-and-forget writer in front of a [`HistoryStore`].
///
/// Each dispatched submission is written at most once by a background task.
/// Failures are logged and never retried, and nothing is reported back to the
/// request that produced the submission.
#[derive(Clone)]
pub struct HistoryDispatcher {
    tx: mpsc::UnboundedSender<Submission>,
}

/// Stops the history writer after flushing already-dispatched submissions
pub struct HistoryWriterHandle {
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl HistoryWriterHandle {
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "History writer task panicked");
        }
        tracing::info!("History writer stopped");
    }
}

impl HistoryDispatcher {
    /// Spawns the writer task. Must be called inside a tokio runtime.
    pub fn spawn(store: Arc<dyn HistoryStore>) -> (Self, HistoryWriterHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let task = tokio::spawn(writer_task(store, rx, shutdown_rx));

        (Self { tx }, HistoryWriterHandle { shutdown_tx, task })
    }
}

impl SubmissionSink for HistoryDispatcher {
    fn dispatch(&self, submission: Submission) {
        let id = submission.id;
        if let Err(e) = self.tx.send(submission) {
            tracing::error!(submission_id = %id, error = %e, "History writer gone, submission dropped");
        }
    }
}

async fn writer_task(
    store: Arc<dyn HistoryStore>,
    mut rx: mpsc::UnboundedReceiver<Submission>,
    mut shutdown_rx: mpsc::Receiver<()>,
) {
    tracing::debug!("History writer task started");

    loop {
        tokio::select! {
            maybe_submission = rx.recv() => match maybe_submission {
                Some(submission) => record(store.as_ref(), submission).await,
                None => break,
            },
            _ = shutdown_rx.recv() => {
                let mut flushed = 0usize;
                while let Ok(submission) = rx.try_recv() {
                    record(store.as_ref(), submission).await;
                    flushed += 1;
                }
                tracing::info!(flushed, "History writer flushed pending submissions");
                break;
            }
        }
    }
}

async fn record(store: &dyn HistoryStore, submission: Submission) {
    match store.record_submission(&submission).await {
        Ok(()) => tracing::debug!(
            submission_id = %submission.id,
            recommendation_count = submission.recommendations.len(),
            "Submission recorded"
        ),
        Err(e) => tracing::error!(
            submission_id = %submission.id,
            error = %e,
            "Failed to record submission, not retrying"
        ),
    }
}
