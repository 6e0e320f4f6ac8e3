// src/checker/batch.rs
// =============================================================================
// Checks every link of one document concurrently.
//
// One tokio task is spawned per reference. Each task runs the full check
// and sends its result into a shared channel. Every task holds a clone of
// the sender; once the last task finishes and drops its clone the channel
// closes, which ends the result stream. So the stream yields exactly one
// result per reference, in whatever order the checks complete.
//
// The check runs in a task of its own, awaited by the task that sends the
// result. If the check panics, the sender still reports it as an
// `Internal` failure instead of silently dropping that reference.
//
// The batch itself does not limit concurrency: remote probes wait on the
// concurrency gate, local checks are cheap.
// =============================================================================

use super::LinkChecker;
use crate::error::CheckError;
use futures::stream::{self, Stream, StreamExt};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

/// The outcome of checking one reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkResult {
    /// The reference exactly as it appeared in the document
    pub reference: String,
    pub outcome: Result<(), CheckError>,
}

impl LinkResult {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn error(&self) -> Option<&CheckError> {
        self.outcome.as_ref().err()
    }
}

impl LinkChecker {
    /// Checks all `references` found in `document` and streams the results
    /// as they complete.
    ///
    /// Must be called from within a tokio runtime. Dropping the stream early
    /// does not cancel the checks; they run to completion in the background.
    pub fn check_many(
        &self,
        references: Vec<String>,
        document: impl Into<PathBuf>,
    ) -> impl Stream<Item = LinkResult> + Send + 'static {
        let document = Arc::new(document.into());
        // Room for every result, so no task ever waits on a slow consumer.
        let (tx, mut rx) = mpsc::channel(references.len().max(1));

        for reference in references {
            let checker = self.clone();
            let document = Arc::clone(&document);
            let target = reference.clone();

            spawn_check(reference, tx.clone(), async move {
                checker.check(&target, &document).await
            });
        }
        drop(tx);

        stream::poll_fn(move |cx| rx.poll_recv(cx))
    }

    /// Like `check_many`, but waits for every result and returns them all.
    pub async fn check_all(
        &self,
        references: Vec<String>,
        document: impl Into<PathBuf>,
    ) -> Vec<LinkResult> {
        self.check_many(references, document).collect().await
    }
}

// Runs `check` and sends exactly one result for `reference`, whether the
// check returns or panics.
fn spawn_check<F>(reference: String, tx: mpsc::Sender<LinkResult>, check: F)
where
    F: Future<Output = Result<(), CheckError>> + Send + 'static,
{
    tokio::spawn(async move {
        let outcome = match tokio::spawn(check).await {
            Ok(outcome) => outcome,
            Err(e) => Err(CheckError::Internal(format!("check did not finish: {}", e))),
        };
        // The receiver may be gone if the caller stopped listening.
        let _ = tx.send(LinkResult { reference, outcome }).await;
    });
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a channel instead of collecting JoinHandles?
//    - Results can be consumed as soon as each check finishes
//    - The channel closing is the "all done" signal, no counter needed
//
// 2. What does stream::poll_fn do?
//    - It builds a Stream out of a closure that is polled for the next item
//    - rx.poll_recv() returns Ready(Some(result)), Ready(None) once every
//      sender is gone, or Pending while checks are still running
//
// 3. Why `let _ = tx.send(...)`?
//    - send() fails only if the receiver was dropped
//    - That is not an error for the task: its check already ran
//
// 4. Why spawn the check inside another task?
//    - Awaiting a JoinHandle turns a panic into an Err(JoinError)
//    - The outer task survives it and can still send a result
// -----------------------------------------------------------------------------
