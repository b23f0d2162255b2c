//! Async lookup worker for non-blocking name inference.
//!
//! The TUI loop is synchronous. This worker owns a tokio runtime, runs each
//! lookup on it and hands the outcome back over a channel that the loop
//! drains between frames.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use tokio::runtime::Runtime;

use crate::application::{InferenceAggregator, RequestTicket};
use crate::domain::{OperationOutcome, Query};
use crate::ports::NameInferenceProvider;
use crate::NameprobeError;

/// Outcome of one submission, tagged with its ticket.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupCompletion {
    pub ticket: RequestTicket,
    pub outcome: OperationOutcome,
}

/// Delivers exactly one completion per spawned lookup.
///
/// If the task is torn down before `complete` runs (a panic inside a
/// provider, or runtime shutdown) the drop sends a generic failure instead.
struct SettleGuard {
    ticket: RequestTicket,
    tx: Option<Sender<LookupCompletion>>,
}

impl SettleGuard {
    fn complete(mut self, outcome: OperationOutcome) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(LookupCompletion {
                ticket: self.ticket,
                outcome,
            });
        }
    }
}

impl Drop for SettleGuard {
    fn drop(&mut self) {
        if let Some(tx) = self.tx.take() {
            tracing::warn!(
                "Lookup #{} ended without a result",
                self.ticket.sequence()
            );
            let _ = tx.send(LookupCompletion {
                ticket: self.ticket,
                outcome: OperationOutcome::failure(),
            });
        }
    }
}

/// Background worker running lookups on its own runtime.
pub struct LookupWorker<P>
where
    P: NameInferenceProvider + 'static,
{
    runtime: Runtime,
    aggregator: Arc<InferenceAggregator<P>>,
    tx: Sender<LookupCompletion>,
    rx: Receiver<LookupCompletion>,
}

impl<P> LookupWorker<P>
where
    P: NameInferenceProvider + 'static,
{
    /// Start the worker runtime.
    ///
    /// # Errors
    /// Returns `NameprobeError::Io` if the runtime cannot be built.
    pub fn new(aggregator: InferenceAggregator<P>) -> Result<Self, NameprobeError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("nameprobe-lookup")
            .enable_all()
            .build()?;

        let (tx, rx) = mpsc::channel();

        Ok(Self {
            runtime,
            aggregator: Arc::new(aggregator),
            tx,
            rx,
        })
    }

    #[must_use]
    pub fn aggregator(&self) -> &InferenceAggregator<P> {
        &self.aggregator
    }

    /// Spawn a lookup. Its completion arrives through `try_recv`.
    pub fn spawn(&self, ticket: RequestTicket, query: Query) {
        let aggregator = Arc::clone(&self.aggregator);
        let guard = SettleGuard {
            ticket,
            tx: Some(self.tx.clone()),
        };

        self.runtime.spawn(async move {
            let outcome = aggregator.infer(&query).await;
            guard.complete(outcome);
        });
    }

    /// Try to receive the next completion (non-blocking).
    #[must_use]
    pub fn try_recv(&self) -> Option<LookupCompletion> {
        self.rx.try_recv().ok()
    }

    #[cfg(test)]
    fn recv_timeout(&self, timeout: std::time::Duration) -> Option<LookupCompletion> {
        self.rx.recv_timeout(timeout).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::FakeProvider;
    use crate::application::RequestTracker;
    use crate::domain::{CountryProbability, Gender, GENERIC_FAILURE_MESSAGE};
    use crate::ports::Service;
    use std::time::Duration;

    const WAIT: Duration = Duration::from_secs(5);

    fn worker(provider: FakeProvider) -> LookupWorker<FakeProvider> {
        LookupWorker::new(InferenceAggregator::new(Arc::new(provider))).expect("runtime")
    }

    fn query(name: &str) -> Query {
        Query::new(name).expect("valid query")
    }

    #[test]
    fn test_success_completion_carries_ticket() {
        let worker = worker(FakeProvider::answering(
            Some(41),
            Some(Gender::Male),
            vec![CountryProbability::new("FR", 0.7)],
        ));
        let mut tracker = RequestTracker::default();
        let ticket = tracker.issue();

        worker.spawn(ticket, query("Jean"));
        let completion = worker.recv_timeout(WAIT).expect("completion");

        assert_eq!(completion.ticket, ticket);
        assert_eq!(completion.outcome.result().and_then(|r| r.age), Some(41));
        assert!(worker.try_recv().is_none(), "exactly one completion");
    }

    #[test]
    fn test_failure_completion() {
        let worker = worker(FakeProvider::answering(None, None, vec![]).failing(Service::Age));
        let ticket = RequestTracker::default().issue();

        worker.spawn(ticket, query("Jean"));
        let completion = worker.recv_timeout(WAIT).expect("completion");

        assert_eq!(completion.outcome, OperationOutcome::failure());
    }

    #[test]
    fn test_panicking_provider_still_settles() {
        let worker =
            worker(FakeProvider::answering(None, None, vec![]).panicking(Service::Nationality));
        let ticket = RequestTracker::default().issue();

        worker.spawn(ticket, query("Jean"));
        let completion = worker.recv_timeout(WAIT).expect("completion");

        assert_eq!(completion.ticket, ticket);
        assert_eq!(
            completion.outcome.into_result().unwrap_err().message(),
            GENERIC_FAILURE_MESSAGE
        );
        assert!(worker.recv_timeout(Duration::from_millis(100)).is_none());
    }

    #[test]
    fn test_completions_for_multiple_tickets() {
        let worker = worker(FakeProvider::answering(Some(5), None, vec![]));
        let mut tracker = RequestTracker::default();
        let first = tracker.issue();
        let second = tracker.issue();

        worker.spawn(first, query("a"));
        worker.spawn(second, query("b"));

        let mut seen = vec![
            worker.recv_timeout(WAIT).expect("first").ticket,
            worker.recv_timeout(WAIT).expect("second").ticket,
        ];
        seen.sort();
        assert_eq!(seen, vec![first, second]);
    }
}
