//! Lookup session: the form controller's state record.
//!
//! Holds the name being shown, the last result, the loading flag and the
//! error message. Every submission gets a ticket with a strictly increasing
//! sequence number; only the latest ticket may write back, so a slow
//! response to an older submission can never overwrite a newer one.

use crate::domain::{InferenceResult, OperationOutcome, Query, QueryError};

/// Handle identifying one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    #[must_use]
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// Issues tickets and remembers which one is current.
#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: u64,
}

impl RequestTracker {
    /// Issue a new ticket; it becomes the only current one.
    pub fn issue(&mut self) -> RequestTicket {
        self.latest += 1;
        RequestTicket(self.latest)
    }

    /// Make every issued ticket stale without issuing a new one.
    pub fn invalidate(&mut self) {
        self.latest += 1;
    }

    #[must_use]
    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.latest
    }
}

/// State of the lookup form between submissions.
#[derive(Debug, Default)]
pub struct LookupSession {
    shown_name: Option<String>,
    result: Option<InferenceResult>,
    loading: bool,
    error: Option<String>,
    tracker: RequestTracker,
}

impl LookupSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a submission.
    ///
    /// Clears any previous result and error and raises the loading flag.
    ///
    /// # Errors
    /// Returns `QueryError` if the name is empty; the session is unchanged.
    pub fn begin(&mut self, name: &str) -> Result<(RequestTicket, Query), QueryError> {
        let query = Query::new(name)?;
        let ticket = self.tracker.issue();

        self.shown_name = Some(name.to_string());
        self.result = None;
        self.error = None;
        self.loading = true;

        tracing::debug!("Submission #{} started", ticket.sequence());
        Ok((ticket, query))
    }

    /// Apply the outcome of a submission.
    ///
    /// Returns `false` and changes nothing if `ticket` is not the latest
    /// submission or has already been settled. Otherwise clears the loading
    /// flag and stores the result or the failure message.
    pub fn settle(&mut self, ticket: RequestTicket, outcome: OperationOutcome) -> bool {
        if !self.loading || !self.tracker.is_current(ticket) {
            tracing::debug!("Discarding outcome of stale submission #{}", ticket.sequence());
            return false;
        }

        self.loading = false;
        match outcome {
            OperationOutcome::Success(result) => {
                self.result = Some(result);
                self.error = None;
            }
            OperationOutcome::Failure(reason) => {
                self.result = None;
                self.error = Some(reason.message().to_string());
            }
        }
        true
    }

    /// Abandon any in-flight submission and clear the display.
    pub fn reset(&mut self) {
        self.tracker.invalidate();
        self.shown_name = None;
        self.result = None;
        self.error = None;
        self.loading = false;
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn result(&self) -> Option<&InferenceResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Name of the submission the display belongs to.
    #[must_use]
    pub fn shown_name(&self) -> Option<&str> {
        self.shown_name.as_deref()
    }
}
