//! Analysis session state.
//!
//! Holds the current preview and the most recent outcome. Each analysis gets
//! a ticket with a monotonically increasing id; only the latest ticket may
//! update the result, so late responses from superseded requests are dropped.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::analysis::AnalysisOutcome;
use crate::error::LreResult;
use crate::ingest::UploadedImage;

/// Coarse session status shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Idle,
    Busy,
    Ready,
}

/// Handle for one in-flight analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl Ticket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// What happened when a ticket completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The outcome is now the current result.
    Applied,
    /// The latest request failed; the previous result is unchanged.
    Failed(String),
    /// A newer request was issued meanwhile; the outcome was discarded.
    /// `error` keeps the failure message when the superseded call failed.
    Stale { error: Option<String> },
}

/// The single current image/result pair.
#[derive(Debug, Default)]
pub struct Session {
    image: Option<UploadedImage>,
    outcome: Option<AnalysisOutcome>,
    latest: u64,
    in_flight: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an analysis: replace the preview and issue a new ticket.
    pub fn begin(&mut self, image: UploadedImage) -> Ticket {
        self.latest += 1;
        self.in_flight = true;
        self.image = Some(image);
        debug!(request_id = self.latest, "Analysis started");
        Ticket(self.latest)
    }

    /// Record the outcome of a ticket.
    pub fn complete(&mut self, ticket: Ticket, outcome: LreResult<AnalysisOutcome>) -> Completion {
        if ticket.0 != self.latest {
            debug!(request_id = ticket.0, latest = self.latest, "Discarding stale analysis");
            return Completion::Stale {
                error: outcome.err().map(|e| e.to_string()),
            };
        }

        self.in_flight = false;
        match outcome {
            Ok(outcome) => {
                self.outcome = Some(outcome);
                Completion::Applied
            }
            Err(e) => {
                warn!(request_id = ticket.0, error = %e, "Analysis failed");
                Completion::Failed(e.to_string())
            }
        }
    }

    /// Remove the preview. The last result stays visible.
    pub fn clear_image(&mut self) {
        self.image = None;
    }

    pub fn status(&self) -> SessionStatus {
        if self.in_flight {
            SessionStatus::Busy
        } else if self.outcome.is_some() {
            SessionStatus::Ready
        } else {
            SessionStatus::Idle
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    pub fn image(&self) -> Option<&UploadedImage> {
        self.image.as_ref()
    }

    pub fn outcome(&self) -> Option<&AnalysisOutcome> {
        self.outcome.as_ref()
    }

    /// Id of the most recently issued ticket (0 before any analysis).
    pub fn latest_request_id(&self) -> u64 {
        self.latest
    }
}
