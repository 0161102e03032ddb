//! Application state.

use std::sync::Arc;

use lre_core::ingest::UploadedImage;
use lre_core::session::{Completion, Session, Ticket};
use lre_core::{AnalysisBackend, AnalysisOutcome, LreError, LreResult};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, RwLock};
use tracing::{error, info};

/// WebSocket message types.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(tag = "type", content = "data")]
pub enum SessionEvent {
    Busy { request_id: u64 },
    Ready { request_id: u64 },
    Failed { request_id: u64 },
    Cleared,
}

/// Result of one [`AppState::run_analysis`] call.
#[derive(Debug)]
pub struct AnalysisRun {
    pub request_id: u64,
    pub completion: Completion,
    /// The applied outcome; `None` unless `completion` is `Applied`.
    pub outcome: Option<AnalysisOutcome>,
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn AnalysisBackend>,
    pub session: Arc<RwLock<Session>>,
    pub tx: broadcast::Sender<SessionEvent>,
}

impl AppState {
    pub fn new(backend: Arc<dyn AnalysisBackend>) -> Self {
        let (tx, _rx) = broadcast::channel(100);
        Self {
            backend,
            session: Arc::new(RwLock::new(Session::new())),
            tx,
        }
    }

    /// Broadcast a message to all WebSocket clients.
    pub fn broadcast(&self, msg: SessionEvent) {
        let _ = self.tx.send(msg);
    }

    /// Run one analysis end to end.
    ///
    /// The backend call and its completion run in a spawned task, so the
    /// ticket is completed even if the caller's future is dropped (client
    /// gone mid-request). The session lock is not held during the call.
    pub async fn run_analysis(&self, image: UploadedImage) -> AnalysisRun {
        let ticket = self.session.write().await.begin(image.clone());
        let request_id = ticket.id();
        self.broadcast(SessionEvent::Busy { request_id });

        let state = self.clone();
        let task = tokio::spawn(async move {
            let outcome = state.backend.analyze(&image).await;
            state.finish(ticket, outcome).await
        });

        match task.await {
            Ok(run) => run,
            Err(e) => {
                error!(request_id, error = %e, "Analysis task aborted");
                self.finish(ticket, Err(LreError::Task(e.to_string()))).await
            }
        }
    }

    /// Apply the outcome of a ticket and announce it.
    async fn finish(&self, ticket: Ticket, outcome: LreResult<AnalysisOutcome>) -> AnalysisRun {
        let request_id = ticket.id();
        if let Err(e) = &outcome {
            error!(request_id, error = %e, "Error analyzing image");
        }

        let applied = outcome.as_ref().ok().cloned();
        let completion = self.session.write().await.complete(ticket, outcome);
        match &completion {
            Completion::Applied => {
                info!(request_id, "Analysis ready");
                self.broadcast(SessionEvent::Ready { request_id });
            }
            Completion::Failed(_) => self.broadcast(SessionEvent::Failed { request_id }),
            Completion::Stale { .. } => {}
        }

        AnalysisRun {
            request_id,
            outcome: applied.filter(|_| completion == Completion::Applied),
            completion,
        }
    }

    /// Remove the preview image.
    pub async fn clear_image(&self) {
        self.session.write().await.clear_image();
        self.broadcast(SessionEvent::Cleared);
    }
}
