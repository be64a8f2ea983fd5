use tokio::sync::watch;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::app::ports::SourcePort;
use crate::app::state::{AppState, SessionState, View};
use crate::domain::FindingSet;
use crate::error::{IngestError, Result};
use crate::observability::metrics;
use crate::pipeline::ingestion::{ingest, IngestOptions};

const CANCELLED_MESSAGE: &str = "Upload cancelled before it finished.";

/// Owns the one ingestion slot and publishes every state change.
///
/// Uploads are serialized by rejection: while a file is loading, further
/// uploads fail with `IngestError::Busy` and leave the running one alone.
pub struct IngestSession {
    state: watch::Sender<SessionState>,
    options: IngestOptions,
}

impl IngestSession {
    /// `options.file_name` is replaced per upload
    pub fn new(options: IngestOptions) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self { state, options }
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn set_view(&self, view: View) {
        self.state.send_if_modified(|s| {
            let changed = s.view != view;
            s.view = view;
            changed
        });
    }

    /// Read, decode and normalize one file, then publish `Ready` or `Failed`.
    pub async fn upload<S>(&self, source: &S) -> Result<FindingSet>
    where
        S: SourcePort + ?Sized,
    {
        let file_name = source.name().await;
        let run_id = Uuid::new_v4();
        let span = info_span!("upload", %run_id, file_name = %file_name);

        async {
            let accepted = self.state.send_if_modified(|s| {
                if s.app.is_loading() {
                    return false;
                }
                s.app = AppState::Loading {
                    file_name: file_name.clone(),
                };
                true
            });
            if !accepted {
                metrics::ingest::rejected();
                warn!("upload rejected, another file is still loading");
                return Err(IngestError::Busy);
            }
            info!("upload accepted");
            let mut guard = LoadingGuard::new(&self.state, file_name.clone());

            let result = self.load(source, file_name.clone()).await;
            guard.finish(match &result {
                Ok(findings) => AppState::Ready {
                    file_name: file_name.clone(),
                    findings: findings.clone(),
                },
                Err(e) => AppState::Failed {
                    file_name: file_name.clone(),
                    message: e.to_string(),
                },
            });
            result
        }
        .instrument(span)
        .await
    }

    async fn load<S>(&self, source: &S, file_name: String) -> Result<FindingSet>
    where
        S: SourcePort + ?Sized,
    {
        let bytes = match source.read_bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                metrics::ingest::read_failed(e.kind());
                return Err(e);
            }
        };

        let opts = IngestOptions {
            file_name,
            ..self.options.clone()
        };
        let span = tracing::Span::current();
        tokio::task::spawn_blocking(move || span.in_scope(|| ingest(&bytes, &opts))).await?
    }
}

/// Publishes the upload's outcome when dropped, so a cancelled upload
/// cannot leave the session stuck in `Loading`.
struct LoadingGuard<'a> {
    state: &'a watch::Sender<SessionState>,
    file_name: String,
    outcome: Option<AppState>,
}

impl<'a> LoadingGuard<'a> {
    fn new(state: &'a watch::Sender<SessionState>, file_name: String) -> Self {
        Self {
            state,
            file_name,
            outcome: None,
        }
    }

    fn finish(&mut self, outcome: AppState) {
        self.outcome = Some(outcome);
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let next = match self.outcome.take() {
            Some(outcome) => outcome,
            None => {
                metrics::ingest::cancelled();
                warn!(file_name = %self.file_name, "upload dropped before it finished");
                AppState::Failed {
                    file_name: std::mem::take(&mut self.file_name),
                    message: CANCELLED_MESSAGE.to_string(),
                }
            }
        };
        self.state.send_modify(|s| s.app = next);
    }
}

impl Default for IngestSession {
    fn default() -> Self {
        Self::new(IngestOptions::default())
    }
}
