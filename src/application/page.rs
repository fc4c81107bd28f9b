//! ToolPage - One mounted tool page: state, submissions and replay.
//!
//! ```text
//! mount   -> resolve session, subscribe to replay, seed default fields
//! submit  -> Loading, invoke, display result or error, then record history
//! replay  -> overwrite inputs from a past entry, clear result, scroll to top
//! unmount -> unsubscribe
//! ```

use std::sync::Arc;

use crate::domain::foundation::Session;
use crate::domain::history::ReplayEvent;
use crate::domain::tool::{FileUpload, ToolError, ToolPageState};
use crate::ports::ReplaySubscriber;

use super::invoker::ToolInvoker;
use super::recorder::{HistoryRecorder, RecordOutcome};
use super::replay_listener::ReplayListener;
use super::session_resolver::SessionResolver;
use super::tool_spec::ToolSpec;

/// Collaborators shared by every page.
#[derive(Clone)]
pub struct PageServices {
    pub sessions: SessionResolver,
    pub invoker: ToolInvoker,
    pub recorder: HistoryRecorder,
    pub replay: Arc<dyn ReplaySubscriber>,
}

/// Result of one submission, after the page state was updated.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The result is displayed; `history` says what happened to the entry.
    Succeeded { history: RecordOutcome },
    /// The error message is displayed.
    Failed(ToolError),
}

pub struct ToolPage {
    spec: ToolSpec,
    services: PageServices,
    state: ToolPageState,
    session: Option<Session>,
    listener: Option<ReplayListener>,
}

impl ToolPage {
    pub async fn mount(spec: ToolSpec, services: PageServices) -> Self {
        let session = services.sessions.resolve().await;
        let listener = Some(ReplayListener::subscribe(services.replay.as_ref()));

        let mut state = ToolPageState::new();
        for (field, value) in spec.defaults() {
            state.set_field(field, value);
        }

        tracing::debug!(
            tool = %spec.tool_type(),
            signed_in = session.is_some(),
            "Tool page mounted"
        );

        Self {
            spec,
            services,
            state,
            session,
            listener,
        }
    }

    pub fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    pub fn state(&self) -> &ToolPageState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut ToolPageState {
        &mut self.state
    }

    /// Session seen at mount; submissions check again.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_mounted(&self) -> bool {
        self.listener.is_some()
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.state.set_field(name, value);
    }

    pub fn attach(&mut self, name: impl Into<String>, file: FileUpload) {
        self.state.attach(name, file);
    }

    /// Runs one submission from the current inputs.
    ///
    /// The result (or error) is in the page state before history recording
    /// starts, and recording failures never change it.
    pub async fn submit(&mut self) -> SubmitOutcome {
        let spec = &self.spec;
        let services = &self.services;

        let mut guard = match self.state.begin_submission() {
            Ok(guard) => guard,
            Err(e) => return SubmitOutcome::Failed(e.into()),
        };
        let request = guard.state().to_request();

        let outcome = services
            .invoker
            .invoke_with_progress(spec, request, &mut |stage| {
                guard.set_status(stage.message())
            })
            .await;

        let invocation = match outcome {
            Ok(invocation) => invocation,
            Err(err) => {
                guard.fail(err.user_message());
                return SubmitOutcome::Failed(err);
            }
        };

        guard.succeed(invocation.result.clone());
        if invocation.uploaded {
            if let Some(step) = spec.upload() {
                guard.clear_attachment(&step.file_field);
            }
        }
        drop(guard);

        let history = services.recorder.record(invocation.history.as_ref()).await;
        SubmitOutcome::Succeeded { history }
    }

    /// Overwrites the inputs from a replayed history entry.
    pub fn apply_replay(&mut self, event: &ReplayEvent) {
        self.state.apply_replay(
            self.spec.primary_field(),
            &event.text,
            &event.metadata,
            &self.spec.replay_bindings(),
        );
        tracing::debug!(tool = %self.spec.tool_type(), "History entry replayed");
    }

    /// Applies every replay event already delivered. Returns how many.
    pub fn poll_replay(&mut self) -> usize {
        let mut applied = 0;
        while let Some(event) = self.listener.as_mut().and_then(ReplayListener::try_next) {
            self.apply_replay(&event);
            applied += 1;
        }
        applied
    }

    /// Waits for the next replay event and applies it.
    ///
    /// Returns `false` when unmounted or the channel closed.
    pub async fn next_replay(&mut self) -> bool {
        let event = match self.listener.as_mut() {
            Some(listener) => listener.next().await,
            None => None,
        };
        match event {
            Some(event) => {
                self.apply_replay(&event);
                true
            }
            None => false,
        }
    }

    pub fn unmount(&mut self) {
        self.listener = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::MockIdentityProvider;
    use crate::adapters::backend::ScriptedToolBackend;
    use crate::adapters::events::BroadcastReplayBus;
    use crate::adapters::storage::InMemoryHistoryStore;
    use crate::application::ToolCatalog;
    use crate::config::LimitsConfig;
    use crate::domain::history::HistoryError;
    use crate::domain::tool::{ToolPhase, ToolResult, ToolType};
    use crate::ports::ReplayPublisher;
    use http::StatusCode;
    use serde_json::{json, Map};

    struct Harness {
        backend: ScriptedToolBackend,
        store: InMemoryHistoryStore,
        bus: BroadcastReplayBus,
        services: PageServices,
    }

    fn harness(identity: MockIdentityProvider, backend: ScriptedToolBackend) -> Harness {
        let store = InMemoryHistoryStore::new();
        let bus = BroadcastReplayBus::default();
        let sessions = SessionResolver::new(Arc::new(identity));
        let services = PageServices {
            sessions: sessions.clone(),
            invoker: ToolInvoker::new(sessions, Arc::new(backend.clone())),
            recorder: HistoryRecorder::new(Arc::new(store.clone())),
            replay: Arc::new(bus.clone()),
        };
        Harness {
            backend,
            store,
            bus,
            services,
        }
    }

    fn spec(tool: ToolType) -> ToolSpec {
        ToolCatalog::new(&LimitsConfig::default())
            .unwrap()
            .get(tool)
            .unwrap()
            .clone()
    }

    #[tokio::test]
    async fn mount_seeds_defaults_and_subscribes() {
        let h = harness(MockIdentityProvider::signed_in("u"), ScriptedToolBackend::new());
        let page = ToolPage::mount(spec(ToolType::Veo3Prompt), h.services.clone()).await;

        assert!(page.session().is_some());
        assert!(page.is_mounted());
        assert_eq!(page.state().field("camera"), Some("Cinematic Gimbal (Estável e Suave)"));
        assert_eq!(h.bus.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn successful_submit_displays_then_records() {
        let backend = ScriptedToolBackend::new().with_json(
            "/generate-study-material",
            StatusCode::OK,
            json!({"material": "Resumo de fotossíntese"}),
        );
        let h = harness(MockIdentityProvider::signed_in("u"), backend);
        let mut page = ToolPage::mount(spec(ToolType::StudyMaterial), h.services.clone()).await;
        page.set_field("topic", "Fotossíntese");

        let outcome = page.submit().await;

        assert_eq!(outcome, SubmitOutcome::Succeeded { history: RecordOutcome::Recorded });
        assert_eq!(page.state().phase(), ToolPhase::Displaying);
        assert!(!page.state().is_loading());
        assert_eq!(
            page.state().result(),
            Some(&ToolResult::Text("Resumo de fotossíntese".into()))
        );
        let entries = h.store.entries().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].metadata_str("level"), Some("ensino_medio"));
    }

    #[tokio::test]
    async fn failed_submit_shows_error_and_records_nothing() {
        let backend = ScriptedToolBackend::new().with_json(
            "/generate-image",
            StatusCode::PAYMENT_REQUIRED,
            json!({"error": "Créditos insuficientes"}),
        );
        let h = harness(MockIdentityProvider::signed_in("u"), backend);
        let mut page = ToolPage::mount(spec(ToolType::ImageGenerator), h.services.clone()).await;
        page.set_field("prompt", "a cat");

        let outcome = page.submit().await;

        assert!(matches!(outcome, SubmitOutcome::Failed(ToolError::PaymentRequired(_))));
        assert_eq!(page.state().error(), Some("Créditos insuficientes"));
        assert!(page.state().result().is_none());
        assert_eq!(page.state().phase(), ToolPhase::Idle);
        assert_eq!(h.store.save_attempts().await, 0);
    }

    #[tokio::test]
    async fn history_failure_leaves_result_displayed() {
        let backend = ScriptedToolBackend::new().with_json(
            "/format-abnt",
            StatusCode::OK,
            json!({"formatted_text": "TEXTO ABNT"}),
        );
        let h = harness(MockIdentityProvider::signed_in("u"), backend);
        h.store.fail_with(HistoryError::transport("offline")).await;
        let mut page = ToolPage::mount(spec(ToolType::Abnt), h.services.clone()).await;
        page.set_field("text", "texto cru");

        let outcome = page.submit().await;

        assert!(matches!(
            outcome,
            SubmitOutcome::Succeeded { history: RecordOutcome::Failed(_) }
        ));
        assert!(page.state().error().is_none());
        assert_eq!(page.state().result().and_then(ToolResult::as_text), Some("TEXTO ABNT"));
    }

    #[tokio::test]
    async fn submit_without_session_shows_login_message() {
        let h = harness(MockIdentityProvider::anonymous(), ScriptedToolBackend::new());
        let mut page = ToolPage::mount(spec(ToolType::Translator), h.services.clone()).await;
        page.set_field("text", "Olá");

        page.submit().await;

        assert_eq!(page.state().error(), Some("Faça login para continuar."));
        assert_eq!(h.backend.call_count(), 0);
    }

    #[tokio::test]
    async fn upload_clears_attachment_after_success() {
        let backend = ScriptedToolBackend::new()
            .with_json("/upload-document", StatusCode::OK, json!({"document_id": "d1"}))
            .with_json("/ask-document", StatusCode::OK, json!({"answer": "Sim."}));
        let h = harness(MockIdentityProvider::signed_in("u"), backend);
        let mut page = ToolPage::mount(spec(ToolType::ChatPdf), h.services.clone()).await;
        page.set_field("question", "É sobre energia?");
        page.attach("file", FileUpload::pdf("aula.pdf", vec![1, 2]));

        page.submit().await;

        assert!(page.state().attachment("file").is_none());
        assert!(page.state().status().is_none());
    }

    #[tokio::test]
    async fn replay_overwrites_inputs_and_clears_result() {
        let backend = ScriptedToolBackend::new().with_json(
            "/corporate-translator",
            StatusCode::OK,
            json!({"translated_text": "Hello"}),
        );
        let h = harness(MockIdentityProvider::signed_in("u"), backend);
        let mut page = ToolPage::mount(spec(ToolType::Translator), h.services.clone()).await;
        page.set_field("text", "Olá");
        page.submit().await;
        page.state_mut().toggle_history();

        let mut metadata = Map::new();
        metadata.insert("tone".into(), json!("Casual"));
        metadata.insert("lang".into(), json!("Inglês"));
        h.bus.publish(ReplayEvent::new("X").with_metadata(metadata));

        assert_eq!(page.poll_replay(), 1);
        assert_eq!(page.state().field("text"), Some("X"));
        assert_eq!(page.state().field("tone"), Some("Casual"));
        assert_eq!(page.state().field("target_lang"), Some("Inglês"));
        assert!(page.state().result().is_none());
        assert!(!page.state().history_open());
        assert!(page.state_mut().take_scroll_request());
    }

    #[tokio::test]
    async fn unmounted_page_ignores_replay() {
        let h = harness(MockIdentityProvider::signed_in("u"), ScriptedToolBackend::new());
        let mut page = ToolPage::mount(spec(ToolType::SocialMedia), h.services.clone()).await;
        page.unmount();

        assert_eq!(h.bus.publish(ReplayEvent::new("X")), 0);
        assert_eq!(page.poll_replay(), 0);
        assert!(!page.next_replay().await);
        assert_ne!(page.state().field("topic"), Some("X"));
    }
}
