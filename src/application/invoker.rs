//! ToolInvoker - Runs one tool submission end to end.
//!
//! 1. Re-check the session (no session: zero backend calls)
//! 2. Apply defaults and validate inputs locally
//! 3. Upload the attached document when the tool has an upload step
//! 4. POST the payload and map 402 / non-2xx responses to errors
//! 5. Map the result and describe the history entry
//!
//! Calls are strictly sequential and never retried.

use serde_json::Value;
use std::sync::Arc;

use crate::domain::foundation::{SubmissionId, UserId};
use crate::domain::history::NewHistoryEntry;
use crate::domain::tool::{
    DocumentPipeline, PendingUpload, QueryableDocument, SubmissionStage, ToolError, ToolRequest,
    ToolResult, UploadedDocument,
};
use crate::ports::{MultipartPart, RequestBody, ToolBackend};

use super::session_resolver::SessionResolver;
use super::tool_spec::{Submission, ToolSpec, UploadStep};

/// Outcome of a successful submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub result: ToolResult,
    /// Entry to record; `None` for tools without history.
    pub history: Option<NewHistoryEntry>,
    /// A new document was uploaded by this submission.
    pub uploaded: bool,
}

/// Generic request/response cycle shared by every tool.
#[derive(Clone)]
pub struct ToolInvoker {
    sessions: SessionResolver,
    backend: Arc<dyn ToolBackend>,
}

impl ToolInvoker {
    pub fn new(sessions: SessionResolver, backend: Arc<dyn ToolBackend>) -> Self {
        Self { sessions, backend }
    }

    pub async fn invoke(&self, spec: &ToolSpec, request: ToolRequest) -> Result<Invocation, ToolError> {
        self.invoke_with_progress(spec, request, &mut |_| {}).await
    }

    /// Like [`invoke`](Self::invoke), reporting progress of multi-step flows.
    pub async fn invoke_with_progress(
        &self,
        spec: &ToolSpec,
        request: ToolRequest,
        on_stage: &mut (dyn FnMut(SubmissionStage) + Send),
    ) -> Result<Invocation, ToolError> {
        let session = self.sessions.require().await?;
        let user_id = session.user_id();
        let submission_id = SubmissionId::new();

        let request = spec.prepare(request);
        spec.validate(&request)?;

        let pending = match spec.upload() {
            Some(step) => match request.file(&step.file_field) {
                Some(file) => Some(DocumentPipeline::new(file.clone(), step.max_bytes)?),
                None => None,
            },
            None => None,
        };

        tracing::info!(
            submission_id = %submission_id,
            tool = %spec.tool_type(),
            user_id = %user_id,
            "Tool submission started"
        );

        let document = match (spec.upload(), pending) {
            (Some(step), Some(pending)) => {
                on_stage(SubmissionStage::Uploading);
                let uploaded = self.upload(step, pending, user_id).await?;
                on_stage(SubmissionStage::Uploaded);
                Some(uploaded.ready())
            }
            (Some(_), None) => Some(DocumentPipeline::<QueryableDocument>::previously_loaded()),
            (None, _) => None,
        };
        if document.is_some() {
            on_stage(SubmissionStage::Thinking);
        }

        let submission = Submission {
            request: &request,
            user_id,
            document: document.as_ref(),
        };
        let body = RequestBody::Json(spec.payload(&submission));
        let response = self.backend.post(spec.endpoint(), body).await?;

        if !response.is_success() {
            let err = response.to_tool_error(spec.fallback_error());
            tracing::warn!(
                submission_id = %submission_id,
                tool = %spec.tool_type(),
                status = response.status.as_u16(),
                error = %err,
                "Tool call failed"
            );
            return Err(err);
        }

        let result = spec.map_result(&response)?;
        let history = spec
            .history_draft(&submission, &result)
            .map(|draft| NewHistoryEntry::new(user_id.clone(), spec.tool_type(), draft));

        tracing::info!(
            submission_id = %submission_id,
            tool = %spec.tool_type(),
            result = result.kind(),
            "Tool submission succeeded"
        );

        Ok(Invocation {
            result,
            history,
            uploaded: document.as_ref().and_then(|d| d.file_name()).is_some(),
        })
    }

    async fn upload(
        &self,
        step: &UploadStep,
        pending: DocumentPipeline<PendingUpload>,
        user_id: &UserId,
    ) -> Result<DocumentPipeline<UploadedDocument>, ToolError> {
        let body = RequestBody::Multipart(vec![
            MultipartPart::file(step.file_field.clone(), pending.file().clone()),
            MultipartPart::text("user_id", user_id.as_str()),
        ]);
        let response = self.backend.post(&step.endpoint, body).await?;

        if !response.is_success() {
            return Err(response.to_tool_error(&step.fallback_error));
        }

        let document_id = response
            .json_body()
            .ok()
            .and_then(|body| body.get("document_id").cloned())
            .and_then(|id| match id {
                Value::String(s) => Some(s),
                Value::Null => None,
                other => Some(other.to_string()),
            });
        tracing::debug!(document_id = ?document_id, "Document uploaded");

        Ok(pending.complete_upload(document_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::MockIdentityProvider;
    use crate::adapters::backend::ScriptedToolBackend;
    use crate::application::ToolCatalog;
    use crate::config::LimitsConfig;
    use crate::domain::tool::{FileUpload, ToolType};
    use crate::ports::TransportError;
    use http::StatusCode;
    use serde_json::json;

    fn catalog() -> ToolCatalog {
        ToolCatalog::new(&LimitsConfig::default()).unwrap()
    }

    fn invoker(identity: MockIdentityProvider, backend: &ScriptedToolBackend) -> ToolInvoker {
        ToolInvoker::new(
            SessionResolver::new(Arc::new(identity)),
            Arc::new(backend.clone()),
        )
    }

    fn signed_in(backend: &ScriptedToolBackend) -> ToolInvoker {
        invoker(MockIdentityProvider::signed_in("user-1"), backend)
    }

    fn summary_request() -> ToolRequest {
        ToolRequest::new().with_text("text", "Um texto qualquer para resumir.")
    }

    #[tokio::test]
    async fn no_session_means_no_backend_call() {
        let backend = ScriptedToolBackend::new();
        let catalog = catalog();

        for tool in ToolType::all() {
            let err = invoker(MockIdentityProvider::anonymous(), &backend)
                .invoke(catalog.get(*tool).unwrap(), ToolRequest::new())
                .await
                .unwrap_err();
            assert_eq!(err, ToolError::LoginRequired);
        }
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn validation_failure_means_no_backend_call() {
        let backend = ScriptedToolBackend::new();
        let catalog = catalog();

        let err = signed_in(&backend)
            .invoke(
                catalog.get(ToolType::EssayCorrector).unwrap(),
                ToolRequest::new().with_text("essay", "curta demais"),
            )
            .await
            .unwrap_err();

        assert_eq!(err.code(), "VALIDATION_FAILED");
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn success_maps_result_and_history() {
        let backend = ScriptedToolBackend::new().with_json(
            "/summarize-text",
            StatusCode::OK,
            json!({"summary": "Resumo."}),
        );
        let catalog = catalog();

        let invocation = signed_in(&backend)
            .invoke(catalog.get(ToolType::TextSummary).unwrap(), summary_request())
            .await
            .unwrap();

        assert_eq!(invocation.result, ToolResult::Text("Resumo.".into()));
        let entry = invocation.history.unwrap();
        assert_eq!(entry.user_id.as_str(), "user-1");
        assert_eq!(entry.tool_type, ToolType::TextSummary);
        assert_eq!(entry.output_data, "Resumo.");
        assert_eq!(entry.metadata["format"], json!("bulletpoints"));

        let call = &backend.calls()[0];
        assert_eq!(call.json().unwrap()["user_id"], json!("user-1"));
    }

    #[tokio::test]
    async fn payment_required_is_passed_through_verbatim() {
        let backend = ScriptedToolBackend::new().with_json(
            "/generate-image",
            StatusCode::PAYMENT_REQUIRED,
            json!({"error": "Créditos insuficientes"}),
        );
        let catalog = catalog();

        let err = signed_in(&backend)
            .invoke(
                catalog.get(ToolType::ImageGenerator).unwrap(),
                ToolRequest::new().with_text("prompt", "a cat"),
            )
            .await
            .unwrap_err();

        assert_eq!(err, ToolError::PaymentRequired("Créditos insuficientes".into()));
        assert_eq!(err.user_message(), "Créditos insuficientes");
    }

    #[tokio::test]
    async fn error_without_message_uses_tool_fallback() {
        let backend = ScriptedToolBackend::new().with_json(
            "/summarize-text",
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({}),
        );
        let catalog = catalog();

        let err = signed_in(&backend)
            .invoke(catalog.get(ToolType::TextSummary).unwrap(), summary_request())
            .await
            .unwrap_err();

        assert_eq!(err.user_message(), "Erro ao resumir.");
    }

    #[tokio::test]
    async fn transport_failure_is_reported() {
        let backend = ScriptedToolBackend::new()
            .with_transport_error("/summarize-text", TransportError::Timeout);
        let catalog = catalog();

        let err = signed_in(&backend)
            .invoke(catalog.get(ToolType::TextSummary).unwrap(), summary_request())
            .await
            .unwrap_err();

        assert_eq!(err.code(), "TRANSPORT_ERROR");
    }

    #[tokio::test]
    async fn upload_completes_before_question() {
        let backend = ScriptedToolBackend::new()
            .with_json(
                "/upload-document",
                StatusCode::OK,
                json!({"message": "ok", "document_id": 12}),
            )
            .with_json("/ask-document", StatusCode::OK, json!({"answer": "Energia solar."}));
        let catalog = catalog();
        let mut stages = Vec::new();

        let invocation = signed_in(&backend)
            .invoke_with_progress(
                catalog.get(ToolType::ChatPdf).unwrap(),
                ToolRequest::new()
                    .with_text("question", "Qual o tema?")
                    .with_file("file", FileUpload::pdf("aula.pdf", vec![1, 2, 3])),
                &mut |stage| stages.push(stage),
            )
            .await
            .unwrap();

        assert_eq!(backend.endpoints(), vec!["/upload-document", "/ask-document"]);
        assert_eq!(
            stages,
            vec![
                SubmissionStage::Uploading,
                SubmissionStage::Uploaded,
                SubmissionStage::Thinking
            ]
        );
        assert!(invocation.uploaded);
        assert_eq!(
            invocation.history.unwrap().metadata["file_name"],
            json!("aula.pdf")
        );

        match &backend.calls()[0].body {
            RequestBody::Multipart(parts) => {
                let names: Vec<_> = parts.iter().map(MultipartPart::name).collect();
                assert_eq!(names, vec!["file", "user_id"]);
            }
            other => panic!("expected multipart upload, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn failed_upload_skips_question() {
        let backend = ScriptedToolBackend::new()
            .with_json(
                "/upload-document",
                StatusCode::BAD_REQUEST,
                json!({"error": "PDF sem texto"}),
            )
            .with_json("/ask-document", StatusCode::OK, json!({"answer": "nunca"}));
        let catalog = catalog();

        let err = signed_in(&backend)
            .invoke(
                catalog.get(ToolType::ChatPdf).unwrap(),
                ToolRequest::new()
                    .with_text("question", "Qual o tema?")
                    .with_file("file", FileUpload::pdf("aula.pdf", vec![1])),
            )
            .await
            .unwrap_err();

        assert_eq!(err.user_message(), "PDF sem texto");
        assert_eq!(backend.endpoints(), vec!["/upload-document"]);
    }

    #[tokio::test]
    async fn question_without_file_targets_previous_document() {
        let backend = ScriptedToolBackend::new()
            .with_json("/ask-document", StatusCode::OK, json!({"answer": "Sim."}));
        let catalog = catalog();
        let mut stages = Vec::new();

        let invocation = signed_in(&backend)
            .invoke_with_progress(
                catalog.get(ToolType::ChatPdf).unwrap(),
                ToolRequest::new().with_text("question", "E a conclusão?"),
                &mut |stage| stages.push(stage),
            )
            .await
            .unwrap();

        assert_eq!(stages, vec![SubmissionStage::Thinking]);
        assert!(!invocation.uploaded);
        assert_eq!(
            invocation.history.unwrap().metadata["file_name"],
            json!("Documento Carregado")
        );
    }

    #[tokio::test]
    async fn oversized_file_is_rejected_locally() {
        let backend = ScriptedToolBackend::new();
        let limits = LimitsConfig {
            max_upload_bytes: 2,
            ..Default::default()
        };
        let catalog = ToolCatalog::new(&limits).unwrap();

        let err = signed_in(&backend)
            .invoke(
                catalog.get(ToolType::ChatPdf).unwrap(),
                ToolRequest::new()
                    .with_text("question", "?")
                    .with_file("file", FileUpload::pdf("big.pdf", vec![0; 3])),
            )
            .await
            .unwrap_err();

        assert_eq!(err.code(), "VALIDATION_FAILED");
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn docx_export_returns_file_without_history() {
        let backend = ScriptedToolBackend::new().with_response(
            "/download-docx",
            crate::ports::BackendResponse::binary(StatusCode::OK, "application/octet-stream", vec![80, 75]),
        );
        let catalog = catalog();

        let invocation = signed_in(&backend)
            .invoke(
                catalog.docx_export(),
                ToolRequest::new().with_text("markdown_text", "# Título"),
            )
            .await
            .unwrap();

        assert_eq!(invocation.result.as_file().unwrap().file_name, "Trabalho_ABNT.docx");
        assert!(invocation.history.is_none());
        assert_eq!(
            backend.calls()[0].json().unwrap(),
            &json!({"markdown_text": "# Título"})
        );
    }
}
