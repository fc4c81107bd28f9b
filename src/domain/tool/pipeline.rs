//! Document pipeline for question-answering over an uploaded file.
//!
//! The states are encoded in the type so that a question can only be built
//! from a [`QueryableDocument`]:
//!
//! ```text
//! PendingUpload --upload 2xx--> UploadedDocument --ready--> QueryableDocument
//! (no new file) ---------------------------------------> QueryableDocument
//! ```
//!
//! A failed upload consumes the pending state without producing a later one,
//! so the question call is unreachable.

use crate::domain::foundation::ValidationError;

use super::FileUpload;

/// Metadata label used when the question targets an earlier upload.
pub const PREVIOUSLY_LOADED_LABEL: &str = "Documento Carregado";

/// Progress reported while a multi-step submission runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStage {
    /// The file is being sent and indexed.
    Uploading,
    /// The file was accepted by the backend.
    Uploaded,
    /// The model call is in flight.
    Thinking,
}

impl SubmissionStage {
    pub fn message(&self) -> &'static str {
        match self {
            SubmissionStage::Uploading => {
                "⏳ Lendo e processando o PDF... (Isso pode levar alguns segundos)"
            }
            SubmissionStage::Uploaded => "✅ PDF processado! Analisando sua pergunta...",
            SubmissionStage::Thinking => "🤔 A IA está pensando...",
        }
    }
}

/// A document moving through the upload pipeline.
#[derive(Debug, Clone)]
pub struct DocumentPipeline<S> {
    state: S,
}

/// A picked file that has not reached the backend yet.
#[derive(Debug, Clone)]
pub struct PendingUpload {
    file: FileUpload,
}

/// Upload accepted; the backend returned an optional document id.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    file_name: String,
    document_id: Option<String>,
}

/// A document the backend can answer questions about.
#[derive(Debug, Clone)]
pub struct QueryableDocument {
    file_name: Option<String>,
    document_id: Option<String>,
}

impl DocumentPipeline<PendingUpload> {
    /// Starts the pipeline, rejecting empty files and files above `max_bytes`.
    pub fn new(file: FileUpload, max_bytes: usize) -> Result<Self, ValidationError> {
        if file.is_empty() {
            return Err(ValidationError::empty_field("file"));
        }
        if file.len() > max_bytes {
            return Err(ValidationError::too_large("file", max_bytes, file.len()));
        }
        Ok(Self {
            state: PendingUpload { file },
        })
    }

    pub fn file(&self) -> &FileUpload {
        &self.state.file
    }

    /// Records a successful upload.
    pub fn complete_upload(self, document_id: Option<String>) -> DocumentPipeline<UploadedDocument> {
        DocumentPipeline {
            state: UploadedDocument {
                file_name: self.state.file.file_name,
                document_id,
            },
        }
    }
}

impl DocumentPipeline<UploadedDocument> {
    pub fn document_id(&self) -> Option<&str> {
        self.state.document_id.as_deref()
    }

    pub fn ready(self) -> DocumentPipeline<QueryableDocument> {
        DocumentPipeline {
            state: QueryableDocument {
                file_name: Some(self.state.file_name),
                document_id: self.state.document_id,
            },
        }
    }
}

impl DocumentPipeline<QueryableDocument> {
    /// A document indexed by an earlier submission.
    pub fn previously_loaded() -> Self {
        Self {
            state: QueryableDocument {
                file_name: None,
                document_id: None,
            },
        }
    }

    /// Name of the file uploaded in this submission, if any.
    pub fn file_name(&self) -> Option<&str> {
        self.state.file_name.as_deref()
    }

    pub fn document_id(&self) -> Option<&str> {
        self.state.document_id.as_deref()
    }

    /// Label recorded with the history entry.
    pub fn label(&self) -> &str {
        self.file_name().unwrap_or(PREVIOUSLY_LOADED_LABEL)
    }
}
