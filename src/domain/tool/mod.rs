//! Tool domain - the shapes shared by every AI-backed tool page.

mod errors;
mod page_state;
mod pipeline;
mod request;
mod result;
pub mod text;
mod tool_type;

pub use errors::{ToolError, LOGIN_REQUIRED_MESSAGE};
pub use page_state::{SubmissionGuard, ToolPageState, ToolPhase};
pub use pipeline::{
    DocumentPipeline, PendingUpload, QueryableDocument, SubmissionStage, UploadedDocument,
    PREVIOUSLY_LOADED_LABEL,
};
pub use request::{FieldValue, FileUpload, ToolRequest};
pub use result::{BinaryOutput, EssayScore, ToolResult};
pub use tool_type::{ToolType, UPLOAD_CREDIT_COST};
