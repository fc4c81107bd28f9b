//! Application layer - The tool workflow shared by every page.
//!
//! - `SessionResolver` - who is signed in, re-checked per submission
//! - `ToolSpec` / `ToolCatalog` - what varies between tools
//! - `ToolInvoker` - the request/response cycle
//! - `HistoryRecorder` - best-effort persistence after success
//! - `HistoryBrowser` - history list, delete and replay selection
//! - `ReplayListener` / `ToolPage` - per-page state, submissions and replay

mod browser;
mod catalog;
mod invoker;
mod page;
mod recorder;
mod replay_listener;
pub mod result_mappers;
mod session_resolver;
mod tool_spec;

pub use browser::HistoryBrowser;
pub use catalog::{
    history_output, image_prompt, image_style_descriptor, ToolCatalog, DEFAULT_ESSAY_THEME,
    SPREADSHEET_HISTORY_OUTPUT,
};
pub use invoker::{Invocation, ToolInvoker};
pub use page::{PageServices, SubmitOutcome, ToolPage};
pub use recorder::{HistoryRecorder, RecordOutcome};
pub use replay_listener::ReplayListener;
pub use session_resolver::SessionResolver;
pub use tool_spec::{
    text_fields_payload, HistoryFn, PayloadFn, ResultFn, Submission, ToolSpec, ToolSpecBuilder,
    UploadStep,
};
