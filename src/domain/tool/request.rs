//! ToolRequest - the form state submitted to a tool.
//!
//! A request is built fresh for every submission and never persisted.

use std::collections::BTreeMap;
use std::fmt;

/// A file picked in a form (e.g. the PDF for document questions).
#[derive(Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Convenience constructor for PDF documents.
    pub fn pdf(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(file_name, "application/pdf", bytes)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for FileUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Value of a single form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    File(FileUpload),
}

/// Mapping from field name to value for one tool submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolRequest {
    fields: BTreeMap<String, FieldValue>,
}

impl ToolRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style text field.
    pub fn with_text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_text(name, value);
        self
    }

    /// Builder-style file field.
    pub fn with_file(mut self, name: impl Into<String>, file: FileUpload) -> Self {
        self.fields.insert(name.into(), FieldValue::File(file));
        self
    }

    pub fn set_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), FieldValue::Text(value.into()));
    }

    /// Text value of a field, if present and textual.
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.fields.get(name) {
            Some(FieldValue::Text(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Text value of a field, or `default` when missing or blank.
    pub fn text_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        match self.text(name) {
            Some(value) if !value.trim().is_empty() => value,
            _ => default,
        }
    }

    /// File value of a field, if present.
    pub fn file(&self, name: &str) -> Option<&FileUpload> {
        match self.fields.get(name) {
            Some(FieldValue::File(file)) => Some(file),
            _ => None,
        }
    }

    /// True when the field is absent, blank text, or an empty file.
    pub fn is_blank(&self, name: &str) -> bool {
        match self.fields.get(name) {
            None => true,
            Some(FieldValue::Text(value)) => value.trim().is_empty(),
            Some(FieldValue::File(file)) => file.is_empty(),
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}
