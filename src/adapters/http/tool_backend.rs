//! reqwest implementation of the `ToolBackend` port.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::{header, Client};

use crate::config::ApiConfig;
use crate::ports::{BackendResponse, MultipartPart, RequestBody, ToolBackend, TransportError};

use super::client::{build_client, status_code, transport_error};

/// Sends tool requests to the AI backend over HTTP.
#[derive(Debug, Clone)]
pub struct HttpToolBackend {
    client: Client,
    config: ApiConfig,
}

impl HttpToolBackend {
    pub fn new(config: ApiConfig) -> Result<Self, reqwest::Error> {
        let client = build_client(&config)?;
        Ok(Self::with_client(client, config))
    }

    /// Shares an existing client (e.g. with the history store).
    pub fn with_client(client: Client, config: ApiConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl ToolBackend for HttpToolBackend {
    async fn post(
        &self,
        endpoint: &str,
        body: RequestBody,
    ) -> Result<BackendResponse, TransportError> {
        let url = self.config.endpoint(endpoint);
        tracing::debug!(endpoint, body = body.kind(), "Calling tool backend");

        let request = self.client.post(&url);
        let request = match body {
            RequestBody::Json(value) => request.json(&value),
            RequestBody::Multipart(parts) => request.multipart(to_form(parts)?),
        };

        let response = request.send().await.map_err(transport_error)?;
        let status = status_code(response.status())?;
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let mut body = Vec::new();
        let mut stream = Box::pin(response.bytes_stream());
        while let Some(chunk) = stream.next().await {
            body.extend_from_slice(&chunk.map_err(transport_error)?);
        }

        tracing::debug!(endpoint, status = status.as_u16(), len = body.len(), "Tool backend responded");
        Ok(BackendResponse::new(status, content_type, body))
    }
}

fn to_form(parts: Vec<MultipartPart>) -> Result<Form, TransportError> {
    parts.into_iter().try_fold(Form::new(), |form, part| match part {
        MultipartPart::Text { name, value } => Ok(form.text(name, value)),
        MultipartPart::File { name, file } => {
            let part = Part::bytes(file.bytes)
                .file_name(file.file_name)
                .mime_str(&file.content_type)
                .map_err(|e| TransportError::Other(format!("invalid content type: {}", e)))?;
            Ok(form.part(name, part))
        }
    })
}
