//! reqwest implementation of the `HistoryStore` port.
//!
//! The history endpoints live on the same backend as the tools:
//!
//! - `POST /save-history` with the entry body
//! - `POST /get-history` with `{user_id, tool_type?, limit}`, answering
//!   `{success, history: [...]}` newest first
//! - `POST /delete-history-item` with `{user_id, item_id}`

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ApiConfig;
use crate::domain::foundation::{HistoryEntryId, UserId};
use crate::domain::history::{HistoryEntry, HistoryError, NewHistoryEntry};
use crate::domain::tool::ToolType;
use crate::ports::{HistoryQuery, HistoryStore};

use super::client::build_client;

#[derive(Debug, Serialize)]
struct ListRequest<'a> {
    user_id: &'a UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_type: Option<ToolType>,
    limit: usize,
}

#[derive(Debug, Serialize)]
struct DeleteRequest<'a> {
    user_id: &'a UserId,
    item_id: &'a HistoryEntryId,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    history: Vec<Value>,
    #[serde(default)]
    error: Option<String>,
}

/// History store backed by the backend's history endpoints.
#[derive(Debug, Clone)]
pub struct HttpHistoryStore {
    client: Client,
    config: ApiConfig,
}

impl HttpHistoryStore {
    pub fn new(config: ApiConfig) -> Result<Self, reqwest::Error> {
        let client = build_client(&config)?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: Client, config: ApiConfig) -> Self {
        Self { client, config }
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response, HistoryError> {
        let response = self
            .client
            .post(self.config.endpoint(path))
            .json(body)
            .send()
            .await
            .map_err(|e| HistoryError::transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
            .unwrap_or(text);
        Err(HistoryError::rejected(status.as_u16(), message))
    }
}

#[async_trait]
impl HistoryStore for HttpHistoryStore {
    async fn save(&self, entry: &NewHistoryEntry) -> Result<(), HistoryError> {
        self.post("/save-history", entry).await?;
        tracing::debug!(tool = %entry.tool_type, user_id = %entry.user_id, "History entry saved");
        Ok(())
    }

    async fn list(&self, query: &HistoryQuery) -> Result<Vec<HistoryEntry>, HistoryError> {
        let body = ListRequest {
            user_id: &query.user_id,
            tool_type: query.tool_type,
            limit: query.limit,
        };
        let response = self.post("/get-history", &body).await?;
        let status = response.status().as_u16();
        let list: ListResponse = response
            .json()
            .await
            .map_err(|e| HistoryError::decode(e.to_string()))?;

        if !list.success {
            return Err(HistoryError::rejected(
                status,
                list.error.unwrap_or_else(|| "history listing failed".to_string()),
            ));
        }

        // Rows written by tools this client does not know are skipped.
        let entries = list
            .history
            .into_iter()
            .filter_map(|row| match serde_json::from_value::<HistoryEntry>(row) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping undecodable history row");
                    None
                }
            })
            .collect();
        Ok(entries)
    }

    async fn delete(&self, user_id: &UserId, id: &HistoryEntryId) -> Result<(), HistoryError> {
        let body = DeleteRequest {
            user_id,
            item_id: id,
        };
        self.post("/delete-history-item", &body).await?;
        Ok(())
    }
}
