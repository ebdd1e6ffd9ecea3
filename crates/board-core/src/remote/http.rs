//! REST implementation of the task store.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::wire::{
    AttachTag, CardUpdate, ColumnUpdate, Envelope, NewCard, NewChecklist, NewColumn, NewSubtask,
    NewTag, ReorderBody, ReorderCard, SubtaskUpdate,
};
use super::TaskStore;
use crate::config::{BoardConfig, ConfigError};
use crate::domain::{Card, CardId, Checklist, Column, ColumnId, Subtask, SubtaskId, Tag, TagId};
use crate::error::{BoardError, BoardResult};

#[derive(Clone, Debug)]
pub struct HttpTaskStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTaskStore {
    pub fn new(config: &BoardConfig) -> BoardResult<Self> {
        let base_url = config
            .api_base_url
            .as_deref()
            .ok_or(ConfigError::InvalidValue {
                field: "api_base_url",
                reason: "required for the HTTP store".to_string(),
            })?;
        Self::with_base_url(
            base_url,
            config.auth_token.as_deref(),
            Duration::from_millis(config.request_timeout_ms),
        )
    }

    pub fn with_base_url(
        base_url: &str,
        auth_token: Option<&str>,
        timeout: Duration,
    ) -> BoardResult<Self> {
        let mut headers = HeaderMap::new();
        if let Some(token) = auth_token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|e| {
                ConfigError::InvalidValue {
                    field: "auth_token",
                    reason: e.to_string(),
                }
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        let builder = reqwest::Client::builder().default_headers(headers);
        // The browser's fetch has no per-client timeout
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(timeout);
        #[cfg(target_arch = "wasm32")]
        let _ = timeout;

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and return the body of a 2xx response
    async fn send<B>(&self, method: Method, path: &str, body: Option<&B>) -> BoardResult<String>
    where
        B: Serialize + ?Sized,
    {
        let mut request = self.client.request(method.clone(), self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            tracing::warn!(%method, path, status = status.as_u16(), "task store request failed");
            return Err(BoardError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        tracing::debug!(%method, path, "task store request ok");
        Ok(text)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> BoardResult<T> {
        let text = self.send::<()>(Method::GET, path, None).await?;
        let envelope: Envelope<T> = serde_json::from_str(&text)?;
        Ok(envelope.into_inner())
    }

    async fn send_json<T, B>(&self, method: Method, path: &str, body: &B) -> BoardResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let text = self.send(method, path, Some(body)).await?;
        let envelope: Envelope<T> = serde_json::from_str(&text)?;
        Ok(envelope.into_inner())
    }

    /// Fire a request whose response body is irrelevant
    async fn ack<B>(&self, method: Method, path: &str, body: Option<&B>) -> BoardResult<()>
    where
        B: Serialize + ?Sized,
    {
        self.send(method, path, body).await.map(|_| ())
    }
}

#[async_trait(?Send)]
impl TaskStore for HttpTaskStore {
    async fn list_columns(&self) -> BoardResult<Vec<Column>> {
        self.get_json("/task-cards/show").await
    }

    async fn create_column(&self, req: &NewColumn) -> BoardResult<Column> {
        self.send_json(Method::POST, "/task-cards/store", req).await
    }

    async fn update_column(&self, req: &ColumnUpdate) -> BoardResult<()> {
        let path = format!("/task-cards/update/{}", req.id);
        self.ack(Method::PUT, &path, Some(req)).await
    }

    async fn delete_column(&self, id: ColumnId) -> BoardResult<()> {
        let path = format!("/task-cards/destroy/{}", id);
        self.ack::<()>(Method::DELETE, &path, None).await
    }

    async fn list_cards(&self) -> BoardResult<Vec<Card>> {
        self.get_json("/tarefas/find").await
    }

    async fn create_card(&self, req: &NewCard) -> BoardResult<Card> {
        self.send_json(Method::POST, "/tarefas/store", req).await
    }

    async fn update_card(&self, id: CardId, req: &CardUpdate) -> BoardResult<()> {
        let path = format!("/tarefas/update/{}", id);
        self.ack(Method::PUT, &path, Some(req)).await
    }

    async fn reorder_card(&self, req: &ReorderCard) -> BoardResult<()> {
        let path = format!("/tarefas/reorder/{}", req.tarefa_id);
        self.ack(Method::PATCH, &path, Some(&ReorderBody::from(req)))
            .await
    }

    async fn delete_card(&self, id: CardId) -> BoardResult<()> {
        let path = format!("/tarefas/destroy/{}", id);
        self.ack::<()>(Method::DELETE, &path, None).await
    }

    async fn list_tags(&self) -> BoardResult<Vec<Tag>> {
        self.get_json("/task-tickets/show").await
    }

    async fn create_tag(&self, req: &NewTag) -> BoardResult<Tag> {
        self.send_json(Method::POST, "/task-tickets/store", req).await
    }

    async fn delete_tag(&self, id: TagId) -> BoardResult<()> {
        let path = format!("/task-tickets/destroy/{}", id);
        self.ack::<()>(Method::DELETE, &path, None).await
    }

    async fn attach_tag(&self, card: CardId, tag: TagId) -> BoardResult<()> {
        let body = AttachTag {
            tarefa_id: card,
            ticket_id: tag,
        };
        self.ack(Method::POST, "/task-tickets/attach", Some(&body))
            .await
    }

    async fn detach_tag(&self, card: CardId, tag: TagId) -> BoardResult<()> {
        let path = format!("/task-tickets/detach/{}/{}", card, tag);
        self.ack::<()>(Method::DELETE, &path, None).await
    }

    async fn get_checklist(&self, card: CardId) -> BoardResult<Option<Checklist>> {
        let path = format!("/task-checklists/show/{}", card);
        match self.get_json(&path).await {
            Err(BoardError::Status { status: 404, .. }) => Ok(None),
            other => other,
        }
    }

    async fn create_checklist(&self, card: CardId) -> BoardResult<Checklist> {
        let body = NewChecklist { tarefa_id: card };
        self.send_json(Method::POST, "/task-checklists/store", &body)
            .await
    }

    async fn create_subtask(&self, req: &NewSubtask) -> BoardResult<Subtask> {
        self.send_json(Method::POST, "/task-subtasks/store", req).await
    }

    async fn update_subtask(&self, id: SubtaskId, req: &SubtaskUpdate) -> BoardResult<()> {
        let path = format!("/task-subtasks/update/{}", id);
        self.ack(Method::PUT, &path, Some(req)).await
    }

    async fn delete_subtask(&self, id: SubtaskId) -> BoardResult<()> {
        let path = format!("/task-subtasks/destroy/{}", id);
        self.ack::<()>(Method::DELETE, &path, None).await
    }
}
