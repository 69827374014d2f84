use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

use crate::config::WebhookConfig;
use crate::error::WebhookError;
use crate::session::SessionId;

const PDF_MIME: &str = "application/pdf";

/// The remote side of a conversation.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Send one user message. Returns the reply's `output` field, if any.
    async fn send_message(
        &self,
        session: SessionId,
        text: &str,
    ) -> Result<Option<String>, WebhookError>;

    /// Upload a PDF document for the session.
    async fn upload_file(
        &self,
        session: SessionId,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<(), WebhookError>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatRequest<'a> {
    session_id: SessionId,
    action: &'static str,
    chat_input: &'a str,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    output: Option<String>,
}

/// Talks to webhook endpoints over HTTP.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    http: reqwest::Client,
    chat_url: String,
    upload_url: String,
}

impl WebhookClient {
    pub fn new(config: &WebhookConfig) -> Result<Self, WebhookError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            chat_url: config.chat_url.clone(),
            upload_url: config.upload_url.clone(),
        })
    }
}

#[async_trait]
impl Backend for WebhookClient {
    async fn send_message(
        &self,
        session: SessionId,
        text: &str,
    ) -> Result<Option<String>, WebhookError> {
        tracing::debug!(url = %self.chat_url, %session, "sending chat message");

        let request = ChatRequest {
            session_id: session,
            action: "sendMessage",
            chat_input: text,
        };
        let response = self.http.post(&self.chat_url).json(&request).send().await?;
        let response = ensure_success(response).await?;

        let body = response.bytes().await?;
        let reply: ChatReply = serde_json::from_slice(&body).map_err(WebhookError::Decode)?;
        Ok(reply.output)
    }

    async fn upload_file(
        &self,
        session: SessionId,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<(), WebhookError> {
        tracing::debug!(
            url = %self.upload_url,
            %session,
            file_name,
            size = bytes.len(),
            "uploading file"
        );

        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(PDF_MIME)?;
        let form = Form::new()
            .part("file", part)
            .text("sessionId", session.to_string())
            .text("action", "uploadFile");

        let response = self.http.post(&self.upload_url).multipart(form).send().await?;
        ensure_success(response).await?;
        Ok(())
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, WebhookError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(WebhookError::Status { status, body })
}
