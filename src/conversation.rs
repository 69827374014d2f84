//! Message log for one chat session.
//!
//! Backend failures never escape from here: they are logged and recorded as
//! a bot message carrying one of the configured fallback texts.

use std::path::Path;

use chrono::{DateTime, Local};
use tokio::sync::watch;

use crate::block::{Block, Segment};
use crate::config::MessagesConfig;
use crate::error::UploadError;
use crate::session::SessionId;
use crate::webhook::Backend;

const PDF_MIME: &str = "application/pdf";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Local>,
}

impl Message {
    fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender,
            timestamp: Local::now(),
        }
    }

    /// Bot replies are rendered as markdown; user text is shown as typed.
    pub fn blocks(&self) -> Vec<Block> {
        match self.sender {
            Sender::Bot => crate::render(&self.text),
            Sender::User => vec![Block::Paragraph {
                segments: vec![Segment::Plain(self.text.clone())],
            }],
        }
    }
}

pub struct Conversation<B> {
    backend: B,
    session: SessionId,
    texts: MessagesConfig,
    messages: Vec<Message>,
    pending: watch::Sender<bool>,
}

impl<B: Backend> Conversation<B> {
    pub fn new(backend: B, texts: MessagesConfig) -> Self {
        let session = SessionId::new();
        tracing::info!(%session, "starting conversation");
        Self {
            backend,
            session,
            texts,
            messages: Vec::new(),
            pending: watch::Sender::new(false),
        }
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// True while a chat request is waiting for its reply.
    pub fn is_pending(&self) -> bool {
        *self.pending.borrow()
    }

    /// Follows the pending flag, e.g. to drive a typing indicator from
    /// another task while `send` is awaiting the backend.
    pub fn typing(&self) -> watch::Receiver<bool> {
        self.pending.subscribe()
    }

    /// Send a user message and record the reply.
    ///
    /// Blank input is ignored and returns `None`. Otherwise the returned
    /// message is the bot's reply or a fallback text.
    pub async fn send(&mut self, input: &str) -> Option<&Message> {
        if input.trim().is_empty() {
            return None;
        }

        self.push(Sender::User, input);

        let result = {
            let _pending = PendingGuard::set(&self.pending);
            self.backend.send_message(self.session, input).await
        };

        let reply = match result {
            Ok(Some(output)) if !output.is_empty() => output,
            Ok(_) => self.texts.empty_reply.clone(),
            Err(e) => {
                tracing::warn!(session = %self.session, "chat request failed: {e}");
                self.texts.connection_error.clone()
            }
        };
        Some(self.push(Sender::Bot, reply))
    }

    /// Validate and upload a PDF, recording the outcome in the log.
    ///
    /// Files that cannot be read or are not PDFs are rejected before anything
    /// is recorded or sent.
    pub async fn upload_pdf(&mut self, path: &Path) -> Result<&Message, UploadError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| UploadError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        if !is_pdf(&bytes) {
            return Err(UploadError::NotPdf {
                path: path.to_path_buf(),
            });
        }

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document.pdf".to_string());

        tracing::info!(session = %self.session, file_name = %file_name, "uploading PDF");
        let sent = self.texts.upload_sent_for(&file_name);
        self.push(Sender::User, sent);

        let reply = match self.backend.upload_file(self.session, &file_name, bytes).await {
            Ok(()) => self.texts.upload_received.clone(),
            Err(e) => {
                tracing::warn!(
                    session = %self.session,
                    file_name = %file_name,
                    "upload failed: {e}"
                );
                self.texts.upload_failed_for(&e.to_string())
            }
        };
        Ok(self.push(Sender::Bot, reply))
    }

    fn push(&mut self, sender: Sender, text: impl Into<String>) -> &Message {
        self.messages.push(Message::new(sender, text));
        // non-empty: just pushed
        &self.messages[self.messages.len() - 1]
    }
}

fn is_pdf(bytes: &[u8]) -> bool {
    infer::get(bytes).is_some_and(|kind| kind.mime_type() == PDF_MIME)
}

/// Holds the pending flag up until dropped, including on cancellation.
struct PendingGuard<'a>(&'a watch::Sender<bool>);

impl<'a> PendingGuard<'a> {
    fn set(flag: &'a watch::Sender<bool>) -> Self {
        flag.send_replace(true);
        Self(flag)
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.0.send_replace(false);
    }
}
