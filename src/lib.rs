mod block;
mod config;
mod conversation;
mod error;
mod html;
mod parser;
mod session;
mod text;
mod webhook;

pub use block::{Block, ListItem, Segment};
pub use config::{Config, HtmlConfig, MessagesConfig, TextConfig, WebhookConfig};
pub use conversation::{Conversation, Message, Sender};
pub use error::{ConfigError, UploadError, WebhookError};
pub use html::blocks_to_html;
pub use session::SessionId;
pub use text::blocks_to_text;
pub use webhook::{Backend, WebhookClient};

/// Parse a chat message into a vector of blocks.
///
/// Never fails: every string, including one with unbalanced `**`, maps to
/// some sequence of blocks.
pub fn render(text: &str) -> Vec<Block> {
    parser::parse(text)
}

/// Convert a chat message to an HTML fragment.
pub fn message_to_html(text: &str, config: &HtmlConfig) -> String {
    blocks_to_html(&render(text), config)
}

/// Convert a chat message to terminal text.
pub fn message_to_text(text: &str, config: &TextConfig) -> String {
    blocks_to_text(&render(text), config)
}
