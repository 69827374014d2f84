use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::ConfigError;

static DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub webhook: WebhookConfig,
    pub messages: MessagesConfig,
    pub html: HtmlConfig,
    pub text: TextConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct WebhookConfig {
    pub chat_url: String,
    pub upload_url: String,
    pub timeout_secs: u64,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            chat_url: "http://localhost:5678/webhook/chat".to_string(),
            upload_url: "http://localhost:5678/webhook/upload-document".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Texts recorded in the conversation on behalf of the client.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct MessagesConfig {
    pub connection_error: String,
    pub empty_reply: String,
    /// `{name}` is replaced with the file name.
    pub upload_sent: String,
    pub upload_received: String,
    /// `{error}` is replaced with the failure reason.
    pub upload_failed: String,
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            connection_error: "Could not reach the server. Please try again.".to_string(),
            empty_reply: "Sorry, I couldn't process your message.".to_string(),
            upload_sent: "PDF file sent: {name}".to_string(),
            upload_received: "File received successfully!".to_string(),
            upload_failed: "Error sending the file: {error}. Please try again.".to_string(),
        }
    }
}

impl MessagesConfig {
    pub fn upload_sent_for(&self, name: &str) -> String {
        self.upload_sent.replace("{name}", name)
    }

    pub fn upload_failed_for(&self, error: &str) -> String {
        self.upload_failed.replace("{error}", error)
    }
}

/// CSS classes for the HTML presenter. Empty strings omit the attribute.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct HtmlConfig {
    pub heading2: String,
    pub heading3: String,
    pub paragraph: String,
    pub list: String,
    pub item: String,
    pub bold: String,
    pub spacer: String,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            heading2: "text-2xl font-semibold mt-6 mb-4".to_string(),
            heading3: "text-xl font-bold mt-5 mb-3".to_string(),
            paragraph: "text-lg font-medium mt-4 mb-4".to_string(),
            list: "list-disc list-inside ml-4 mt-4 mb-4".to_string(),
            item: "text-lg font-medium mt-2".to_string(),
            bold: "font-bold".to_string(),
            spacer: "h-4".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct TextConfig {
    pub bullet: String,
    pub bold_marker: String,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            bullet: "• ".to_string(),
            bold_marker: String::new(),
        }
    }
}

impl Config {
    /// The configuration embedded at build time from `default_config.toml`.
    pub fn compiled_default() -> Self {
        toml::from_str(DEFAULT_CONFIG).unwrap_or_default()
    }

    /// The raw text of the embedded default configuration.
    pub fn default_toml() -> &'static str {
        DEFAULT_CONFIG
    }

    /// Load config from a TOML file, or return defaults if it does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::compiled_default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse config text; keys it leaves out keep their default values.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
