//! Generation service seam and the chat-completions adapter.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use crate::error::GenerationError;

/// OpenAI-compatible chat completions endpoint of the Gemini API.
pub const DEFAULT_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/openai/chat/completions";

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// Environment variable holding the API key.
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Characters of an error body quoted in diagnostics.
const ERROR_BODY_PREVIEW: usize = 300;

/// External code generation service.
///
/// One call produces one raw response for a system/user prompt pair.
/// Implementations must honour `timeout` and be shareable across threads.
pub trait CodeGenerator: Send + Sync {
    fn generate(&self, system: &str, user: &str, timeout: Duration) -> Result<String, GenerationError>;
}

/// Connection settings for [`ChatCompletionsClient`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    /// Name of the environment variable the API key is read from.
    pub api_key_env: String,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
        }
    }
}

/// Blocking client for OpenAI-compatible `chat/completions` endpoints.
pub struct ChatCompletionsClient {
    client: Client,
    settings: GenerationSettings,
    api_key: Option<String>,
}

impl std::fmt::Debug for ChatCompletionsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionsClient")
            .field("settings", &self.settings)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionsClient {
    /// Create a client, reading the API key from `settings.api_key_env`.
    ///
    /// A missing key is not an error here; calls report it as
    /// [`GenerationError::Unavailable`].
    pub fn from_env(settings: GenerationSettings) -> Result<Self, GenerationError> {
        let api_key = std::env::var(&settings.api_key_env)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());
        Self::new(settings, api_key)
    }

    pub fn new(settings: GenerationSettings, api_key: Option<String>) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .build()
            .map_err(|e| GenerationError::unavailable(format!("failed to build http client: {e}")))?;
        Ok(Self {
            client,
            settings,
            api_key,
        })
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

impl CodeGenerator for ChatCompletionsClient {
    fn generate(&self, system: &str, user: &str, timeout: Duration) -> Result<String, GenerationError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(GenerationError::unavailable(format!(
                "no API key; set {}",
                self.settings.api_key_env
            )));
        };

        let body = json!({
            "model": self.settings.model,
            "temperature": self.settings.temperature,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": user },
            ],
        });

        debug!(
            endpoint = %self.settings.endpoint,
            model = %self.settings.model,
            timeout_ms = timeout.as_millis() as u64,
            "requesting program"
        );

        let response = self
            .client
            .post(&self.settings.endpoint)
            .bearer_auth(api_key)
            .timeout(timeout)
            .json(&body)
            .send()
            .map_err(|e| map_transport_error(&e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            let preview: String = text.trim().chars().take(ERROR_BODY_PREVIEW).collect();
            warn!(%status, "generation request rejected");
            let message = format!("HTTP {status}: {preview}");
            return Err(
                if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                    GenerationError::unavailable(message)
                } else {
                    GenerationError::service(message)
                },
            );
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| map_transport_error(&e, timeout))?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| GenerationError::service("response contained no message content"))?;

        debug!(chars = content.len(), "received program response");
        Ok(content)
    }
}

fn map_transport_error(error: &reqwest::Error, timeout: Duration) -> GenerationError {
    if error.is_timeout() {
        GenerationError::Timeout { after: timeout }
    } else if error.is_decode() {
        GenerationError::service(format!("unexpected response format: {error}"))
    } else {
        GenerationError::service(format!("request failed: {error}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_unavailable_without_network() {
        let client = ChatCompletionsClient::new(GenerationSettings::default(), None).unwrap();
        let err = client
            .generate("s", "u", Duration::from_secs(1))
            .unwrap_err();
        assert!(err.is_unavailable());
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn debug_output_redacts_the_key() {
        let client =
            ChatCompletionsClient::new(GenerationSettings::default(), Some("sk-secret".to_string()))
                .unwrap();
        let rendered = format!("{client:?}");
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn chat_response_content_is_extracted() {
        let parsed: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"print(1)"}}]}"#,
        )
        .unwrap();
        assert_eq!(
            parsed.choices[0].message.content.as_deref(),
            Some("print(1)")
        );
    }
}
