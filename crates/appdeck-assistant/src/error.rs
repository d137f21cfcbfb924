use appdeck_storage::StorageError;

pub type AssistantResult<T> = Result<T, AssistantError>;

#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("No AI credentials configured. Add an API key or sign in under Settings.")]
    NotConfigured,
    /// Permission or authentication rejection with a fixed remediation
    /// message the editor shows verbatim.
    #[error("{0}")]
    UpstreamAuth(String),
    /// Any other non-200 from the provider; carries the provider's own
    /// message, trimmed and capped.
    #[error("{0}")]
    Upstream(String),
    #[error("token refresh failed: {0}")]
    Refresh(String),
    /// Credential import from the CLI auth file failed; user-actionable.
    #[error("{0}")]
    AuthImport(String),
    #[error("AI request failed: {0}")]
    Http(String),
    #[error("settings store error: {0}")]
    Storage(#[from] StorageError),
    #[error("AI returned no response")]
    EmptyResponse,
}

const MAX_SURFACED_BODY_BYTES: usize = 2048;

const AUTH_FAILED_MESSAGE: &str =
    "AI authentication failed. Reconnect AI in Settings or update your API key.";
const MISSING_SCOPE_MESSAGE: &str = "Your OpenAI API key lacks the 'model.request' scope. \
     Create a new key at https://platform.openai.com/api-keys, or Reconnect AI with \
     'Sign in with ChatGPT' instead.";
const NO_API_ACCESS_MESSAGE: &str = "Your ChatGPT sign-in doesn't have API access. \
     Please use an API key instead: Settings > Enter API Key, with a key from \
     https://platform.openai.com/api-keys.";

/// Map a non-200 upstream response to the error surfaced to the editor.
///
/// The provider's `error.message` is preferred over the raw body; 401s and
/// known permission-scope rejections become fixed remediation messages.
pub fn map_upstream_error(status: u16, body: &[u8]) -> AssistantError {
    let message = extract_error_message(body);

    if status == 401 {
        return AssistantError::UpstreamAuth(AUTH_FAILED_MESSAGE.to_string());
    }
    if message.contains("model.request") {
        return AssistantError::UpstreamAuth(MISSING_SCOPE_MESSAGE.to_string());
    }
    if message.contains("insufficient permissions") || message.contains("api.responses.write") {
        return AssistantError::UpstreamAuth(NO_API_ACCESS_MESSAGE.to_string());
    }
    if message.is_empty() {
        return AssistantError::Upstream("AI service error".to_string());
    }
    AssistantError::Upstream(format!("AI service error: {}", cap(&message)))
}

fn extract_error_message(body: &[u8]) -> String {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body)
        && let Some(message) = value
            .get("error")
            .and_then(|error| error.get("message"))
            .and_then(|message| message.as_str())
    {
        return message.trim().to_string();
    }
    String::from_utf8_lossy(body).trim().to_string()
}

fn cap(message: &str) -> &str {
    let mut end = message.len().min(MAX_SURFACED_BODY_BYTES);
    while !message.is_char_boundary(end) {
        end -= 1;
    }
    &message[..end]
}
