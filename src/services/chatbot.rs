//! Proxy client for the external chat webhook behind the site's chat widget.
//!
//! The webhook takes `{ chatInput, sessionId, metadata }` and answers with a
//! JSON body whose reply lives in one of `output`, `text` or `message`.
//! Failures never reach the visitor as errors: the widget shows a canned
//! apology instead.

use serde_json::Value;
use thiserror::Error;

pub const FALLBACK_REPLY: &str =
    "Desculpe, ocorreu um erro ao processar sua mensagem. Tente novamente mais tarde.";

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("webhook request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("webhook returned status {0}")]
    Status(reqwest::StatusCode),
}

#[derive(Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    webhook_url: String,
}

impl ChatClient {
    pub fn new(webhook_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            webhook_url: webhook_url.to_string(),
        }
    }

    pub async fn send(
        &self,
        chat_input: &str,
        session_id: &str,
        metadata: Value,
    ) -> Result<String, ChatError> {
        let payload = serde_json::json!({
            "chatInput": chat_input,
            "sessionId": session_id,
            "metadata": metadata,
        });

        let response = self.http.post(&self.webhook_url).json(&payload).send().await?;
        if !response.status().is_success() {
            return Err(ChatError::Status(response.status()));
        }

        let body: Value = response.json().await?;
        Ok(extract_reply(&body))
    }
}

/// Pull the reply text out of the webhook response. Tries `output`, `text`
/// and `message` in order; an unrecognized shape is returned verbatim so the
/// widget still shows something.
pub fn extract_reply(body: &Value) -> String {
    for key in ["output", "text", "message"] {
        if let Some(reply) = body.get(key).and_then(|v| v.as_str()) {
            return reply.to_string();
        }
    }
    body.to_string()
}
