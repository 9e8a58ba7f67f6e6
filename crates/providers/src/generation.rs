use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::GenerationError;

/// Chat-completions client for the generation provider. Best-effort by
/// contract: callers treat every error as "use the rule text instead".
#[derive(Debug, Clone)]
pub struct GenerationClient {
    http: Client,
    endpoint: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: String,
}

impl GenerationClient {
    pub fn new(http: Client, endpoint: String, api_key: String, model: String) -> Self {
        Self {
            http,
            endpoint,
            api_key,
            model,
        }
    }

    /// Sends a system instruction plus a user prompt, returning the trimmed
    /// content of the first choice.
    #[instrument(skip_all, fields(model = %self.model))]
    pub async fn complete(&self, system: &str, user: &str) -> Result<String, GenerationError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GenerationError::BadStatus(response.status().as_u16()));
        }

        let payload: ChatCompletionResponse = response
            .json()
            .await
            .map_err(GenerationError::Transport)?;

        let content = payload
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(GenerationError::EmptyContent)?;

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn first_choice_content_wins() {
        let payload: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [
                {"message": {"role": "assistant", "content": "  走几步就到，值得一试  "}},
                {"message": {"role": "assistant", "content": "second"}}
            ]
        }))
        .unwrap();

        let content = payload
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .unwrap();
        assert_eq!(content, "走几步就到，值得一试");
    }

    #[test]
    fn empty_choice_list_decodes() {
        let payload: ChatCompletionResponse = serde_json::from_value(json!({})).unwrap();
        assert!(payload.choices.is_empty());
    }

    #[test]
    fn request_serializes_two_messages() {
        let request = ChatCompletionRequest {
            model: "hunyuan-lite",
            messages: [
                ChatMessage {
                    role: "system",
                    content: "guide",
                },
                ChatMessage {
                    role: "user",
                    content: "prompt",
                },
            ],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "hunyuan-lite");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "prompt");
    }
}
