use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
	pub role: String,
	pub content: String,
}
impl ChatMessage {
	pub fn system(content: impl Into<String>) -> Self {
		Self { role: "system".to_string(), content: content.into() }
	}

	pub fn user(content: impl Into<String>) -> Self {
		Self { role: "user".to_string(), content: content.into() }
	}
}

/// Sends a chat completion and returns the first choice's message content, unparsed.
pub async fn complete(cfg: &relay_config::LlmProviderConfig, messages: &[ChatMessage]) -> Result<String> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"messages": messages,
		"max_tokens": cfg.max_tokens,
		"temperature": cfg.temperature,
	});
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = crate::check_status(res).await?.json().await?;

	parse_completion_content(json)
}

fn parse_completion_content(json: Value) -> Result<String> {
	let choices = json.get("choices").and_then(|v| v.as_array()).ok_or_else(|| {
		Error::InvalidResponse { message: "Completion response is missing choices array.".to_string() }
	})?;
	let Some(choice) = choices.first() else {
		return Err(Error::EmptyCompletion);
	};

	choice
		.get("message")
		.and_then(|msg| msg.get("content"))
		.and_then(|c| c.as_str())
		.map(str::to_string)
		.ok_or_else(|| Error::InvalidResponse {
			message: "Completion choice is missing message content.".to_string(),
		})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn returns_first_choice_content() {
		let json = serde_json::json!({
			"choices": [
				{ "message": { "role": "assistant", "content": "{\"answer\": \"네\"}" } },
				{ "message": { "role": "assistant", "content": "ignored" } }
			]
		});

		assert_eq!(parse_completion_content(json).expect("parse failed"), "{\"answer\": \"네\"}");
	}

	#[test]
	fn zero_choices_is_empty_completion() {
		let err = parse_completion_content(serde_json::json!({ "choices": [] }))
			.expect_err("expected empty completion");

		assert!(matches!(err, Error::EmptyCompletion));
	}

	#[test]
	fn missing_content_is_invalid() {
		let json = serde_json::json!({ "choices": [{ "message": { "role": "assistant" } }] });
		let err = parse_completion_content(json).expect_err("expected invalid response");

		assert!(matches!(err, Error::InvalidResponse { .. }));
	}

	#[test]
	fn serializes_chat_roles() {
		let value = serde_json::to_value([ChatMessage::system("s"), ChatMessage::user("u")])
			.expect("serialize failed");

		assert_eq!(
			value,
			serde_json::json!([
				{ "role": "system", "content": "s" },
				{ "role": "user", "content": "u" }
			])
		);
	}
}
