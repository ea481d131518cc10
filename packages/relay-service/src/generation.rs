use serde::{Deserialize, Serialize};

use relay_config::LlmProviderConfig;

use crate::{CompletionProvider, Error, GenerationRequest, Result};

/// The three-field answer returned to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReply {
	pub answer: String,
	pub recommend1: String,
	pub recommend2: String,
}

pub async fn generate(
	provider: &dyn CompletionProvider,
	cfg: &LlmProviderConfig,
	request: &GenerationRequest,
) -> Result<GenerationReply> {
	let messages = request.messages();
	let raw = provider.complete(cfg, &messages).await?;

	parse_reply(&raw)
}

/// Parses provider text into a reply. A surrounding markdown code fence is tolerated.
pub fn parse_reply(raw: &str) -> Result<GenerationReply> {
	let body = strip_code_fence(raw.trim());

	serde_json::from_str(body).map_err(|err| Error::GenerationParse {
		message: format!("Completion content is not a reply object: {err}"),
	})
}

fn strip_code_fence(text: &str) -> &str {
	let Some(rest) = text.strip_prefix("```") else {
		return text;
	};
	let Some(rest) = rest.strip_suffix("```") else {
		return text;
	};
	// Drop the info string (for example `json`), whether or not the body starts a new line.
	let body = match rest.find('\n') {
		Some(newline) => &rest[newline + 1..],
		None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
	};

	body.trim()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_plain_reply() {
		let reply = parse_reply(
			r#"{"answer": "7일 이내 가능합니다.", "recommend1": "반품 비용은?", "recommend2": "교환은?"}"#,
		)
		.expect("parse failed");

		assert_eq!(reply.answer, "7일 이내 가능합니다.");
		assert_eq!(reply.recommend2, "교환은?");
	}

	#[test]
	fn parses_fenced_reply() {
		let raw = "```json\n{\"answer\": \"a\", \"recommend1\": \"b\", \"recommend2\": \"c\"}\n```";
		let reply = parse_reply(raw).expect("parse failed");

		assert_eq!(reply, GenerationReply {
			answer: "a".to_string(),
			recommend1: "b".to_string(),
			recommend2: "c".to_string(),
		});
	}

	#[test]
	fn parses_single_line_fenced_reply() {
		let expected = GenerationReply {
			answer: "a".to_string(),
			recommend1: "b".to_string(),
			recommend2: "c".to_string(),
		};

		for raw in [
			"```json {\"answer\": \"a\", \"recommend1\": \"b\", \"recommend2\": \"c\"}```",
			"```{\"answer\": \"a\", \"recommend1\": \"b\", \"recommend2\": \"c\"}```",
		] {
			assert_eq!(parse_reply(raw).expect("parse failed"), expected, "raw: {raw}");
		}
	}

	#[test]
	fn rejects_non_json_and_wrong_shape() {
		assert!(matches!(parse_reply("반품은 7일 이내입니다."), Err(Error::GenerationParse { .. })));
		assert!(matches!(
			parse_reply(r#"{"answer": "a", "recommend1": "b"}"#),
			Err(Error::GenerationParse { .. })
		));
		assert!(matches!(
			parse_reply(r#"{"answer": 1, "recommend1": "b", "recommend2": "c"}"#),
			Err(Error::GenerationParse { .. })
		));
	}
}
