use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
	#[error("Chat payload is not valid JSON.")]
	NotJson,
	#[error("Chat payload must be a JSON object.")]
	NotObject,
	#[error("Chat payload is missing the query field.")]
	MissingQuery,
	#[error("Chat payload query must be a string.")]
	QueryNotString,
	#[error("Chat payload query must be non-empty.")]
	EmptyQuery,
}

/// A validated inbound chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatQuery {
	pub text: String,
}
impl ChatQuery {
	/// Parses a raw transport payload such as `{"query": "..."}`. Extra fields are ignored.
	pub fn parse(raw: &str) -> Result<Self, QueryError> {
		let value: Value = serde_json::from_str(raw).map_err(|_| QueryError::NotJson)?;
		let object = value.as_object().ok_or(QueryError::NotObject)?;
		let query = object.get("query").ok_or(QueryError::MissingQuery)?;
		let text = query.as_str().ok_or(QueryError::QueryNotString)?.trim();

		if text.is_empty() {
			return Err(QueryError::EmptyQuery);
		}

		Ok(Self { text: text.to_string() })
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn extracts_trimmed_query() {
		let query = ChatQuery::parse(r#"{"query": "  반품은 어떻게 하나요 ", "lang": "ko"}"#)
			.expect("parse failed");

		assert_eq!(query.text, "반품은 어떻게 하나요");
	}

	#[test]
	fn rejects_payloads_without_query_text() {
		assert_eq!(ChatQuery::parse("반품"), Err(QueryError::NotJson));
		assert_eq!(ChatQuery::parse(r#"["query"]"#), Err(QueryError::NotObject));
		assert_eq!(ChatQuery::parse(r#"{"question": "x"}"#), Err(QueryError::MissingQuery));
		assert_eq!(ChatQuery::parse(r#"{"query": 3}"#), Err(QueryError::QueryNotString));
		assert_eq!(ChatQuery::parse(r#"{"query": "   "}"#), Err(QueryError::EmptyQuery));
	}
}
