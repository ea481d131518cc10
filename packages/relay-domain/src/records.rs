use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// One question/answer pair, as used in retrieval results, history and prompts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaPair {
	pub question: String,
	pub answer: String,
}
impl QaPair {
	pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
		Self { question: question.into(), answer: answer.into() }
	}
}

/// A persisted exchange for one session. Append-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
	pub session_id: String,
	pub question: String,
	pub answer: String,
	pub created_at: OffsetDateTime,
}
impl Turn {
	pub fn to_pair(&self) -> QaPair {
		QaPair::new(self.question.clone(), self.answer.clone())
	}
}
