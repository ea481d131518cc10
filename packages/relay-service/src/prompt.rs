//! Prompt composition for the FAQ persona.

use serde::Serialize;

use relay_providers::completion::ChatMessage;

use crate::{Error, HistoryWindow, Result, RetrievalResult};

/// The reply shape every completion must follow.
pub const REPLY_FORMAT: &str = r#"Respond only with a JSON object of the form {"answer": "<answer to the question, in Korean>", "recommend1": "<first follow-up question>", "recommend2": "<second follow-up question>"}."#;

pub const SYSTEM_INSTRUCTION: &str = "\
You are an FAQ chatbot that answers questions about Naver Smart Store.

Your job:
1. Understand the user's question (`user_query`).
2. Answer it accurately using the supplied `relevant_information` and `user_context`.

Rules:
1. If the question relates to `relevant_information`, base the answer on that data.
2. If the data does not contain the answer, analyse it as a whole and use similar entries to give the best possible answer.
3. If the question is clearly unrelated to Naver Smart Store, answer exactly: '저는 네이버 스마트스토어 FAQ를 위한 챗봇입니다. 관련된 질문을 부탁드립니다.'
4. Prefer entries in `relevant_information` or `user_context` whose wording or meaning clearly matches the question.
5. `recommend1` and `recommend2` must be short questions the user is likely to ask next.
6. Write every field in Korean.
";

/// The structured payload handed to the generation client.
///
/// `relevant_information` and `user_context` hold JSON arrays of `{question, answer}` objects,
/// in retrieval and chronological order respectively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationRequest {
	pub query: String,
	pub relevant_information: String,
	pub user_context: String,
}
impl GenerationRequest {
	pub fn messages(&self) -> Vec<ChatMessage> {
		// Both context fields are already JSON arrays, so the user content stays valid JSON.
		let user = format!(
			"{{\"user_query\": {},\n\"relevant_information\": {},\n\"user_context\": {},\n\"reply_format\": {}}}",
			json_string(&self.query),
			self.relevant_information,
			self.user_context,
			json_string(REPLY_FORMAT),
		);

		vec![
			ChatMessage::system(format!("{SYSTEM_INSTRUCTION}\n{REPLY_FORMAT}")),
			ChatMessage::user(user),
		]
	}
}

pub fn compose(
	query: &str,
	retrieval: &RetrievalResult,
	history: &HistoryWindow,
) -> Result<GenerationRequest> {
	let relevant_information = serde_json::to_string(retrieval).map_err(|err| {
		Error::MalformedInput { message: format!("Retrieval result is not serializable: {err}") }
	})?;
	let user_context = serde_json::to_string(history).map_err(|err| Error::MalformedInput {
		message: format!("History window is not serializable: {err}"),
	})?;

	Ok(GenerationRequest { query: query.to_string(), relevant_information, user_context })
}

fn json_string(raw: &str) -> String {
	serde_json::Value::String(raw.to_string()).to_string()
}
