use serde::Serialize;

use relay_domain::records::{QaPair, Turn};

use crate::{ConversationStore, Error, Result};

/// Recent turns of one session, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryWindow {
	pub turns: Vec<Turn>,
}
impl HistoryWindow {
	/// Keeps the newest `limit` turns and orders them chronologically, whatever the input order.
	pub fn from_turns(mut turns: Vec<Turn>, limit: usize) -> Self {
		turns.sort_by(|a, b| b.created_at.cmp(&a.created_at));
		turns.truncate(limit);
		turns.reverse();

		Self { turns }
	}

	pub fn pairs(&self) -> Vec<QaPair> {
		self.turns.iter().map(Turn::to_pair).collect()
	}

	pub fn len(&self) -> usize {
		self.turns.len()
	}

	pub fn is_empty(&self) -> bool {
		self.turns.is_empty()
	}
}
impl Serialize for HistoryWindow {
	fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		self.pairs().serialize(serializer)
	}
}

pub async fn fetch_history(
	store: &dyn ConversationStore,
	session_id: &str,
	limit: u32,
) -> Result<HistoryWindow> {
	let turns = store
		.recent_turns(session_id, limit)
		.await
		.map_err(|err| Error::StoreUnavailable { message: format!("Loading history failed: {err}") })?;

	Ok(HistoryWindow::from_turns(turns, limit as usize))
}
