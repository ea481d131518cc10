use std::{future::Future, time::Duration};

use relay_domain::records::{QaPair, Turn};
use relay_storage::{db::Db, queries};

use crate::{BoxFuture, ConversationStore, KnowledgeStore, StoreError, StoreResult};

/// Runs one store call, failing with [`StoreError::Timeout`] once `timeout` elapses.
pub async fn with_deadline<T, F>(timeout: Duration, fut: F) -> StoreResult<T>
where
	F: Future<Output = relay_storage::Result<T>>,
{
	match tokio::time::timeout(timeout, fut).await {
		Ok(result) => result.map_err(StoreError::from),
		Err(_) => Err(StoreError::Timeout { timeout_ms: timeout.as_millis() as u64 }),
	}
}

/// Postgres-backed knowledge and conversation stores sharing one pool.
pub struct PgStores {
	db: Db,
	timeout: Duration,
}
impl PgStores {
	pub fn new(db: Db, call_timeout_ms: u64) -> Self {
		Self { db, timeout: Duration::from_millis(call_timeout_ms) }
	}

	async fn bounded<T, F>(&self, fut: F) -> StoreResult<T>
	where
		F: Future<Output = relay_storage::Result<T>>,
	{
		with_deadline(self.timeout, fut).await
	}
}
impl KnowledgeStore for PgStores {
	fn vector_search<'a>(
		&'a self,
		vec: &'a [f32],
		max_distance: f32,
		limit: u32,
	) -> BoxFuture<'a, StoreResult<Vec<QaPair>>> {
		Box::pin(async move {
			let hits = self.bounded(queries::vector_search(&self.db, vec, max_distance, limit)).await?;

			Ok(hits.into_iter().map(|hit| QaPair::new(hit.question, hit.answer)).collect())
		})
	}

	fn lexical_search<'a>(
		&'a self,
		pattern: &'a str,
		limit: u32,
	) -> BoxFuture<'a, StoreResult<Vec<QaPair>>> {
		Box::pin(async move {
			let rows = self.bounded(queries::lexical_search(&self.db, pattern, limit)).await?;

			Ok(rows.into_iter().map(|row| QaPair::new(row.question, row.answer)).collect())
		})
	}
}
impl ConversationStore for PgStores {
	fn recent_turns<'a>(
		&'a self,
		session_id: &'a str,
		limit: u32,
	) -> BoxFuture<'a, StoreResult<Vec<Turn>>> {
		Box::pin(async move {
			let rows = self.bounded(queries::recent_turns(&self.db, session_id, limit)).await?;

			Ok(rows
				.into_iter()
				.map(|row| Turn {
					session_id: row.session_id,
					question: row.question,
					answer: row.answer,
					created_at: row.created_at,
				})
				.collect())
		})
	}

	fn append_turn<'a>(&'a self, turn: &'a Turn) -> BoxFuture<'a, StoreResult<()>> {
		Box::pin(async move {
			self.bounded(queries::append_turn(
				&self.db,
				&turn.session_id,
				&turn.question,
				&turn.answer,
				turn.created_at,
			))
			.await?;

			Ok(())
		})
	}
}
