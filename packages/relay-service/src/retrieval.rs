//! Hybrid retrieval: vector search first, then a lexical pass when vector search under-fills.

use serde::Serialize;

use relay_domain::{fallback, records::QaPair};

use crate::{Error, KnowledgeStore, Result};

/// Ordered knowledge pairs: vector hits first, then lexical fallback hits. Not deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RetrievalResult {
	pub items: Vec<QaPair>,
}
impl RetrievalResult {
	pub fn len(&self) -> usize {
		self.items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}
}

pub async fn retrieve(
	store: &dyn KnowledgeStore,
	cfg: &relay_config::Retrieval,
	vec: &[f32],
	query_text: &str,
) -> Result<RetrievalResult> {
	let limit = cfg.limit as usize;
	let mut items = store
		.vector_search(vec, cfg.max_distance, cfg.limit)
		.await
		.map_err(|err| Error::RetrievalFailed { message: format!("Vector search failed: {err}") })?;

	items.truncate(limit);

	let vector_hits = items.len();

	if vector_hits < limit
		&& let Some(phrase) = fallback::reduced_phrase(query_text)
	{
		let remaining = (limit - vector_hits) as u32;
		let pattern = fallback::lexical_pattern(&phrase);
		let mut extra = store.lexical_search(&pattern, remaining).await.map_err(|err| {
			Error::RetrievalFailed { message: format!("Lexical fallback failed: {err}") }
		})?;

		extra.truncate(remaining as usize);

		tracing::debug!(vector_hits, fallback_hits = extra.len(), phrase = %phrase, "Lexical fallback ran.");

		items.extend(extra);
	}

	Ok(RetrievalResult { items })
}
