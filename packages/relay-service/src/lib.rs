pub mod error;
pub mod generation;
pub mod history;
pub mod pipeline;
pub mod prompt;
pub mod retrieval;
pub mod stores;

mod locks;

use std::{future::Future, pin::Pin, sync::Arc};

use uuid::Uuid;

pub use error::{Error, PipelineError, Result, Stage, StoreError};
pub use generation::GenerationReply;
pub use history::HistoryWindow;
pub use pipeline::ChatOutcome;
pub use prompt::GenerationRequest;
pub use retrieval::RetrievalResult;
pub use relay_providers::completion::ChatMessage;
pub use stores::{PgStores, with_deadline};

use relay_config::{Config, EmbeddingProviderConfig, LlmProviderConfig};
use relay_domain::{
	records::{QaPair, Turn},
	session::SessionId,
};
use relay_providers::{completion, embedding};
use relay_storage::db::Db;

use crate::locks::SessionLocks;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		text: &'a str,
	) -> BoxFuture<'a, relay_providers::Result<Vec<f32>>>;
}

pub trait CompletionProvider
where
	Self: Send + Sync,
{
	fn complete<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [ChatMessage],
	) -> BoxFuture<'a, relay_providers::Result<String>>;
}

pub trait KnowledgeStore
where
	Self: Send + Sync,
{
	/// Entries ordered by ascending distance, strictly below `max_distance`, at most `limit`.
	fn vector_search<'a>(
		&'a self,
		vec: &'a [f32],
		max_distance: f32,
		limit: u32,
	) -> BoxFuture<'a, StoreResult<Vec<QaPair>>>;

	/// Case-insensitive pattern match against stored questions.
	fn lexical_search<'a>(
		&'a self,
		pattern: &'a str,
		limit: u32,
	) -> BoxFuture<'a, StoreResult<Vec<QaPair>>>;
}

pub trait ConversationStore
where
	Self: Send + Sync,
{
	/// Most recent turns first.
	fn recent_turns<'a>(
		&'a self,
		session_id: &'a str,
		limit: u32,
	) -> BoxFuture<'a, StoreResult<Vec<Turn>>>;

	fn append_turn<'a>(&'a self, turn: &'a Turn) -> BoxFuture<'a, StoreResult<()>>;
}

/// Per-request context threaded through every pipeline stage.
#[derive(Debug, Clone)]
pub struct RequestContext {
	pub session_id: SessionId,
	pub request_id: Uuid,
}
impl RequestContext {
	pub fn new(session_id: SessionId) -> Self {
		Self { session_id, request_id: Uuid::new_v4() }
	}
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub completion: Arc<dyn CompletionProvider>,
}
impl Providers {
	pub fn new(
		embedding: Arc<dyn EmbeddingProvider>,
		completion: Arc<dyn CompletionProvider>,
	) -> Self {
		Self { embedding, completion }
	}
}
impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { embedding: provider.clone(), completion: provider }
	}
}

#[derive(Clone)]
pub struct Stores {
	pub knowledge: Arc<dyn KnowledgeStore>,
	pub conversations: Arc<dyn ConversationStore>,
}
impl Stores {
	pub fn new(
		knowledge: Arc<dyn KnowledgeStore>,
		conversations: Arc<dyn ConversationStore>,
	) -> Self {
		Self { knowledge, conversations }
	}
}

pub struct RelayService {
	pub cfg: Config,
	pub providers: Providers,
	pub stores: Stores,
	session_locks: SessionLocks,
}
impl RelayService {
	pub fn new(cfg: Config, db: Db) -> Self {
		let pg = Arc::new(PgStores::new(db, cfg.storage.call_timeout_ms));
		let stores = Stores::new(pg.clone(), pg);

		Self::with_parts(cfg, Providers::default(), stores)
	}

	pub fn with_parts(cfg: Config, providers: Providers, stores: Stores) -> Self {
		Self { cfg, providers, stores, session_locks: SessionLocks::default() }
	}
}

struct DefaultProviders;
impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		text: &'a str,
	) -> BoxFuture<'a, relay_providers::Result<Vec<f32>>> {
		Box::pin(embedding::embed(cfg, text))
	}
}
impl CompletionProvider for DefaultProviders {
	fn complete<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [ChatMessage],
	) -> BoxFuture<'a, relay_providers::Result<String>> {
		Box::pin(completion::complete(cfg, messages))
	}
}
