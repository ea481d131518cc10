//! Chat request orchestration.
//!
//! A request moves through `Received -> Embedding -> Retrieving -> AssemblingHistory ->
//! Composing -> Generating -> Persisting -> Completed`. The first failing stage ends the run
//! and is reported in the returned [`PipelineError`]. Nothing is retried.
//!
//! A failed write in `Persisting` does not discard the reply: the caller receives it together
//! with the persistence error, so answers are never blocked on storage.
//!
//! Unless `session.serialize_requests` is set, two requests for the same session may interleave
//! their history reads and turn writes, and a turn may be composed without seeing one that is
//! still in flight.

use time::OffsetDateTime;

use relay_domain::{query::ChatQuery, records::Turn};

use crate::{
	Error, GenerationReply, HistoryWindow, PipelineError, RelayService, RequestContext, Stage,
	generation, history, prompt, retrieval,
};

#[derive(Debug)]
pub struct ChatOutcome {
	pub reply: GenerationReply,
	/// Set when the reply was produced but the turn could not be stored.
	pub persistence_error: Option<PipelineError>,
}

struct PipelineRun<'a> {
	ctx: &'a RequestContext,
	stage: Stage,
}
impl<'a> PipelineRun<'a> {
	fn new(ctx: &'a RequestContext) -> Self {
		tracing::debug!(
			request_id = %ctx.request_id,
			session_id = %ctx.session_id,
			stage = %Stage::Received,
			"Chat request received."
		);

		Self { ctx, stage: Stage::Received }
	}

	fn enter(&mut self, stage: Stage) {
		self.stage = stage;

		tracing::debug!(
			request_id = %self.ctx.request_id,
			session_id = %self.ctx.session_id,
			stage = %stage,
			"Chat pipeline stage entered."
		);
	}

	fn fail(&self, error: Error) -> PipelineError {
		tracing::warn!(
			request_id = %self.ctx.request_id,
			session_id = %self.ctx.session_id,
			stage = %self.stage,
			code = error.code(),
			error = %error,
			"Chat pipeline failed."
		);

		PipelineError::new(self.stage, error)
	}
}

impl RelayService {
	/// Runs one chat request end to end. `payload` is the raw transport message.
	pub async fn chat(
		&self,
		ctx: &RequestContext,
		payload: &str,
	) -> Result<ChatOutcome, PipelineError> {
		let mut run = PipelineRun::new(ctx);
		let query = ChatQuery::parse(payload).map_err(|err| run.fail(err.into()))?;
		let _session_guard = if self.cfg.session.serialize_requests {
			Some(self.session_locks.acquire(ctx.session_id.as_str()).await)
		} else {
			None
		};

		run.enter(Stage::Embedding);

		let vec = self
			.providers
			.embedding
			.embed(&self.cfg.providers.embedding, &query.text)
			.await
			.map_err(|err| run.fail(err.into()))?;

		if vec.is_empty() || vec.len() != self.cfg.storage.vector_dim as usize {
			return Err(run.fail(Error::ProviderResponseInvalid {
				message: format!(
					"Embedding has {} dimensions; expected {}.",
					vec.len(),
					self.cfg.storage.vector_dim
				),
			}));
		}

		run.enter(Stage::Retrieving);

		let retrieved = retrieval::retrieve(
			self.stores.knowledge.as_ref(),
			&self.cfg.retrieval,
			&vec,
			&query.text,
		)
		.await
		.map_err(|err| run.fail(err))?;

		run.enter(Stage::AssemblingHistory);

		let window = history::fetch_history(
			self.stores.conversations.as_ref(),
			ctx.session_id.as_str(),
			self.cfg.history.limit,
		)
		.await
		.map_err(|err| run.fail(err))?;

		run.enter(Stage::Composing);

		let request =
			prompt::compose(&query.text, &retrieved, &window).map_err(|err| run.fail(err))?;

		run.enter(Stage::Generating);

		let reply = generation::generate(
			self.providers.completion.as_ref(),
			&self.cfg.providers.llm,
			&request,
		)
		.await
		.map_err(|err| run.fail(err))?;

		run.enter(Stage::Persisting);

		let turn = Turn {
			session_id: ctx.session_id.as_str().to_string(),
			question: query.text,
			answer: reply.answer.clone(),
			created_at: OffsetDateTime::now_utc(),
		};
		let persistence_error = match self.stores.conversations.append_turn(&turn).await {
			Ok(()) => None,
			Err(err) => Some(run.fail(Error::PersistenceFailed { message: err.to_string() })),
		};

		run.enter(Stage::Completed);

		Ok(ChatOutcome { reply, persistence_error })
	}

	/// The session's recent turns, oldest first, as used for generation context.
	pub async fn history(&self, ctx: &RequestContext) -> Result<HistoryWindow, PipelineError> {
		history::fetch_history(
			self.stores.conversations.as_ref(),
			ctx.session_id.as_str(),
			self.cfg.history.limit,
		)
		.await
		.map_err(|error| PipelineError::new(Stage::AssemblingHistory, error))
	}
}
