use std::fmt;

use relay_domain::query::QueryError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Provider unavailable: {message}")]
	ProviderUnavailable { message: String },
	#[error("Provider authentication failed: {message}")]
	ProviderAuth { message: String },
	#[error("Provider response invalid: {message}")]
	ProviderResponseInvalid { message: String },
	#[error("Generation reply could not be parsed: {message}")]
	GenerationParse { message: String },
	#[error("Generation returned no completions.")]
	EmptyGenerationResult,
	#[error("Store unavailable: {message}")]
	StoreUnavailable { message: String },
	#[error("Retrieval failed: {message}")]
	RetrievalFailed { message: String },
	#[error("Persisting the turn failed: {message}")]
	PersistenceFailed { message: String },
	#[error("Malformed input: {message}")]
	MalformedInput { message: String },
}
impl Error {
	pub fn code(&self) -> &'static str {
		match self {
			Self::ProviderUnavailable { .. } => "provider_unavailable",
			Self::ProviderAuth { .. } => "provider_auth_error",
			Self::ProviderResponseInvalid { .. } => "provider_response_invalid",
			Self::GenerationParse { .. } => "generation_parse_error",
			Self::EmptyGenerationResult => "empty_generation_result",
			Self::StoreUnavailable { .. } => "store_unavailable",
			Self::RetrievalFailed { .. } => "retrieval_failed",
			Self::PersistenceFailed { .. } => "persistence_failed",
			Self::MalformedInput { .. } => "malformed_input",
		}
	}

	/// Client-safe text. Never includes provider bodies, credentials or store details.
	pub fn user_message(&self) -> &'static str {
		match self {
			Self::MalformedInput { .. } =>
				"The message must be a JSON object with a non-empty \"query\" string.",
			Self::ProviderUnavailable { .. }
			| Self::ProviderAuth { .. }
			| Self::ProviderResponseInvalid { .. } =>
				"The answer service is temporarily unavailable. Please try again later.",
			Self::GenerationParse { .. } | Self::EmptyGenerationResult =>
				"The answer could not be generated. Please rephrase your question.",
			Self::StoreUnavailable { .. }
			| Self::RetrievalFailed { .. }
			| Self::PersistenceFailed { .. } =>
				"Error processing your query. Please try again later.",
		}
	}
}
impl From<relay_providers::Error> for Error {
	fn from(err: relay_providers::Error) -> Self {
		use relay_providers::Error as ProviderError;

		match err {
			ProviderError::Unavailable { message } => Self::ProviderUnavailable { message },
			ProviderError::Auth { message } => Self::ProviderAuth { message },
			ProviderError::InvalidResponse { message } => Self::ProviderResponseInvalid { message },
			ProviderError::EmptyCompletion => Self::EmptyGenerationResult,
			ProviderError::InvalidHeaderValue(inner) =>
				Self::ProviderAuth { message: inner.to_string() },
			ProviderError::InvalidConfig { message } => Self::ProviderUnavailable { message },
			ProviderError::InvalidHeaderName(inner) =>
				Self::ProviderUnavailable { message: inner.to_string() },
		}
	}
}
impl From<QueryError> for Error {
	fn from(err: QueryError) -> Self {
		Self::MalformedInput { message: err.to_string() }
	}
}

/// Failure surfaced by a store seam.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
	#[error("Store call timed out after {timeout_ms} ms.")]
	Timeout { timeout_ms: u64 },
	#[error(transparent)]
	Storage(#[from] relay_storage::Error),
	#[error("{message}")]
	Unavailable { message: String },
}

/// Position of a chat request in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
	Received,
	Embedding,
	Retrieving,
	AssemblingHistory,
	Composing,
	Generating,
	Persisting,
	Completed,
}
impl Stage {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Received => "received",
			Self::Embedding => "embedding",
			Self::Retrieving => "retrieving",
			Self::AssemblingHistory => "assembling_history",
			Self::Composing => "composing",
			Self::Generating => "generating",
			Self::Persisting => "persisting",
			Self::Completed => "completed",
		}
	}
}
impl fmt::Display for Stage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A stage-local error tagged with the stage it came from.
#[derive(Debug, thiserror::Error)]
#[error("Chat pipeline failed at {stage}: {error}")]
pub struct PipelineError {
	pub stage: Stage,
	#[source]
	pub error: Error,
}
impl PipelineError {
	pub fn new(stage: Stage, error: Error) -> Self {
		Self { stage, error }
	}

	pub fn code(&self) -> &'static str {
		self.error.code()
	}

	pub fn user_message(&self) -> &'static str {
		self.error.user_message()
	}
}
