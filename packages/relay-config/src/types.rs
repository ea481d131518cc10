use std::path::PathBuf;

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	#[serde(default)]
	pub retrieval: Retrieval,
	#[serde(default)]
	pub history: History,
	#[serde(default)]
	pub session: Session,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
	/// Optional. Page served at `/` for browser clients.
	#[serde(default)]
	pub index_html: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
	/// Dimensionality of `qna.embedding`. Must match `providers.embedding.dimensions`.
	pub vector_dim: u32,
	/// Deadline for a single store round trip.
	#[serde(default = "default_call_timeout_ms")]
	pub call_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
	pub llm: LlmProviderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	#[serde(default)]
	pub api_key: String,
	/// Optional. Environment variable consulted when `api_key` is empty.
	#[serde(default)]
	pub api_key_env: Option<String>,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	#[serde(default)]
	pub api_key: String,
	/// Optional. Environment variable consulted when `api_key` is empty.
	#[serde(default)]
	pub api_key_env: Option<String>,
	pub path: String,
	pub model: String,
	#[serde(default = "default_temperature")]
	pub temperature: f32,
	#[serde(default = "default_max_tokens")]
	pub max_tokens: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Retrieval {
	#[serde(default = "default_retrieval_limit")]
	pub limit: u32,
	/// Exclusive upper bound on L2 distance for vector hits.
	#[serde(default = "default_max_distance")]
	pub max_distance: f32,
}
impl Default for Retrieval {
	fn default() -> Self {
		Self { limit: default_retrieval_limit(), max_distance: default_max_distance() }
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct History {
	#[serde(default = "default_history_limit")]
	pub limit: u32,
}
impl Default for History {
	fn default() -> Self {
		Self { limit: default_history_limit() }
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct Session {
	#[serde(default = "default_cookie_name")]
	pub cookie_name: String,
	#[serde(default = "default_max_age_secs")]
	pub max_age_secs: u64,
	#[serde(default = "default_true")]
	pub secure: bool,
	/// Run at most one chat pipeline per session at a time.
	#[serde(default)]
	pub serialize_requests: bool,
}
impl Default for Session {
	fn default() -> Self {
		Self {
			cookie_name: default_cookie_name(),
			max_age_secs: default_max_age_secs(),
			secure: true,
			serialize_requests: false,
		}
	}
}

fn default_call_timeout_ms() -> u64 {
	10_000
}

fn default_temperature() -> f32 {
	0.7
}

fn default_max_tokens() -> u32 {
	2_000
}

fn default_retrieval_limit() -> u32 {
	5
}

fn default_max_distance() -> f32 {
	1.0
}

fn default_history_limit() -> u32 {
	3
}

fn default_cookie_name() -> String {
	"session_id".to_string()
}

fn default_max_age_secs() -> u64 {
	3_600
}

fn default_true() -> bool {
	true
}
