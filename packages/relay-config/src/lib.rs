mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, EmbeddingProviderConfig, History, LlmProviderConfig, Postgres, Providers, Retrieval,
	Service, Session, Storage,
};

use std::{env, fs, path::Path};

/// Upper bound on knowledge entries passed to generation.
pub const MAX_RETRIEVAL_LIMIT: u32 = 5;
/// Upper bound on prior turns passed to generation.
pub const MAX_HISTORY_LIMIT: u32 = 3;

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg, |name| env::var(name).ok());

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.storage.vector_dim == 0 {
		return Err(Error::Validation {
			message: "storage.vector_dim must be greater than zero.".to_string(),
		});
	}
	if cfg.storage.call_timeout_ms == 0 {
		return Err(Error::Validation {
			message: "storage.call_timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions != cfg.storage.vector_dim {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must match storage.vector_dim.".to_string(),
		});
	}
	if !cfg.providers.llm.temperature.is_finite() {
		return Err(Error::Validation {
			message: "providers.llm.temperature must be a finite number.".to_string(),
		});
	}
	if !(0.0..=2.0).contains(&cfg.providers.llm.temperature) {
		return Err(Error::Validation {
			message: "providers.llm.temperature must be in the range 0.0-2.0.".to_string(),
		});
	}
	if cfg.providers.llm.max_tokens == 0 {
		return Err(Error::Validation {
			message: "providers.llm.max_tokens must be greater than zero.".to_string(),
		});
	}

	for (label, key) in
		[("embedding", &cfg.providers.embedding.api_key), ("llm", &cfg.providers.llm.api_key)]
	{
		if key.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("Provider {label} api_key must be non-empty."),
			});
		}
	}

	if cfg.retrieval.limit == 0 {
		return Err(Error::Validation {
			message: "retrieval.limit must be greater than zero.".to_string(),
		});
	}
	if cfg.retrieval.limit > MAX_RETRIEVAL_LIMIT {
		return Err(Error::Validation {
			message: format!("retrieval.limit must be at most {MAX_RETRIEVAL_LIMIT}."),
		});
	}
	if !cfg.retrieval.max_distance.is_finite() {
		return Err(Error::Validation {
			message: "retrieval.max_distance must be a finite number.".to_string(),
		});
	}
	if cfg.retrieval.max_distance <= 0.0 {
		return Err(Error::Validation {
			message: "retrieval.max_distance must be greater than zero.".to_string(),
		});
	}
	if cfg.history.limit == 0 {
		return Err(Error::Validation {
			message: "history.limit must be greater than zero.".to_string(),
		});
	}
	if cfg.history.limit > MAX_HISTORY_LIMIT {
		return Err(Error::Validation {
			message: format!("history.limit must be at most {MAX_HISTORY_LIMIT}."),
		});
	}
	if cfg.session.cookie_name.trim().is_empty() {
		return Err(Error::Validation {
			message: "session.cookie_name must be non-empty.".to_string(),
		});
	}
	if cfg.session.max_age_secs == 0 {
		return Err(Error::Validation {
			message: "session.max_age_secs must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize<F>(cfg: &mut Config, lookup_env: F)
where
	F: Fn(&str) -> Option<String>,
{
	let embedding = &mut cfg.providers.embedding;

	if embedding.api_key.trim().is_empty()
		&& let Some(value) = embedding.api_key_env.as_deref().and_then(&lookup_env)
	{
		embedding.api_key = value;
	}

	let llm = &mut cfg.providers.llm;

	if llm.api_key.trim().is_empty()
		&& let Some(value) = llm.api_key_env.as_deref().and_then(&lookup_env)
	{
		llm.api_key = value;
	}

	if cfg
		.service
		.index_html
		.as_deref()
		.map(|path| path.as_os_str().to_string_lossy().trim().is_empty())
		.unwrap_or(false)
	{
		cfg.service.index_html = None;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const MINIMAL: &str = r#"
[service]
http_bind = "127.0.0.1:8080"
log_level = "info"
index_html = ""

[storage]
vector_dim = 4

[storage.postgres]
dsn = "postgres://localhost/relay"
pool_max_conns = 4

[providers.embedding]
provider_id = "openai"
api_base = "https://api.openai.com"
api_key_env = "RELAY_TEST_EMBEDDING_KEY"
path = "/v1/embeddings"
model = "text-embedding-3-small"
dimensions = 4
timeout_ms = 1000

[providers.llm]
provider_id = "openai"
api_base = "https://api.openai.com"
api_key = "llm-key"
api_key_env = "RELAY_TEST_LLM_KEY"
path = "/v1/chat/completions"
model = "gpt-4o-mini"
timeout_ms = 1000
"#;

	#[test]
	fn fills_missing_api_key_from_named_env() {
		let mut cfg: Config = toml::from_str(MINIMAL).expect("Failed to parse config.");

		normalize(&mut cfg, |name| match name {
			"RELAY_TEST_EMBEDDING_KEY" => Some("from-env".to_string()),
			"RELAY_TEST_LLM_KEY" => Some("ignored".to_string()),
			_ => None,
		});

		assert_eq!(cfg.providers.embedding.api_key, "from-env");
		assert_eq!(cfg.providers.llm.api_key, "llm-key");
		assert!(cfg.service.index_html.is_none());
		assert!(validate(&cfg).is_ok());
	}

	#[test]
	fn defaults_match_relay_behavior() {
		let cfg: Config = toml::from_str(MINIMAL).expect("Failed to parse config.");

		assert_eq!(cfg.retrieval.limit, 5);
		assert_eq!(cfg.retrieval.max_distance, 1.0);
		assert_eq!(cfg.history.limit, 3);
		assert_eq!(cfg.session.cookie_name, "session_id");
		assert_eq!(cfg.session.max_age_secs, 3_600);
		assert!(cfg.session.secure);
		assert!(!cfg.session.serialize_requests);
		assert_eq!(cfg.providers.llm.max_tokens, 2_000);
		assert_eq!(cfg.providers.llm.temperature, 0.7);
	}
}
