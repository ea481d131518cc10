use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::{Error, Result};

/// Embeds one text, rejecting vectors whose length differs from `cfg.dimensions`.
pub async fn embed(cfg: &relay_config::EmbeddingProviderConfig, text: &str) -> Result<Vec<f32>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"input": text,
		"dimensions": cfg.dimensions,
	});
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = crate::check_status(res).await?.json().await?;
	let vec = parse_embedding_response(json)?;

	if vec.len() != cfg.dimensions as usize {
		return Err(Error::InvalidResponse {
			message: format!(
				"Embedding dimension mismatch: expected {}, got {}.",
				cfg.dimensions,
				vec.len()
			),
		});
	}

	Ok(vec)
}

fn parse_embedding_response(json: Value) -> Result<Vec<f32>> {
	let data = json.get("data").and_then(|v| v.as_array()).ok_or_else(|| {
		Error::InvalidResponse { message: "Embedding response is missing data array.".to_string() }
	})?;
	let item = data
		.iter()
		.min_by_key(|item| item.get("index").and_then(|v| v.as_u64()).unwrap_or(0))
		.ok_or_else(|| Error::InvalidResponse {
			message: "Embedding response data is empty.".to_string(),
		})?;
	let embedding = item.get("embedding").and_then(|v| v.as_array()).ok_or_else(|| {
		Error::InvalidResponse { message: "Embedding item missing embedding array.".to_string() }
	})?;

	if embedding.is_empty() {
		return Err(Error::InvalidResponse { message: "Embedding vector is empty.".to_string() });
	}

	let mut vec = Vec::with_capacity(embedding.len());

	for value in embedding {
		let number = value.as_f64().ok_or_else(|| Error::InvalidResponse {
			message: "Embedding value must be numeric.".to_string(),
		})?;

		vec.push(number as f32);
	}

	Ok(vec)
}
