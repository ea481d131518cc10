pub mod completion;
pub mod embedding;

mod error;

pub use error::{Error, Result};

use reqwest::{
	Response,
	header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue},
};
use serde_json::{Map, Value};

pub fn auth_headers(api_key: &str, default_headers: &Map<String, Value>) -> Result<HeaderMap> {
	if api_key.trim().is_empty() {
		return Err(Error::Auth { message: "Provider api_key is not configured.".to_string() });
	}

	let mut headers = HeaderMap::new();

	headers.insert(AUTHORIZATION, format!("Bearer {api_key}").parse()?);
	headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

	for (key, value) in default_headers {
		let Some(raw) = value.as_str() else {
			return Err(Error::InvalidConfig {
				message: "Default header values must be strings.".to_string(),
			});
		};

		headers.insert(HeaderName::from_bytes(key.as_bytes())?, raw.parse()?);
	}

	Ok(headers)
}

/// Turns a non-success response into a typed error. The body is logged, never returned.
pub(crate) async fn check_status(res: Response) -> Result<Response> {
	let status = res.status();

	if status.is_success() {
		return Ok(res);
	}

	let body = res.text().await.unwrap_or_default();

	tracing::warn!(%status, body = %body, "Provider request failed.");

	Err(Error::from_status(status))
}
