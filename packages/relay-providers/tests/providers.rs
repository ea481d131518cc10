use reqwest::{
	StatusCode,
	header::{AUTHORIZATION, CONTENT_TYPE},
};
use serde_json::{Map, Value};
use tokio::net::TcpListener;

use relay_config::{EmbeddingProviderConfig, LlmProviderConfig};
use relay_providers::{Error, completion::ChatMessage};

/// Accepts connections and never answers them.
async fn silent_upstream() -> String {
	let listener = TcpListener::bind("127.0.0.1:0").await.expect("Failed to bind listener.");
	let addr = listener.local_addr().expect("Listener must have an address.");

	tokio::spawn(async move {
		let mut held = Vec::new();

		while let Ok((socket, _)) = listener.accept().await {
			held.push(socket);
		}
	});

	format!("http://{addr}")
}

#[test]
fn builds_bearer_auth_header() {
	let headers =
		relay_providers::auth_headers("secret", &Map::new()).expect("Failed to build headers.");
	let value = headers.get(AUTHORIZATION).expect("Missing authorization header.");

	assert_eq!(value, "Bearer secret");
	assert_eq!(headers.get(CONTENT_TYPE).expect("Missing content type."), "application/json");
}

#[test]
fn missing_api_key_is_an_auth_error() {
	let err = relay_providers::auth_headers(" ", &Map::new()).expect_err("Expected auth error.");

	assert!(matches!(err, Error::Auth { .. }), "Unexpected error: {err:?}");
}

#[test]
fn default_headers_must_be_strings() {
	let mut headers = Map::new();

	headers.insert("x-org".to_string(), Value::from(7));

	let err =
		relay_providers::auth_headers("secret", &headers).expect_err("Expected config error.");

	assert!(matches!(err, Error::InvalidConfig { .. }), "Unexpected error: {err:?}");
}

#[test]
fn classifies_http_statuses() {
	assert!(matches!(Error::from_status(StatusCode::UNAUTHORIZED), Error::Auth { .. }));
	assert!(matches!(Error::from_status(StatusCode::FORBIDDEN), Error::Auth { .. }));
	assert!(matches!(Error::from_status(StatusCode::TOO_MANY_REQUESTS), Error::Unavailable { .. }));
	assert!(matches!(Error::from_status(StatusCode::BAD_GATEWAY), Error::Unavailable { .. }));
}

#[tokio::test]
async fn unresponsive_embedding_upstream_is_unavailable() {
	let cfg = EmbeddingProviderConfig {
		provider_id: "test".to_string(),
		api_base: silent_upstream().await,
		api_key: "secret".to_string(),
		api_key_env: None,
		path: "/embeddings".to_string(),
		model: "test".to_string(),
		dimensions: 3,
		timeout_ms: 50,
		default_headers: Map::new(),
	};
	let err = relay_providers::embedding::embed(&cfg, "반품").await.expect_err("Expected timeout.");

	assert!(matches!(err, Error::Unavailable { .. }), "Unexpected error: {err:?}");
}

#[tokio::test]
async fn unresponsive_completion_upstream_is_unavailable() {
	let cfg = LlmProviderConfig {
		provider_id: "test".to_string(),
		api_base: silent_upstream().await,
		api_key: "secret".to_string(),
		api_key_env: None,
		path: "/chat/completions".to_string(),
		model: "test".to_string(),
		temperature: 0.7,
		max_tokens: 2_000,
		timeout_ms: 50,
		default_headers: Map::new(),
	};
	let messages = [ChatMessage::system("rules"), ChatMessage::user("반품")];
	let err = relay_providers::completion::complete(&cfg, &messages)
		.await
		.expect_err("Expected timeout.");

	assert!(matches!(err, Error::Unavailable { .. }), "Unexpected error: {err:?}");
}
