use axum::{
	Extension, Json, Router,
	extract::{
		State,
		ws::{Message, WebSocket, WebSocketUpgrade},
	},
	http::StatusCode,
	middleware,
	response::{IntoResponse, Response},
	routing::get,
};
use serde::Serialize;
use tower_http::services::ServeFile;

use relay_domain::{records::QaPair, session::SessionId};
use relay_service::{Error, PipelineError, RequestContext};

use crate::{session, state::AppState};

const FALLBACK_ERROR_FRAME: &str =
	r#"{"error_code":"internal_error","message":"Error processing your query. Please try again later."}"#;

pub fn router(state: AppState) -> Router {
	let mut router = Router::new()
		.route("/ping", get(ping))
		.route("/history", get(history))
		.route("/chat", get(chat));

	if let Some(index_html) = state.service.cfg.service.index_html.clone() {
		router = router.route_service("/", ServeFile::new(index_html));
	}

	router
		.layer(middleware::from_fn_with_state(state.clone(), session::session_middleware))
		.with_state(state)
}

async fn ping() -> &'static str {
	"PING"
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
	pub previous_chats: Vec<QaPair>,
}

async fn history(
	State(state): State<AppState>,
	Extension(session_id): Extension<SessionId>,
) -> Result<Json<HistoryResponse>, ApiError> {
	let ctx = RequestContext::new(session_id);
	let window = state.service.history(&ctx).await?;

	Ok(Json(HistoryResponse { previous_chats: window.pairs() }))
}

async fn chat(
	ws: WebSocketUpgrade,
	State(state): State<AppState>,
	Extension(session_id): Extension<SessionId>,
) -> impl IntoResponse {
	ws.on_upgrade(move |socket| serve_chat(socket, state, session_id))
}

/// One socket per client. Frames are answered in arrival order.
async fn serve_chat(mut socket: WebSocket, state: AppState, session_id: SessionId) {
	while let Some(received) = socket.recv().await {
		let message = match received {
			Ok(Message::Close(_)) => break,
			Ok(message) => message,
			Err(err) => {
				tracing::debug!(error = %err, "Chat socket receive failed.");

				break;
			},
		};
		let Some(payload) = inbound_payload(&message) else {
			continue;
		};
		let ctx = RequestContext::new(session_id.clone());
		let frame = chat_frame(&state, &ctx, &payload).await;

		if socket.send(Message::Text(frame.into())).await.is_err() {
			break;
		}
	}

	tracing::debug!(session_id = %session_id, "Chat socket closed.");
}

/// Text carried by a data frame. Binary frames are read as UTF-8 with invalid bytes replaced, so
/// they reach the pipeline and get a reply like any other payload. Control frames carry none.
pub fn inbound_payload(message: &Message) -> Option<String> {
	match message {
		Message::Text(text) => Some(text.as_str().to_string()),
		Message::Binary(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
		Message::Ping(_) | Message::Pong(_) | Message::Close(_) => None,
	}
}

/// Runs one chat payload and renders the outbound frame.
pub async fn chat_frame(state: &AppState, ctx: &RequestContext, payload: &str) -> String {
	let rendered = match state.service.chat(ctx, payload).await {
		Ok(outcome) => serde_json::to_string(&outcome.reply),
		Err(err) => serde_json::to_string(&ErrorBody::from(&err)),
	};

	rendered.unwrap_or_else(|err| {
		tracing::warn!(error = %err, "Failed to render chat frame.");

		FALLBACK_ERROR_FRAME.to_string()
	})
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}
impl From<&PipelineError> for ErrorBody {
	fn from(err: &PipelineError) -> Self {
		Self { error_code: err.code().to_string(), message: err.user_message().to_string() }
	}
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	body: ErrorBody,
}
impl From<PipelineError> for ApiError {
	fn from(err: PipelineError) -> Self {
		let status = match err.error {
			Error::MalformedInput { .. } => StatusCode::BAD_REQUEST,
			Error::ProviderUnavailable { .. }
			| Error::ProviderAuth { .. }
			| Error::ProviderResponseInvalid { .. }
			| Error::GenerationParse { .. }
			| Error::EmptyGenerationResult => StatusCode::BAD_GATEWAY,
			Error::StoreUnavailable { .. }
			| Error::RetrievalFailed { .. }
			| Error::PersistenceFailed { .. } => StatusCode::SERVICE_UNAVAILABLE,
		};

		Self { status, body: ErrorBody::from(&err) }
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		(self.status, Json(self.body)).into_response()
	}
}
