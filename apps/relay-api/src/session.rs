//! Cookie-bound session ids.
//!
//! Every request leaves this layer with a [`SessionId`] extension. A missing or malformed
//! cookie gets a freshly minted id and a `Set-Cookie` on the response.

use axum::{
	body::Body,
	extract::State,
	http::{HeaderMap, HeaderValue, Request, header},
	middleware::Next,
	response::Response,
};

use relay_config::Session;
use relay_domain::session::SessionId;

use crate::state::AppState;

pub async fn session_middleware(
	State(state): State<AppState>,
	mut req: Request<Body>,
	next: Next,
) -> Response {
	let cfg = &state.service.cfg.session;
	let existing =
		cookie_value(req.headers(), &cfg.cookie_name).and_then(|raw| SessionId::parse(&raw));
	let (session_id, minted) = match existing {
		Some(session_id) => (session_id, false),
		None => (SessionId::generate(), true),
	};

	req.extensions_mut().insert(session_id.clone());

	let mut res = next.run(req).await;

	if minted {
		match HeaderValue::from_str(&set_cookie(cfg, &session_id)) {
			Ok(value) => {
				res.headers_mut().append(header::SET_COOKIE, value);

				tracing::info!(session_id = %session_id, "Issued a new session.");
			},
			Err(err) => tracing::warn!(error = %err, "Session cookie is not a valid header value."),
		}
	}

	res
}

/// First value of `name` across all `Cookie` headers.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
	headers
		.get_all(header::COOKIE)
		.iter()
		.filter_map(|value| value.to_str().ok())
		.flat_map(|value| value.split(';'))
		.filter_map(|pair| pair.trim().split_once('='))
		.find(|(key, _)| *key == name)
		.map(|(_, value)| value.trim().to_string())
}

pub fn set_cookie(cfg: &Session, session_id: &SessionId) -> String {
	let mut cookie = format!(
		"{}={}; Path=/; Max-Age={}; HttpOnly",
		cfg.cookie_name, session_id, cfg.max_age_secs
	);

	if cfg.secure {
		cookie.push_str("; Secure");
	}

	cookie
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn finds_cookie_among_several() {
		let mut headers = HeaderMap::new();

		headers.append(header::COOKIE, HeaderValue::from_static("theme=dark"));
		headers.append(header::COOKIE, HeaderValue::from_static("lang=ko; session_id=abc ; x=1"));

		assert_eq!(cookie_value(&headers, "session_id").as_deref(), Some("abc"));
		assert_eq!(cookie_value(&headers, "missing"), None);
	}

	#[test]
	fn cookie_attributes_follow_config() {
		let session_id = SessionId::generate();
		let mut cfg = Session::default();

		assert_eq!(
			set_cookie(&cfg, &session_id),
			format!("session_id={session_id}; Path=/; Max-Age=3600; HttpOnly; Secure")
		);

		cfg.secure = false;

		assert!(!set_cookie(&cfg, &session_id).contains("Secure"));
	}
}
