use reqwest::StatusCode;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// Transport failure, timeout, throttling or a server-side error.
	#[error("Provider is unavailable: {message}")]
	Unavailable { message: String },
	/// Missing credential or a 401/403 from the provider.
	#[error("Provider rejected the credential: {message}")]
	Auth { message: String },
	#[error("{message}")]
	InvalidResponse { message: String },
	#[error("Provider returned no completions.")]
	EmptyCompletion,
	#[error("{message}")]
	InvalidConfig { message: String },
	#[error(transparent)]
	InvalidHeaderName(#[from] reqwest::header::InvalidHeaderName),
	#[error(transparent)]
	InvalidHeaderValue(#[from] reqwest::header::InvalidHeaderValue),
}
impl Error {
	/// Maps a non-success HTTP status to the matching error kind.
	pub fn from_status(status: StatusCode) -> Self {
		match status {
			StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN =>
				Self::Auth { message: format!("Provider returned {status}.") },
			_ => Self::Unavailable { message: format!("Provider returned {status}.") },
		}
	}
}
impl From<reqwest::Error> for Error {
	fn from(err: reqwest::Error) -> Self {
		if let Some(status) = err.status() {
			return Self::from_status(status);
		}
		if err.is_decode() {
			return Self::InvalidResponse { message: format!("Provider body is not valid JSON: {err}") };
		}

		Self::Unavailable { message: err.to_string() }
	}
}
impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		Self::InvalidResponse { message: err.to_string() }
	}
}
