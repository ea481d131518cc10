use std::fmt;

use uuid::Uuid;

const SESSION_ID_LEN: usize = 32;

/// Opaque per-client session token, lowercase hex.
///
/// Generated ids are random (v4) UUIDs: 122 random bits, with the version and variant bits fixed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);
impl SessionId {
	pub fn generate() -> Self {
		Self(Uuid::new_v4().simple().to_string())
	}

	/// Accepts a token previously issued by [`SessionId::generate`] or an equivalent issuer.
	pub fn parse(raw: &str) -> Option<Self> {
		let raw = raw.trim();

		if raw.len() != SESSION_ID_LEN || !raw.bytes().all(|b| b.is_ascii_hexdigit()) {
			return None;
		}

		Some(Self(raw.to_ascii_lowercase()))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl fmt::Display for SessionId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn generated_ids_round_trip_through_parse() {
		let id = SessionId::generate();

		assert_eq!(id.as_str().len(), SESSION_ID_LEN);
		assert_eq!(SessionId::parse(id.as_str()), Some(id));
	}

	#[test]
	fn generated_ids_are_random_uuids() {
		let id = SessionId::generate();
		let uuid = Uuid::parse_str(id.as_str()).expect("Generated id must be a UUID.");

		assert_eq!(uuid.get_version_num(), 4);
		assert_ne!(SessionId::generate(), id);
	}

	#[test]
	fn rejects_foreign_tokens() {
		assert!(SessionId::parse("").is_none());
		assert!(SessionId::parse("not-a-session").is_none());
		assert!(SessionId::parse("zz9c2b3e4d5f60718293a4b5c6d7e8f9").is_none());
		assert_eq!(
			SessionId::parse("0A1B2C3D4E5F60718293A4B5C6D7E8F9").map(|id| id.to_string()),
			Some("0a1b2c3d4e5f60718293a4b5c6d7e8f9".to_string())
		);
	}
}
