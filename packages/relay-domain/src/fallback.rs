//! Lexical fallback heuristic for under-filled vector retrieval.
//!
//! The query is split on whitespace and its last token dropped, loosening phrases such as
//! "반품은 어떻게 하나요" to "반품은 어떻게". The reduced phrase is then matched as a
//! case-insensitive substring of stored questions. This is kept for compatibility with the
//! existing knowledge base; it has no semantic grounding and is a known source of noisy hits.

/// Returns the reduced phrase, or `None` when the query has fewer than two tokens.
pub fn reduced_phrase(query: &str) -> Option<String> {
	let tokens: Vec<&str> = query.split_whitespace().collect();

	if tokens.len() <= 1 {
		return None;
	}

	Some(tokens[..tokens.len() - 1].join(" "))
}

/// Builds the case-insensitive pattern passed to the store's `~*` operator.
///
/// Metacharacters in the user's phrase are escaped so the match stays a plain substring test.
pub fn lexical_pattern(phrase: &str) -> String {
	regex::escape(phrase)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn drops_last_token() {
		assert_eq!(reduced_phrase("반품은 어떻게 하나요").as_deref(), Some("반품은 어떻게"));
		assert_eq!(reduced_phrase("  배송  조회 ").as_deref(), Some("배송"));
	}

	#[test]
	fn single_token_has_no_reduction() {
		assert_eq!(reduced_phrase("환불"), None);
		assert_eq!(reduced_phrase("   "), None);
		assert_eq!(reduced_phrase(""), None);
	}

	#[test]
	fn escapes_regex_metacharacters() {
		assert_eq!(lexical_pattern("a.b (c)?"), r"a\.b \(c\)\?");
		assert_eq!(lexical_pattern("반품은 어떻게"), "반품은 어떻게");
	}
}
