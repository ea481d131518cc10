use time::OffsetDateTime;

use crate::{
	Error, Result,
	db::Db,
	models::{ContextTurn, KnowledgeHit, KnowledgeMatch},
};

/// Nearest knowledge entries by L2 distance, closest first, strictly below `max_distance`.
pub async fn vector_search(
	db: &Db,
	vec: &[f32],
	max_distance: f32,
	limit: u32,
) -> Result<Vec<KnowledgeHit>> {
	if vec.is_empty() {
		return Err(Error::InvalidArgument("Query vector must be non-empty.".to_string()));
	}

	let vec_text = vector_to_pg(vec);
	let rows = sqlx::query_as::<_, KnowledgeHit>(
		"\
SELECT
	id,
	question,
	answer,
	(embedding <-> $1::text::vector)::real AS distance
FROM qna
WHERE embedding <-> $1::text::vector < $2
ORDER BY embedding <-> $1::text::vector, id
LIMIT $3",
	)
	.bind(vec_text.as_str())
	.bind(f64::from(max_distance))
	.bind(i64::from(limit))
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}

/// Case-insensitive regex match (`~*`) against stored questions.
pub async fn lexical_search(db: &Db, pattern: &str, limit: u32) -> Result<Vec<KnowledgeMatch>> {
	let rows = sqlx::query_as::<_, KnowledgeMatch>(
		"\
SELECT id, question, answer
FROM qna
WHERE question ~* $1
ORDER BY id
LIMIT $2",
	)
	.bind(pattern)
	.bind(i64::from(limit))
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}

/// Most recent turns for a session, newest first.
pub async fn recent_turns(db: &Db, session_id: &str, limit: u32) -> Result<Vec<ContextTurn>> {
	let rows = sqlx::query_as::<_, ContextTurn>(
		"\
SELECT id, session_id, question, answer, created_at
FROM context
WHERE session_id = $1
ORDER BY created_at DESC, id DESC
LIMIT $2",
	)
	.bind(session_id)
	.bind(i64::from(limit))
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}

pub async fn append_turn(
	db: &Db,
	session_id: &str,
	question: &str,
	answer: &str,
	created_at: OffsetDateTime,
) -> Result<i64> {
	let id: i64 = sqlx::query_scalar(
		"\
INSERT INTO context (session_id, question, answer, created_at)
VALUES ($1, $2, $3, $4)
RETURNING id",
	)
	.bind(session_id)
	.bind(question)
	.bind(answer)
	.bind(created_at)
	.fetch_one(&db.pool)
	.await?;

	Ok(id)
}

/// Seeds one knowledge entry. Used by ingestion tooling and tests.
pub async fn insert_knowledge(db: &Db, question: &str, answer: &str, vec: &[f32]) -> Result<i64> {
	if vec.is_empty() {
		return Err(Error::InvalidArgument("Knowledge vector must be non-empty.".to_string()));
	}

	let vec_text = vector_to_pg(vec);
	let id: i64 = sqlx::query_scalar(
		"\
INSERT INTO qna (question, answer, embedding)
VALUES ($1, $2, $3::text::vector)
RETURNING id",
	)
	.bind(question)
	.bind(answer)
	.bind(vec_text.as_str())
	.fetch_one(&db.pool)
	.await?;

	Ok(id)
}

pub fn vector_to_pg(vec: &[f32]) -> String {
	let mut out = String::with_capacity(vec.len() * 8);

	out.push('[');

	for (i, value) in vec.iter().enumerate() {
		if i > 0 {
			out.push(',');
		}

		out.push_str(&value.to_string());
	}

	out.push(']');

	out
}
