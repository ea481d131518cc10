use time::OffsetDateTime;

#[derive(Debug, sqlx::FromRow)]
pub struct KnowledgeHit {
	pub id: i64,
	pub question: String,
	pub answer: String,
	pub distance: f32,
}

#[derive(Debug, sqlx::FromRow)]
pub struct KnowledgeMatch {
	pub id: i64,
	pub question: String,
	pub answer: String,
}

#[derive(Debug, sqlx::FromRow)]
pub struct ContextTurn {
	pub id: i64,
	pub session_id: String,
	pub question: String,
	pub answer: String,
	pub created_at: OffsetDateTime,
}
