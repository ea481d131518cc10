use relay_config::Postgres;
use relay_storage::db::Db;
use relay_testkit::TestDatabase;

#[tokio::test]
#[ignore = "Requires external Postgres with pgvector. Set RELAY_PG_DSN to run."]
async fn db_connects_and_bootstraps() {
	let Some(base_dsn) = relay_testkit::env_dsn() else {
		eprintln!("Skipping db_connects_and_bootstraps; set RELAY_PG_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let cfg = Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 1 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to Postgres.");

	db.ensure_schema(3).await.expect("Failed to ensure schema.");
	// Bootstrapping is idempotent.
	db.ensure_schema(3).await.expect("Failed to re-run schema.");

	for table in ["qna", "context"] {
		let count: i64 = sqlx::query_scalar(
			"SELECT count(*) FROM information_schema.tables WHERE table_name = $1",
		)
		.bind(table)
		.fetch_one(&db.pool)
		.await
		.expect("Failed to query schema tables.");

		assert_eq!(count, 1, "Missing table {table}.");
	}

	db.pool.close().await;
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}
