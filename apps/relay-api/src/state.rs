use std::sync::Arc;

use relay_service::RelayService;
use relay_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<RelayService>,
}
impl AppState {
	pub async fn new(config: relay_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema(config.storage.vector_dim).await?;

		Ok(Self::from_service(RelayService::new(config, db)))
	}

	pub fn from_service(service: RelayService) -> Self {
		Self { service: Arc::new(service) }
	}
}
