use std::sync::Arc;

use hearth_service::HearthService;
use hearth_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<HearthService>,
}
impl AppState {
	pub async fn new(config: hearth_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		let service = HearthService::new(config, db);

		Ok(Self { service: Arc::new(service) })
	}

	/// The fixed identity every request runs as.
	pub fn user_id(&self) -> &str {
		&self.service.cfg.identity.user_id
	}
}
