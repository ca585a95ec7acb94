use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::db::Store;
use crate::media::MediaStore;

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub media: MediaStore,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let media = MediaStore::new(&config.storage);
        media
            .ensure_root()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create uploads directory: {e}"))?;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            store,
            media,
        })
    }

    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }
}
