use crate::cache::ViewCache;
use crate::config::AppConfig;
use crate::customers::repo::{CustomerStore, PgCustomerStore};
use crate::customers::repo_types::Customer;
use crate::db;
use crate::storage::{LocalStorage, StorageClient};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub customers: Arc<dyn CustomerStore>,
    pub storage: Arc<dyn StorageClient>,
    pub views: Arc<ViewCache<Vec<Customer>>>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let pool = db::connect(&config).await?;
        db::migrate(&pool).await;

        let storage = Arc::new(LocalStorage::new(&config.storage.public_dir).await?)
            as Arc<dyn StorageClient>;
        let customers = Arc::new(PgCustomerStore::new(pool)) as Arc<dyn CustomerStore>;

        Ok(Self::from_parts(
            config,
            customers,
            storage,
            Arc::new(ViewCache::new()),
        ))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        customers: Arc<dyn CustomerStore>,
        storage: Arc<dyn StorageClient>,
        views: Arc<ViewCache<Vec<Customer>>>,
    ) -> Self {
        Self {
            config,
            customers,
            storage,
            views,
        }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        crate::testing::Harness::new().state
    }
}
