use std::{future::Future, sync::Arc};

use dashmap::DashMap;
use tracing::debug;

/// Views cached by request path, recomputed on the first read after `invalidate`.
pub struct ViewCache<T> {
    views: DashMap<String, Arc<T>>,
}

impl<T> Default for ViewCache<T> {
    fn default() -> Self {
        Self {
            views: DashMap::new(),
        }
    }
}

impl<T> ViewCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &str) -> Option<Arc<T>> {
        self.views.get(path).map(|v| Arc::clone(v.value()))
    }

    pub async fn get_or_load<F, Fut>(&self, path: &str, load: F) -> anyhow::Result<Arc<T>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        if let Some(hit) = self.get(path) {
            debug!(path, "view cache hit");
            return Ok(hit);
        }
        // Not holding a map guard across the await; concurrent misses may both load.
        let fresh = Arc::new(load().await?);
        self.views.insert(path.to_string(), Arc::clone(&fresh));
        debug!(path, "view cache filled");
        Ok(fresh)
    }

    pub fn invalidate(&self, path: &str) {
        let dropped = self.views.remove(path).is_some();
        debug!(path, dropped, "view invalidated");
    }
}
