use std::sync::Arc;

use tn_core::{Error, NewsStore, Result};

pub mod backends;

pub use backends::*;

/// Build a store from its CLI name.
#[cfg_attr(not(feature = "sqlite"), allow(unused_variables))]
pub async fn create_store(kind: &str, path: Option<&str>) -> Result<Arc<dyn NewsStore>> {
    match kind {
        "memory" => Ok(Arc::new(MemoryStore::new())),
        #[cfg(feature = "sqlite")]
        "sqlite" => {
            let store = SqliteStore::open(path.unwrap_or("news.db")).await?;
            Ok(Arc::new(store))
        }
        other => Err(Error::Storage(format!(
            "unknown storage backend: {}",
            other
        ))),
    }
}
