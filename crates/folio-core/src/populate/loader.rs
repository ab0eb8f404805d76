//! The injected document loader.

use futures::future::BoxFuture;
use serde_json::Value;

use super::key::LoadKey;
use crate::error::Error;

/// Result of one document load.
pub type LoadResult = Result<Option<Value>, Error>;

/// Asynchronous document loader injected by the surrounding read pipeline.
///
/// The engine performs no storage I/O itself; every fetch goes through this
/// trait. Implementations must be idempotent for equal keys: the engine may
/// call `load` once per distinct key and share the result, but never relies
/// on side effects.
///
/// `Ok(None)` models not-found or access-denied; the engine substitutes the
/// bare id in that case, since the existence of a reference is not treated
/// as sensitive. `Err` is an infrastructure failure and propagates to every
/// task waiting on the same key.
pub trait Loader: Send + Sync {
    /// Fetch the document identified by `key`.
    fn load<'a>(&'a self, key: &'a LoadKey) -> BoxFuture<'a, LoadResult>;
}

impl<F> Loader for F
where
    F: for<'k> Fn(&'k LoadKey) -> BoxFuture<'static, LoadResult> + Send + Sync,
{
    fn load<'a>(&'a self, key: &'a LoadKey) -> BoxFuture<'a, LoadResult> {
        (self)(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use serde_json::json;

    use crate::populate::cache::LoadCache;
    use crate::populate::key::DocId;

    #[tokio::test]
    async fn test_closure_loader() {
        let loader = |key: &LoadKey| -> BoxFuture<'static, LoadResult> {
            let id = key.id.to_value();
            Box::pin(async move { Ok(Some(json!({ "id": id }))) })
        };
        let cache = LoadCache::new(Arc::new(loader));

        let key = LoadKey {
            transaction_id: None,
            collection: "authors".to_string(),
            id: DocId::Str("42".to_string()),
            depth: 1,
            current_depth: 2,
            locale: None,
            fallback_locale: None,
            override_access: false,
            show_hidden_fields: false,
        };
        let loaded = cache.get(&key).await.unwrap();

        assert_eq!(loaded, Some(json!({ "id": "42" })));
    }
}
