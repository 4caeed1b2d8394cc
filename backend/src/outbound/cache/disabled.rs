use std::time::Duration;

use async_trait::async_trait;

use crate::domain::ports::{CacheError, CacheKey, CachePattern, LookasideCache};

/// Cache that stores nothing.
///
/// Used when caching is switched off; every read goes to the store.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledLookasideCache;

#[async_trait]
impl LookasideCache for DisabledLookasideCache {
    async fn get(&self, _key: &CacheKey) -> Result<Option<String>, CacheError> {
        Ok(None)
    }

    async fn set_with_ttl(
        &self,
        _key: &CacheKey,
        _value: String,
        _ttl: Duration,
    ) -> Result<(), CacheError> {
        Ok(())
    }

    async fn delete(&self, _key: &CacheKey) -> Result<(), CacheError> {
        Ok(())
    }

    async fn evict_matching(&self, _pattern: &CachePattern) -> Result<(), CacheError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn writes_are_never_visible() {
        let cache = DisabledLookasideCache;
        let key = CacheKey::new("book:1").expect("valid key");

        cache
            .set_with_ttl(&key, "{}".to_owned(), Duration::from_secs(60))
            .await
            .expect("set succeeds");

        assert_eq!(cache.get(&key).await.expect("get succeeds"), None);
    }

    #[rstest]
    #[tokio::test]
    async fn invalidation_is_a_no_op() {
        let cache = DisabledLookasideCache;
        let pattern = CachePattern::new("books:*").expect("valid pattern");
        assert!(cache.evict_matching(&pattern).await.is_ok());
        let key = CacheKey::new("book:1").expect("valid key");
        assert!(cache.delete(&key).await.is_ok());
    }
}
