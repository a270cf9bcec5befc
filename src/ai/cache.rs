//! Translation cache keyed by problem identifier

use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct CachedTranslation {
    /// Digest of the statement the translation was computed from
    source_digest: String,
    text: String,
}

/// In-process cache of finished translations.
///
/// An entry only answers for the exact source text it was computed from:
/// a lookup with a different digest is a miss, so an edited statement is
/// never served a stale translation even before [`TranslationCache::invalidate`]
/// runs. Writes are last-write-wins.
#[derive(Debug, Default)]
pub struct TranslationCache {
    entries: RwLock<HashMap<Uuid, CachedTranslation>>,
}

impl TranslationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, problem_id: &Uuid, source_digest: &str) -> Option<String> {
        let entries = self.entries.read().await;
        entries
            .get(problem_id)
            .filter(|entry| entry.source_digest == source_digest)
            .map(|entry| entry.text.clone())
    }

    pub async fn insert(&self, problem_id: Uuid, source_digest: String, text: String) {
        let mut entries = self.entries.write().await;
        entries.insert(problem_id, CachedTranslation { source_digest, text });
    }

    /// Drop the entry for a problem; returns whether one existed
    pub async fn invalidate(&self, problem_id: &Uuid) -> bool {
        self.entries.write().await.remove(problem_id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lookup_requires_matching_digest() {
        let cache = TranslationCache::new();
        let id = Uuid::new_v4();

        cache.insert(id, "digest-a".into(), "Salom".into()).await;

        assert_eq!(cache.get(&id, "digest-a").await.as_deref(), Some("Salom"));
        assert_eq!(cache.get(&id, "digest-b").await, None);
        assert_eq!(cache.get(&Uuid::new_v4(), "digest-a").await, None);
    }

    #[tokio::test]
    async fn test_last_write_wins_and_invalidate() {
        let cache = TranslationCache::new();
        let id = Uuid::new_v4();

        cache.insert(id, "d".into(), "first".into()).await;
        cache.insert(id, "d".into(), "second".into()).await;
        assert_eq!(cache.get(&id, "d").await.as_deref(), Some("second"));
        assert_eq!(cache.len().await, 1);

        assert!(cache.invalidate(&id).await);
        assert!(!cache.invalidate(&id).await);
        assert_eq!(cache.get(&id, "d").await, None);
    }
}
