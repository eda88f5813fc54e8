//! In-memory cache of validated model output.
//!
//! Keyed by the operation and hashes of the question, the answer and the
//! rubric name, so repeated practice of the same answer costs one call.

use moka::future::Cache;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use crate::Operation;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    operation: Operation,
    question_hash: u64,
    answer_hash: u64,
    rubric_hash: u64,
}

fn hash_str(value: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

impl CacheKey {
    pub fn new(operation: Operation, question: &str, answer: &str, rubric_name: &str) -> Self {
        Self {
            operation,
            question_hash: hash_str(question.trim()),
            answer_hash: hash_str(answer.trim()),
            rubric_hash: hash_str(rubric_name),
        }
    }
}

pub struct EnhancementCache {
    cache: Cache<CacheKey, String>,
}

impl EnhancementCache {
    pub fn new(max_entries: u64, ttl: Duration) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(max_entries)
                .time_to_live(ttl)
                .build(),
        }
    }

    pub async fn get(&self, key: &CacheKey) -> Option<String> {
        self.cache.get(key).await
    }

    pub async fn insert(&self, key: CacheKey, text: String) {
        self.cache.insert(key, text).await;
    }

    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    /// Approximate; pending writes may not be counted yet.
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

impl Default for EnhancementCache {
    fn default() -> Self {
        Self::new(1_000, Duration::from_secs(3600))
    }
}
