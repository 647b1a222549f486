use async_trait::async_trait;
use chrono::{DateTime, Utc};
use skills_core::model::{ProgressMap, Roadmap, SkillName, TopicKey, TopicProgress};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// A roadmap as last generated for a skill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedRoadmap {
    pub roadmap: Roadmap,
    pub generated_at: DateTime<Utc>,
}

/// Local durable cache of per-skill topic progress.
///
/// Entries are only ever inserted or overwritten, never removed.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Load all cached progress for a skill. Unknown skills yield an empty map.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the cache cannot be read or a row cannot be decoded.
    async fn load_progress(&self, skill: &SkillName) -> Result<ProgressMap, StorageError>;

    /// Insert or overwrite the progress of one topic.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn save_topic(
        &self,
        skill: &SkillName,
        key: &TopicKey,
        progress: &TopicProgress,
    ) -> Result<(), StorageError>;

    /// Insert or overwrite every topic in `progress`. Topics not in the map are kept.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if any record cannot be stored.
    async fn save_progress(
        &self,
        skill: &SkillName,
        progress: &ProgressMap,
    ) -> Result<(), StorageError>;
}

#[async_trait]
pub trait RoadmapRepository: Send + Sync {
    /// Fetch the cached roadmap for a skill, if one was saved.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read or decode failures.
    async fn get_roadmap(&self, skill: &SkillName) -> Result<Option<CachedRoadmap>, StorageError>;

    /// Store (or replace) the roadmap for a skill.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the roadmap cannot be stored.
    async fn save_roadmap(
        &self,
        skill: &SkillName,
        roadmap: &Roadmap,
        generated_at: DateTime<Utc>,
    ) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    progress: Arc<Mutex<HashMap<SkillName, ProgressMap>>>,
    roadmaps: Arc<Mutex<HashMap<SkillName, CachedRoadmap>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn load_progress(&self, skill: &SkillName) -> Result<ProgressMap, StorageError> {
        let guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(skill).cloned().unwrap_or_default())
    }

    async fn save_topic(
        &self,
        skill: &SkillName,
        key: &TopicKey,
        progress: &TopicProgress,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard
            .entry(skill.clone())
            .or_default()
            .insert(key.clone(), progress.clone());
        Ok(())
    }

    async fn save_progress(
        &self,
        skill: &SkillName,
        progress: &ProgressMap,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .progress
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let stored = guard.entry(skill.clone()).or_default();
        for (key, topic) in progress.iter() {
            stored.insert(key.clone(), topic.clone());
        }
        Ok(())
    }
}

#[async_trait]
impl RoadmapRepository for InMemoryRepository {
    async fn get_roadmap(&self, skill: &SkillName) -> Result<Option<CachedRoadmap>, StorageError> {
        let guard = self
            .roadmaps
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(skill).cloned())
    }

    async fn save_roadmap(
        &self,
        skill: &SkillName,
        roadmap: &Roadmap,
        generated_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .roadmaps
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(
            skill.clone(),
            CachedRoadmap {
                roadmap: roadmap.clone(),
                generated_at,
            },
        );
        Ok(())
    }
}

/// Aggregates the progress and roadmap caches behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn ProgressRepository>,
    pub roadmaps: Arc<dyn RoadmapRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo.clone());
        let roadmaps: Arc<dyn RoadmapRepository> = Arc::new(repo);
        Self { progress, roadmaps }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skills_core::time::fixed_now;

    fn skill() -> SkillName {
        SkillName::new("Rust").unwrap()
    }

    #[tokio::test]
    async fn save_progress_overwrites_but_never_drops_topics() {
        let repo = InMemoryRepository::new();
        let a = TopicKey::from_label("A");
        let b = TopicKey::from_label("B");

        let mut viewed = TopicProgress::new();
        viewed.mark_viewed(fixed_now());
        repo.save_topic(&skill(), &a, &viewed).await.unwrap();

        let mut completed = TopicProgress::new();
        completed.mark_completed(fixed_now());
        let update: ProgressMap = [(b.clone(), completed.clone())].into_iter().collect();
        repo.save_progress(&skill(), &update).await.unwrap();

        let loaded = repo.load_progress(&skill()).await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.get("A"), Some(&viewed));
        assert_eq!(loaded.get("B"), Some(&completed));
    }

    #[tokio::test]
    async fn unknown_skill_has_empty_progress_and_no_roadmap() {
        let repo = InMemoryRepository::new();
        assert!(repo.load_progress(&skill()).await.unwrap().is_empty());
        assert!(repo.get_roadmap(&skill()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn roadmap_round_trips() {
        let storage = Storage::in_memory();
        let roadmap = Roadmap::from_labels(["A: intro", "B"]);
        storage
            .roadmaps
            .save_roadmap(&skill(), &roadmap, fixed_now())
            .await
            .unwrap();

        let cached = storage.roadmaps.get_roadmap(&skill()).await.unwrap().unwrap();
        assert_eq!(cached.roadmap, roadmap);
        assert_eq!(cached.generated_at, fixed_now());
    }
}
