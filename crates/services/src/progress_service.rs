use std::sync::Arc;

use chrono::{DateTime, Utc};
use skills_core::model::{ProgressError, ProgressMap, Roadmap, SkillName, TopicKey, TopicProgress};
use skills_core::{Clock, is_accessible, normalize};
use storage::repository::ProgressRepository;
use tracing::{debug, warn};

use crate::api::ProgressRemote;
use crate::error::ProgressServiceError;

/// Loads, mutates and persists topic progress for a skill.
///
/// The caller owns the `ProgressMap`; every mutation updates it in place first,
/// then writes the topic to the local cache and pushes it to the remote store.
/// Remote failures are logged and otherwise ignored so the local state stands.
#[derive(Clone)]
pub struct ProgressService {
    clock: Clock,
    cache: Arc<dyn ProgressRepository>,
    remote: Option<Arc<dyn ProgressRemote>>,
}

impl ProgressService {
    #[must_use]
    pub fn new(
        clock: Clock,
        cache: Arc<dyn ProgressRepository>,
        remote: Option<Arc<dyn ProgressRemote>>,
    ) -> Self {
        Self {
            clock,
            cache,
            remote,
        }
    }

    #[must_use]
    pub fn is_online(&self) -> bool {
        self.remote.is_some()
    }

    /// Load cached progress and fold in the remote copy when one is reachable.
    ///
    /// The merged result is written back to the cache.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the cache cannot be read or written.
    pub async fn load(&self, skill: &SkillName) -> Result<ProgressMap, ProgressServiceError> {
        let mut progress = self.cache.load_progress(skill).await?;
        debug!(%skill, topics = progress.len(), "loaded cached progress");

        let Some(remote) = &self.remote else {
            return Ok(progress);
        };

        match remote.fetch_progress(skill).await {
            Ok(raw) => {
                let fetched = normalize(&raw);
                debug!(%skill, topics = fetched.len(), "fetched remote progress");
                progress.merge(&fetched);
                self.cache.save_progress(skill, &progress).await?;
            }
            Err(err) => {
                warn!(%skill, error = %err, "remote progress unavailable, using cache");
            }
        }
        Ok(progress)
    }

    /// Open the roadmap step at `index`, marking its topic viewed.
    ///
    /// # Errors
    ///
    /// Returns `UnknownStep` for an index outside the roadmap, `Locked` when the
    /// previous step is not completed, or `Storage` if the cache write fails.
    pub async fn open_step(
        &self,
        skill: &SkillName,
        roadmap: &Roadmap,
        progress: &mut ProgressMap,
        index: usize,
    ) -> Result<TopicProgress, ProgressServiceError> {
        let step = roadmap
            .get(index)
            .ok_or(ProgressServiceError::UnknownStep { index })?;
        if !is_accessible(index, roadmap, progress) {
            return Err(ProgressServiceError::Locked { index });
        }
        self.mark_viewed(skill, progress, &step.key()).await
    }

    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the cache write fails.
    pub async fn mark_viewed(
        &self,
        skill: &SkillName,
        progress: &mut ProgressMap,
        key: &TopicKey,
    ) -> Result<TopicProgress, ProgressServiceError> {
        self.apply(skill, progress, key, |topic, now| {
            topic.mark_viewed(now);
            Ok(())
        })
        .await
    }

    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the cache write fails.
    pub async fn mark_completed(
        &self,
        skill: &SkillName,
        progress: &mut ProgressMap,
        key: &TopicKey,
    ) -> Result<TopicProgress, ProgressServiceError> {
        self.apply(skill, progress, key, |topic, now| {
            topic.mark_completed(now);
            Ok(())
        })
        .await
    }

    /// # Errors
    ///
    /// Returns `ProgressServiceError::Progress` for an out-of-range score (the
    /// map is left untouched), or `Storage` if the cache write fails.
    pub async fn record_quiz_score(
        &self,
        skill: &SkillName,
        progress: &mut ProgressMap,
        key: &TopicKey,
        score: f64,
    ) -> Result<TopicProgress, ProgressServiceError> {
        self.apply(skill, progress, key, |topic, _| topic.record_quiz_score(score))
            .await
    }

    /// # Errors
    ///
    /// Returns `ProgressServiceError::Progress` for an out-of-range score (the
    /// map is left untouched), or `Storage` if the cache write fails.
    pub async fn record_code_score(
        &self,
        skill: &SkillName,
        progress: &mut ProgressMap,
        key: &TopicKey,
        score: f64,
    ) -> Result<TopicProgress, ProgressServiceError> {
        self.apply(skill, progress, key, |topic, _| topic.record_code_score(score))
            .await
    }

    async fn apply<F>(
        &self,
        skill: &SkillName,
        progress: &mut ProgressMap,
        key: &TopicKey,
        update: F,
    ) -> Result<TopicProgress, ProgressServiceError>
    where
        F: FnOnce(&mut TopicProgress, DateTime<Utc>) -> Result<(), ProgressError>,
    {
        let mut updated = progress.get(key.as_str()).cloned().unwrap_or_default();
        update(&mut updated, self.clock.now())?;
        *progress.topic_mut(key) = updated.clone();

        self.cache.save_topic(skill, key, &updated).await?;
        debug!(%skill, topic = %key, status = %updated.status(), "saved topic progress");

        if let Some(remote) = &self.remote {
            if let Err(err) = remote.push_topic(skill, key, &updated).await {
                warn!(%skill, topic = %key, error = %err, "failed to push topic progress");
            }
        }
        Ok(updated)
    }
}
