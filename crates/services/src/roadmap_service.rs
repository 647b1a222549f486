use std::sync::Arc;

use skills_core::Clock;
use skills_core::model::{Roadmap, SkillName};
use storage::repository::RoadmapRepository;
use tracing::{debug, info};

use crate::api::RoadmapGenerator;
use crate::error::RoadmapServiceError;

/// Serves roadmaps from the local cache, generating them remotely on a miss.
#[derive(Clone)]
pub struct RoadmapService {
    clock: Clock,
    cache: Arc<dyn RoadmapRepository>,
    generator: Option<Arc<dyn RoadmapGenerator>>,
}

impl RoadmapService {
    #[must_use]
    pub fn new(
        clock: Clock,
        cache: Arc<dyn RoadmapRepository>,
        generator: Option<Arc<dyn RoadmapGenerator>>,
    ) -> Self {
        Self {
            clock,
            cache,
            generator,
        }
    }

    /// Return the cached roadmap, generating and caching one if none exists.
    ///
    /// # Errors
    ///
    /// Returns `RoadmapServiceError::Offline` on a cache miss without a generator,
    /// or any error from `regenerate`.
    pub async fn load(&self, skill: &SkillName) -> Result<Roadmap, RoadmapServiceError> {
        if let Some(cached) = self.cache.get_roadmap(skill).await? {
            debug!(%skill, steps = cached.roadmap.len(), "using cached roadmap");
            return Ok(cached.roadmap);
        }
        self.regenerate(skill).await
    }

    /// Generate a fresh roadmap and replace the cached one.
    ///
    /// # Errors
    ///
    /// Returns `Offline` without a generator, `Empty` if the server returns no
    /// steps, `Api` on request failures, or `Storage` if caching fails.
    pub async fn regenerate(&self, skill: &SkillName) -> Result<Roadmap, RoadmapServiceError> {
        let generator = self
            .generator
            .as_ref()
            .ok_or(RoadmapServiceError::Offline)?;
        let roadmap = generator.generate_roadmap(skill).await?;
        if roadmap.is_empty() {
            return Err(RoadmapServiceError::Empty);
        }
        self.cache
            .save_roadmap(skill, &roadmap, self.clock.now())
            .await?;
        info!(%skill, steps = roadmap.len(), "generated roadmap");
        Ok(roadmap)
    }
}
