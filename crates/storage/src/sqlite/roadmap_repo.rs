use async_trait::async_trait;
use chrono::{DateTime, Utc};
use skills_core::model::{Roadmap, SkillName};

use super::SqliteRepository;
use super::mapping::{map_roadmap_row, ser};
use crate::repository::{CachedRoadmap, RoadmapRepository, StorageError};

#[async_trait]
impl RoadmapRepository for SqliteRepository {
    async fn get_roadmap(&self, skill: &SkillName) -> Result<Option<CachedRoadmap>, StorageError> {
        let row = sqlx::query("SELECT steps, generated_at FROM roadmaps WHERE skill = ?1")
            .bind(skill.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        row.as_ref().map(map_roadmap_row).transpose()
    }

    async fn save_roadmap(
        &self,
        skill: &SkillName,
        roadmap: &Roadmap,
        generated_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let steps = serde_json::to_string(roadmap).map_err(ser)?;
        sqlx::query(
            r"
            INSERT INTO roadmaps (skill, steps, generated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(skill) DO UPDATE SET
                steps = excluded.steps,
                generated_at = excluded.generated_at
            ",
        )
        .bind(skill.as_str())
        .bind(steps)
        .bind(generated_at)
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;
        Ok(())
    }
}
