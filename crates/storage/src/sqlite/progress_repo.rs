use async_trait::async_trait;
use skills_core::model::{ProgressMap, SkillName, TopicKey, TopicProgress};

use super::SqliteRepository;
use super::mapping::{extra_to_json, map_topic_row};
use crate::repository::{ProgressRepository, StorageError};

const UPSERT_TOPIC: &str = r"
    INSERT INTO topic_progress (
        skill,
        topic,
        viewed,
        completed,
        last_viewed,
        completed_at,
        quiz_score,
        code_score,
        extra
    )
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
    ON CONFLICT(skill, topic) DO UPDATE SET
        viewed = excluded.viewed,
        completed = excluded.completed,
        last_viewed = excluded.last_viewed,
        completed_at = excluded.completed_at,
        quiz_score = excluded.quiz_score,
        code_score = excluded.code_score,
        extra = excluded.extra
";

fn upsert_query<'q>(
    skill: &'q SkillName,
    key: &'q TopicKey,
    progress: &'q TopicProgress,
    extra: String,
) -> sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>> {
    sqlx::query(UPSERT_TOPIC)
        .bind(skill.as_str())
        .bind(key.as_str())
        .bind(progress.viewed())
        .bind(progress.completed())
        .bind(progress.last_viewed())
        .bind(progress.completed_at())
        .bind(progress.quiz_score())
        .bind(progress.code_score())
        .bind(extra)
}

#[async_trait]
impl ProgressRepository for SqliteRepository {
    async fn load_progress(&self, skill: &SkillName) -> Result<ProgressMap, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT topic, viewed, completed, last_viewed, completed_at, quiz_score, code_score, extra
            FROM topic_progress
            WHERE skill = ?1
            ORDER BY topic
            ",
        )
        .bind(skill.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        rows.iter()
            .map(map_topic_row)
            .collect::<Result<ProgressMap, StorageError>>()
    }

    async fn save_topic(
        &self,
        skill: &SkillName,
        key: &TopicKey,
        progress: &TopicProgress,
    ) -> Result<(), StorageError> {
        let extra = extra_to_json(progress)?;
        upsert_query(skill, key, progress, extra)
            .execute(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;
        Ok(())
    }

    async fn save_progress(
        &self,
        skill: &SkillName,
        progress: &ProgressMap,
    ) -> Result<(), StorageError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        for (key, topic) in progress.iter() {
            let extra = extra_to_json(topic)?;
            upsert_query(skill, key, topic, extra)
                .execute(&mut *tx)
                .await
                .map_err(|err| StorageError::Connection(err.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;
        Ok(())
    }
}
