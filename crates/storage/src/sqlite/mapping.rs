use serde_json::{Map, Value};
use skills_core::model::{Roadmap, TopicKey, TopicProgress};
use sqlx::Row;

use crate::repository::{CachedRoadmap, StorageError};

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn map_topic_row(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<(TopicKey, TopicProgress), StorageError> {
    let topic: String = row.try_get("topic").map_err(ser)?;
    let extra_json: String = row.try_get("extra").map_err(ser)?;
    let extra: Map<String, Value> = serde_json::from_str(&extra_json).map_err(ser)?;

    let progress = TopicProgress::from_persisted(
        row.try_get("viewed").map_err(ser)?,
        row.try_get("completed").map_err(ser)?,
        row.try_get("last_viewed").map_err(ser)?,
        row.try_get("completed_at").map_err(ser)?,
        row.try_get("quiz_score").map_err(ser)?,
        row.try_get("code_score").map_err(ser)?,
        extra,
    );
    Ok((TopicKey::from_label(&topic), progress))
}

pub(crate) fn extra_to_json(progress: &TopicProgress) -> Result<String, StorageError> {
    serde_json::to_string(progress.extra()).map_err(ser)
}

pub(crate) fn map_roadmap_row(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<CachedRoadmap, StorageError> {
    let steps: String = row.try_get("steps").map_err(ser)?;
    let roadmap: Roadmap = serde_json::from_str(&steps).map_err(ser)?;
    Ok(CachedRoadmap {
        roadmap,
        generated_at: row.try_get("generated_at").map_err(ser)?,
    })
}
