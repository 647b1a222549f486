//! Topic progress and accessibility resolution.
//!
//! Everything here is pure: callers pass the roadmap and progress they hold and
//! get derived state back. Malformed input never errors; it falls back to
//! "not started" and "locked", except for the first step which is always open.

use serde_json::Value;

use crate::model::{
    ProgressMap, ProgressRecord, RawProgressMap, Roadmap, TopicKey, TopicProgress, TopicStatus,
};

/// Classify a single progress record.
#[must_use]
pub fn classify(record: Option<&ProgressRecord>) -> TopicStatus {
    record.map_or(TopicStatus::NotStarted, ProgressRecord::status)
}

/// Whether the step at `index` can be opened.
///
/// The first step is always open; any other step opens once the step before it
/// is completed. A step whose predecessor is missing is locked.
#[must_use]
pub fn is_accessible(index: usize, roadmap: &Roadmap, progress: &ProgressMap) -> bool {
    if index == 0 {
        return true;
    }
    roadmap
        .get(index - 1)
        .is_some_and(|previous| progress.status_of(previous.key().as_str()).is_completed())
}

/// Resolve a single record into its canonical structured form.
#[must_use]
pub fn normalize_record(record: &ProgressRecord) -> TopicProgress {
    record.to_topic_progress()
}

/// Canonicalize a raw progress map.
///
/// Keys are reduced to topic keys; records whose keys collapse onto the same
/// topic are merged.
#[must_use]
pub fn normalize(raw: &RawProgressMap) -> ProgressMap {
    raw.iter()
        .map(|(label, record)| (TopicKey::from_label(label), normalize_record(record)))
        .collect()
}

/// Canonicalize progress straight from JSON. Anything but an object yields an empty map.
#[must_use]
pub fn normalize_value(value: &Value) -> ProgressMap {
    match value {
        Value::Object(object) => object
            .iter()
            .map(|(label, value)| {
                (
                    TopicKey::from_label(label),
                    ProgressRecord::from_value(value).into_topic_progress(),
                )
            })
            .collect(),
        _ => ProgressMap::new(),
    }
}

/// Derived display state of one roadmap step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepState {
    pub index: usize,
    pub key: TopicKey,
    pub label: String,
    pub description: Option<String>,
    pub status: TopicStatus,
    pub accessible: bool,
}

/// Derive status and accessibility for every step of a roadmap.
#[must_use]
pub fn derive_steps(roadmap: &Roadmap, progress: &ProgressMap) -> Vec<StepState> {
    let mut previous_completed = true;
    roadmap
        .iter()
        .enumerate()
        .map(|(index, step)| {
            let key = step.key();
            let status = progress.status_of(key.as_str());
            let accessible = index == 0 || previous_completed;
            previous_completed = status.is_completed();
            StepState {
                index,
                key,
                label: step.label().to_owned(),
                description: step.description().map(str::to_owned),
                status,
                accessible,
            }
        })
        .collect()
}

/// First step the learner can open that is not yet completed.
#[must_use]
pub fn next_step(steps: &[StepState]) -> Option<&StepState> {
    steps
        .iter()
        .find(|step| step.accessible && !step.status.is_completed())
}

/// Aggregate counts over derived steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoadmapSummary {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub not_started: usize,
}

impl RoadmapSummary {
    #[must_use]
    pub fn from_steps(steps: &[StepState]) -> Self {
        steps.iter().fold(
            Self {
                total: steps.len(),
                ..Self::default()
            },
            |mut summary, step| {
                match step.status {
                    TopicStatus::Completed => summary.completed += 1,
                    TopicStatus::InProgress => summary.in_progress += 1,
                    TopicStatus::NotStarted => summary.not_started += 1,
                }
                summary
            },
        )
    }

    /// Whole percent of completed steps, rounded down. An empty roadmap is 0%.
    #[must_use]
    pub fn percent_complete(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let percent = self.completed * 100 / self.total;
        u8::try_from(percent).unwrap_or(100)
    }
}
