use skills_core::model::{ProgressMap, Roadmap, TopicStatus};
use skills_core::{derive_steps, is_accessible};

use super::roadmap_vm::status_label;
use super::time_fmt::format_timestamp;

/// Detail panel for a single roadmap step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopicDetailVm {
    pub index: usize,
    pub title: String,
    pub description: Option<String>,
    pub status: TopicStatus,
    pub status_label: &'static str,
    pub last_viewed: Option<String>,
    pub completed_at: Option<String>,
    pub quiz_score: String,
    pub code_score: String,
    pub can_complete: bool,
    pub next_index: Option<usize>,
}

/// Build the detail view for step `index`, or `None` if the roadmap has no such step.
#[must_use]
pub fn map_topic_detail(
    roadmap: &Roadmap,
    progress: &ProgressMap,
    index: usize,
) -> Option<TopicDetailVm> {
    let step = derive_steps(roadmap, progress).into_iter().nth(index)?;
    let topic = progress.get(step.key.as_str()).cloned().unwrap_or_default();
    let next = index + 1;
    let next_index =
        (next < roadmap.len() && is_accessible(next, roadmap, progress)).then_some(next);

    Some(TopicDetailVm {
        index,
        title: step.key.as_str().to_owned(),
        description: step.description,
        status: step.status,
        status_label: status_label(step.status),
        last_viewed: topic.last_viewed().map(format_timestamp),
        completed_at: topic.completed_at().map(format_timestamp),
        quiz_score: format_score(topic.quiz_score()),
        code_score: format_score(topic.code_score()),
        can_complete: step.accessible && !step.status.is_completed(),
        next_index,
    })
}

/// Scores are whole numbers in practice; show a dash until one is recorded.
#[must_use]
pub fn format_score(score: f64) -> String {
    if score <= 0.0 {
        "–".to_owned()
    } else if score.fract() == 0.0 {
        format!("{score:.0}")
    } else {
        format!("{score:.1}")
    }
}
