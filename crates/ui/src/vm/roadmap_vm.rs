use skills_core::model::{ProgressMap, Roadmap, TopicStatus};
use skills_core::{RoadmapSummary, StepState, derive_steps, next_step};

/// UI-ready representation of one node of the roadmap worm.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoadmapStepVm {
    pub index: usize,
    pub number: usize,
    pub title: String,
    pub description: Option<String>,
    pub status: TopicStatus,
    pub status_label: &'static str,
    pub accessible: bool,
    pub css_class: String,
}

impl RoadmapStepVm {
    fn from_state(state: StepState) -> Self {
        let css_class = if state.accessible {
            format!("roadmap-node {}", state.status)
        } else {
            format!("roadmap-node {} locked", state.status)
        };
        Self {
            index: state.index,
            number: state.index + 1,
            title: state.key.as_str().to_owned(),
            description: state.description,
            status: state.status,
            status_label: status_label(state.status),
            accessible: state.accessible,
            css_class,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoadmapSummaryVm {
    pub completed: usize,
    pub total: usize,
    pub percent: u8,
    pub headline: String,
    pub next_index: Option<usize>,
    pub next_title: Option<String>,
}

#[must_use]
pub fn map_roadmap_steps(roadmap: &Roadmap, progress: &ProgressMap) -> Vec<RoadmapStepVm> {
    derive_steps(roadmap, progress)
        .into_iter()
        .map(RoadmapStepVm::from_state)
        .collect()
}

#[must_use]
pub fn map_roadmap_summary(roadmap: &Roadmap, progress: &ProgressMap) -> RoadmapSummaryVm {
    let steps = derive_steps(roadmap, progress);
    let summary = RoadmapSummary::from_steps(&steps);
    let next = next_step(&steps);
    RoadmapSummaryVm {
        completed: summary.completed,
        total: summary.total,
        percent: summary.percent_complete(),
        headline: format!(
            "{} of {} topics completed ({}%)",
            summary.completed,
            summary.total,
            summary.percent_complete()
        ),
        next_index: next.map(|step| step.index),
        next_title: next.map(|step| step.key.as_str().to_owned()),
    }
}

pub(crate) fn status_label(status: TopicStatus) -> &'static str {
    match status {
        TopicStatus::NotStarted => "Not started",
        TopicStatus::InProgress => "In progress",
        TopicStatus::Completed => "Completed",
    }
}
