use dioxus::prelude::*;
use services::{ProgressServiceError, RoadmapServiceError};
use skills_core::model::{ProgressMap, Roadmap};

use crate::context::AppContext;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    Unknown,
    Offline,
    Locked,
    NotFound,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            ViewError::Unknown => "Something went wrong. Please try again.",
            ViewError::Offline => "No roadmap is cached yet and the server is not configured.",
            ViewError::Locked => "Complete the previous topic to unlock this one.",
            ViewError::NotFound => "This topic is not part of the roadmap.",
        }
    }
}

impl From<RoadmapServiceError> for ViewError {
    fn from(err: RoadmapServiceError) -> Self {
        match err {
            RoadmapServiceError::Offline => ViewError::Offline,
            _ => ViewError::Unknown,
        }
    }
}

impl From<ProgressServiceError> for ViewError {
    fn from(err: ProgressServiceError) -> Self {
        match err {
            ProgressServiceError::Locked { .. } => ViewError::Locked,
            ProgressServiceError::UnknownStep { .. } => ViewError::NotFound,
            _ => ViewError::Unknown,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(*err),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}

/// Roadmap and progress for the current skill, as every view needs them.
#[derive(Clone, Debug, PartialEq)]
pub struct LearnerState {
    pub roadmap: Roadmap,
    pub progress: ProgressMap,
}

pub async fn load_learner_state(ctx: &AppContext) -> Result<LearnerState, ViewError> {
    let skill = ctx.skill();
    let roadmap = ctx.roadmap_service().load(&skill).await?;
    let progress = ctx.progress_service().load(&skill).await?;
    Ok(LearnerState { roadmap, progress })
}
