mod roadmap;
mod state;
mod topic;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use roadmap::{RoadmapView, RoadmapWorm};
pub use state::{LearnerState, ViewError, ViewState, load_learner_state, view_state_from_resource};
pub use topic::TopicView;
