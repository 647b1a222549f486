mod roadmap_vm;
mod time_fmt;
mod topic_vm;

pub use roadmap_vm::{RoadmapStepVm, RoadmapSummaryVm, map_roadmap_steps, map_roadmap_summary};
pub use time_fmt::format_timestamp;
pub use topic_vm::{TopicDetailVm, format_score, map_topic_detail};
