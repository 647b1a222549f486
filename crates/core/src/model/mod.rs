mod progress;
mod roadmap;
mod skill;

pub use progress::{
    ProgressError, ProgressMap, ProgressRecord, RawProgressMap, TopicProgress, TopicStatus,
};
pub use roadmap::{Roadmap, RoadmapStep, TopicKey};
pub use skill::{SkillName, SkillNameError};
