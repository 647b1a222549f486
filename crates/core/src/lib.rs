#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod resolver;
pub mod time;

pub use error::Error;
pub use resolver::{
    RoadmapSummary, StepState, classify, derive_steps, is_accessible, next_step, normalize,
    normalize_record, normalize_value,
};
pub use time::Clock;
