#![forbid(unsafe_code)]

pub mod repository;
pub mod sqlite;

pub use repository::{
    CachedRoadmap, InMemoryRepository, ProgressRepository, RoadmapRepository, Storage,
    StorageError,
};
