#![forbid(unsafe_code)]

pub mod api;
pub mod app_services;
pub mod error;
pub mod progress_service;
pub mod roadmap_service;

pub use skills_core::Clock;

pub use api::{ApiConfig, HttpApiClient, ProgressRemote, RoadmapGenerator};
pub use app_services::AppServices;
pub use error::{ApiError, AppServicesError, ProgressServiceError, RoadmapServiceError};
pub use progress_service::ProgressService;
pub use roadmap_service::RoadmapService;
