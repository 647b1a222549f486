use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::api::{ApiConfig, HttpApiClient, ProgressRemote, RoadmapGenerator};
use crate::error::AppServicesError;
use crate::progress_service::ProgressService;
use crate::roadmap_service::RoadmapService;

/// Assembles the app-facing services over one storage backend and an optional API.
#[derive(Clone)]
pub struct AppServices {
    progress: Arc<ProgressService>,
    roadmaps: Arc<RoadmapService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        api: Option<ApiConfig>,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, clock, api))
    }

    /// Wire services over an existing storage backend.
    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock, api: Option<ApiConfig>) -> Self {
        let client = api.map(|config| Arc::new(HttpApiClient::new(config)));
        let remote = client
            .clone()
            .map(|client| client as Arc<dyn ProgressRemote>);
        let generator = client.map(|client| client as Arc<dyn RoadmapGenerator>);

        let progress = Arc::new(ProgressService::new(
            clock,
            Arc::clone(&storage.progress),
            remote,
        ));
        let roadmaps = Arc::new(RoadmapService::new(
            clock,
            Arc::clone(&storage.roadmaps),
            generator,
        ));
        Self { progress, roadmaps }
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn roadmaps(&self) -> Arc<RoadmapService> {
        Arc::clone(&self.roadmaps)
    }
}
