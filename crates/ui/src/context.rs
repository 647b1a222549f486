use std::sync::Arc;

use services::{ProgressService, RoadmapService};
use skills_core::model::SkillName;

pub trait UiApp: Send + Sync {
    fn skill(&self) -> SkillName;

    fn progress_service(&self) -> Arc<ProgressService>;
    fn roadmap_service(&self) -> Arc<RoadmapService>;
}

#[derive(Clone)]
pub struct AppContext {
    skill: SkillName,
    progress: Arc<ProgressService>,
    roadmaps: Arc<RoadmapService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            skill: app.skill(),
            progress: app.progress_service(),
            roadmaps: app.roadmap_service(),
        }
    }

    #[must_use]
    pub fn skill(&self) -> SkillName {
        self.skill.clone()
    }

    #[must_use]
    pub fn progress_service(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    #[must_use]
    pub fn roadmap_service(&self) -> Arc<RoadmapService> {
        Arc::clone(&self.roadmaps)
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
