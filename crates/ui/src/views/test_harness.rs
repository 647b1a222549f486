use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use services::{Clock, ProgressService, RoadmapService};
use skills_core::model::{Roadmap, SkillName};
use skills_core::time::fixed_now;
use storage::repository::{RoadmapRepository, Storage};

use crate::context::{UiApp, build_app_context};
use crate::views::{RoadmapView, TopicView};

#[derive(Clone)]
struct TestApp {
    skill: SkillName,
    progress: Arc<ProgressService>,
    roadmaps: Arc<RoadmapService>,
}

impl UiApp for TestApp {
    fn skill(&self) -> SkillName {
        self.skill.clone()
    }

    fn progress_service(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }

    fn roadmap_service(&self) -> Arc<RoadmapService> {
        Arc::clone(&self.roadmaps)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Roadmap,
    Topic(usize),
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Roadmap => rsx! { RoadmapView {} },
        ViewKind::Topic(index) => rsx! { TopicView { index } },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub storage: Storage,
    pub skill: SkillName,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        for _ in 0..4 {
            let _ = tokio::time::timeout(
                std::time::Duration::from_millis(50),
                self.dom.wait_for_work(),
            )
            .await;
            self.dom.render_immediate(&mut NoOpMutations);
            self.dom.process_events();
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn test_roadmap() -> Roadmap {
    Roadmap::from_labels([
        "Ownership: moves and borrows",
        "Traits: shared behaviour",
        "Async",
    ])
}

/// Offline harness over in-memory storage. `roadmap` is cached before the first render.
pub async fn setup_view_harness(view: ViewKind, roadmap: Option<Roadmap>) -> ViewHarness {
    let storage = Storage::in_memory();
    let skill = SkillName::new("Rust").expect("valid skill");
    if let Some(roadmap) = roadmap {
        storage
            .roadmaps
            .save_roadmap(&skill, &roadmap, fixed_now())
            .await
            .expect("seed roadmap");
    }

    let clock = Clock::fixed(fixed_now());
    let app = Arc::new(TestApp {
        skill: skill.clone(),
        progress: Arc::new(ProgressService::new(
            clock,
            Arc::clone(&storage.progress),
            None,
        )),
        roadmaps: Arc::new(RoadmapService::new(
            clock,
            Arc::clone(&storage.roadmaps),
            None,
        )),
    });

    let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { app, view });

    ViewHarness {
        dom,
        storage,
        skill,
    }
}
