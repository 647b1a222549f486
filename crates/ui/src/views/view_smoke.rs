use dioxus::prelude::*;
use skills_core::model::{ProgressMap, TopicKey, TopicProgress, TopicStatus};
use skills_core::time::fixed_now;
use storage::repository::ProgressRepository;

use super::roadmap::RoadmapWormProps;
use super::test_harness::{ViewKind, setup_view_harness, test_roadmap};
use crate::views::RoadmapWorm;
use crate::vm::map_roadmap_steps;

fn completed() -> TopicProgress {
    let mut topic = TopicProgress::new();
    topic.mark_completed(fixed_now());
    topic
}

#[test]
fn roadmap_worm_marks_locked_steps_disabled() {
    let mut progress = ProgressMap::new();
    progress.insert(TopicKey::from_label("Ownership"), completed());
    let steps = map_roadmap_steps(&test_roadmap(), &progress);

    let mut dom = VirtualDom::new_with_props(
        RoadmapWorm,
        RoadmapWormProps {
            steps,
            on_select: None,
        },
    );
    dom.rebuild_in_place();
    let html = dioxus_ssr::render(&dom);

    assert!(html.contains("roadmap-node completed"), "missing completed node in {html}");
    assert!(html.contains("roadmap-node not-started\""), "missing open node in {html}");
    assert!(html.contains("roadmap-node not-started locked"), "missing locked node in {html}");
    assert!(html.contains("moves and borrows"), "missing description in {html}");
    assert!(html.contains("disabled"), "missing disabled button in {html}");
}

#[test]
fn roadmap_worm_renders_empty_message() {
    let mut dom = VirtualDom::new_with_props(
        RoadmapWorm,
        RoadmapWormProps {
            steps: Vec::new(),
            on_select: None,
        },
    );
    dom.rebuild_in_place();
    let html = dioxus_ssr::render(&dom);
    assert!(html.contains("no topics yet"), "missing empty state in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn roadmap_view_smoke_renders_summary() {
    let mut harness = setup_view_harness(ViewKind::Roadmap, Some(test_roadmap())).await;
    harness
        .storage
        .progress
        .save_topic(&harness.skill, &TopicKey::from_label("Ownership"), &completed())
        .await
        .expect("seed progress");

    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("1 of 3 topics completed (33%)"), "missing summary in {html}");
    assert!(html.contains("Up next: Traits"), "missing next step in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn roadmap_view_smoke_renders_offline_error() {
    let mut harness = setup_view_harness(ViewKind::Roadmap, None).await;
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("server is not configured"), "missing offline error in {html}");
    assert!(html.contains("Retry"), "missing retry in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn topic_view_smoke_marks_first_step_viewed() {
    let mut harness = setup_view_harness(ViewKind::Topic(0), Some(test_roadmap())).await;
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Ownership"), "missing title in {html}");
    assert!(html.contains("In progress"), "missing status in {html}");
    assert!(html.contains("Mark complete"), "missing action in {html}");

    let stored = harness
        .storage
        .progress
        .load_progress(&harness.skill)
        .await
        .expect("load progress");
    assert_eq!(stored.status_of("Ownership"), TopicStatus::InProgress);
}

#[tokio::test(flavor = "current_thread")]
async fn topic_view_smoke_refuses_locked_step() {
    let mut harness = setup_view_harness(ViewKind::Topic(1), Some(test_roadmap())).await;
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("Complete the previous topic"), "missing lock message in {html}");

    let stored = harness
        .storage
        .progress
        .load_progress(&harness.skill)
        .await
        .expect("load progress");
    assert!(stored.is_empty());
}
