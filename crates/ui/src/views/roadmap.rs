use dioxus::prelude::*;
use dioxus_router::use_navigator;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewState, load_learner_state, view_state_from_resource};
use crate::vm::{RoadmapStepVm, RoadmapSummaryVm, map_roadmap_steps, map_roadmap_summary};

#[derive(Clone, Debug, PartialEq)]
struct RoadmapData {
    steps: Vec<RoadmapStepVm>,
    summary: RoadmapSummaryVm,
}

#[component]
pub fn RoadmapView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();

    let resource = use_resource(move || {
        let ctx = ctx.clone();
        async move {
            let state = load_learner_state(&ctx).await?;
            Ok(RoadmapData {
                steps: map_roadmap_steps(&state.roadmap, &state.progress),
                summary: map_roadmap_summary(&state.roadmap, &state.progress),
            })
        }
    });

    let state = view_state_from_resource(resource);
    let open_step = move |index: usize| {
        navigator.push(Route::Topic { index });
    };

    rsx! {
        div { class: "page",
            h2 { "Roadmap" }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(data) => rsx! {
                    p { class: "roadmap-summary", "{data.summary.headline}" }
                    if let Some(next) = data.summary.next_title.clone() {
                        p { class: "roadmap-next", "Up next: {next}" }
                    }
                    RoadmapWorm { steps: data.steps, on_select: open_step }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                    button {
                        class: "btn",
                        onclick: move |_| {
                            let mut resource = resource;
                            resource.restart();
                        },
                        "Retry"
                    }
                },
            }
        }
    }
}

#[derive(Props, Clone, PartialEq)]
pub struct RoadmapWormProps {
    pub steps: Vec<RoadmapStepVm>,
    #[props(default)]
    pub on_select: Option<EventHandler<usize>>,
}

/// Vertical chain of roadmap nodes. Locked nodes render disabled.
#[component]
pub fn RoadmapWorm(props: RoadmapWormProps) -> Element {
    if props.steps.is_empty() {
        return rsx! {
            p { class: "roadmap-empty", "This roadmap has no topics yet." }
        };
    }

    rsx! {
        ol { class: "roadmap-worm",
            for step in props.steps {
                StepNode { key: "{step.index}", step, on_select: props.on_select }
            }
        }
    }
}

#[component]
fn StepNode(step: RoadmapStepVm, on_select: Option<EventHandler<usize>>) -> Element {
    let index = step.index;
    let locked = !step.accessible;

    rsx! {
        li { class: "{step.css_class}",
            button {
                class: "roadmap-node-button",
                disabled: locked,
                onclick: move |_| {
                    if let Some(handler) = on_select {
                        handler.call(index);
                    }
                },
                span { class: "roadmap-node-number", "{step.number}" }
                span { class: "roadmap-node-title", "{step.title}" }
                span { class: "roadmap-node-status", "{step.status_label}" }
            }
            if let Some(description) = step.description.clone() {
                p { class: "roadmap-node-description", "{description}" }
            }
        }
    }
}
