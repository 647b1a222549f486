use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, load_learner_state, view_state_from_resource};
use crate::vm::{TopicDetailVm, map_topic_detail};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SaveState {
    Idle,
    Saving,
    Error(ViewError),
}

/// Opens one roadmap step. Visiting an unlocked step records it as viewed.
#[component]
pub fn TopicView(index: usize) -> Element {
    let ctx = use_context::<AppContext>();
    let mut save_state = use_signal(|| SaveState::Idle);

    let resource = {
        let ctx = ctx.clone();
        use_resource(use_reactive((&index,), move |(index,)| {
            let ctx = ctx.clone();
            async move {
                let mut state = load_learner_state(&ctx).await?;
                ctx.progress_service()
                    .open_step(&ctx.skill(), &state.roadmap, &mut state.progress, index)
                    .await?;
                map_topic_detail(&state.roadmap, &state.progress, index)
                    .ok_or(ViewError::NotFound)
            }
        }))
    };

    let state = view_state_from_resource(resource);

    let complete = move |_: MouseEvent| {
        if save_state() == SaveState::Saving {
            return;
        }
        let ctx = ctx.clone();
        let mut resource = resource;
        spawn(async move {
            save_state.set(SaveState::Saving);
            let result = async {
                let mut learner = load_learner_state(&ctx).await?;
                let key = learner
                    .roadmap
                    .get(index)
                    .map(|step| step.key())
                    .ok_or(ViewError::NotFound)?;
                ctx.progress_service()
                    .mark_completed(&ctx.skill(), &mut learner.progress, &key)
                    .await?;
                Ok::<(), ViewError>(())
            }
            .await;
            match result {
                Ok(()) => {
                    save_state.set(SaveState::Idle);
                    resource.restart();
                }
                Err(err) => save_state.set(SaveState::Error(err)),
            }
        });
    };

    rsx! {
        div { class: "page",
            Link { class: "back-link", to: Route::Roadmap {}, "Back to roadmap" }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(detail) => rsx! {
                    TopicDetail { detail: detail.clone() }
                    if detail.can_complete {
                        button {
                            class: "btn btn-primary",
                            disabled: save_state() == SaveState::Saving,
                            onclick: complete,
                            "Mark complete"
                        }
                    }
                    if let SaveState::Error(err) = save_state() {
                        p { class: "error", "{err.message()}" }
                    }
                    if let Some(next) = detail.next_index {
                        Link { class: "next-link", to: Route::Topic { index: next }, "Next topic" }
                    }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "error", "{err.message()}" }
                },
            }
        }
    }
}

#[component]
fn TopicDetail(detail: TopicDetailVm) -> Element {
    rsx! {
        section { class: "topic-detail",
            h2 { "{detail.title}" }
            if let Some(description) = detail.description.clone() {
                p { class: "topic-description", "{description}" }
            }
            dl { class: "topic-facts",
                dt { "Status" }
                dd { class: "topic-status {detail.status}", "{detail.status_label}" }
                if let Some(viewed) = detail.last_viewed.clone() {
                    dt { "Last viewed" }
                    dd { "{viewed}" }
                }
                if let Some(completed) = detail.completed_at.clone() {
                    dt { "Completed" }
                    dd { "{completed}" }
                }
                dt { "Quiz score" }
                dd { "{detail.quiz_score}" }
                dt { "Code score" }
                dd { "{detail.code_score}" }
            }
        }
    }
}
