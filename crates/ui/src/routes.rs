use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::context::AppContext;
use crate::views::{RoadmapView, TopicView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", RoadmapView)] Roadmap {},
        #[route("/topic/:index", TopicView)] Topic { index: usize },
}

#[component]
fn Layout() -> Element {
    let ctx = use_context::<AppContext>();
    let skill = ctx.skill();

    rsx! {
        div { class: "app",
            header { class: "topbar",
                Link { class: "brand", to: Route::Roadmap {}, "Skills" }
                span { class: "skill-name", "{skill}" }
            }
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}
