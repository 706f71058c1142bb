use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable, use_navigator};

use crate::context::AppContext;
use crate::views::{GenerateView, LoginView, QuizzesView, SessionView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[route("/", LoginView)] Login {},
    #[layout(Layout)]
        #[route("/quizzes", QuizzesView)] Quizzes {},
        #[route("/generate", GenerateView)] Generate {},
        #[route("/quiz/:quiz_id", SessionView)] Session { quiz_id: u64 },
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let username = ctx
        .users()
        .current_user()
        .map(|me| me.display_name())
        .unwrap_or_default();

    rsx! {
        nav { class: "sidebar",
            h1 { "QuizDesk" }
            ul {
                li { Link { to: Route::Quizzes {}, "My quizzes" } }
                li { Link { to: Route::Generate {}, "New quiz" } }
            }
            div { class: "sidebar-footer",
                span { class: "sidebar-user", "{username}" }
                button {
                    class: "btn btn-link",
                    r#type: "button",
                    onclick: move |_| {
                        let auth = ctx.auth();
                        let nav = navigator;
                        spawn(async move {
                            auth.logout().await;
                            let _ = nav.push(Route::Login {});
                        });
                    },
                    "Sign out"
                }
            }
        }
    }
}
