use dioxus::prelude::*;
use dioxus_router::use_navigator;

use quizdesk_core::model::QuizSession;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};

fn status_label(session: &QuizSession) -> &'static str {
    if session.is_closed {
        "Closed"
    } else if session.is_started() {
        "In progress"
    } else {
        "Not started"
    }
}

#[component]
pub fn QuizzesView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let mut search = use_signal(String::new);

    let quizzes_for_resource = ctx.quizzes();
    let resource = use_resource(move || {
        let quizzes = quizzes_for_resource.clone();
        async move {
            quizzes
                .list_sessions(None)
                .await
                .map_err(|_| ViewError::Unknown)
        }
    });
    let state = view_state_from_resource(&resource);
    let query = search().trim().to_lowercase();

    rsx! {
        div { class: "page",
            header { class: "view-header",
                h2 { class: "view-title", "My quizzes" }
                p { class: "view-subtitle", "Resume an open session or review a closed one." }
            }
            input {
                class: "search",
                placeholder: "Search quizzes",
                value: "{search}",
                oninput: move |event| search.set(event.value()),
            }
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                    button {
                        class: "btn btn-secondary",
                        r#type: "button",
                        onclick: move |_| {
                            let mut resource = resource;
                            resource.restart();
                        },
                        "Retry"
                    }
                },
                ViewState::Ready(sessions) => {
                    let visible = sessions
                        .iter()
                        .filter(|session| session.title.to_lowercase().contains(&query))
                        .cloned()
                        .collect::<Vec<_>>();
                    let empty_message = if sessions.is_empty() {
                        "No quizzes yet. Generate one to get started."
                    } else {
                        "No quizzes match that search."
                    };
                    let cards = visible.iter().map(|session| {
                        let nav = navigator;
                        let quiz_id = session.id.value();
                        let title = session.title.clone();
                        let status = status_label(session);
                        let count = session.question_count();
                        let closed = session.is_closed;
                        rsx! {
                            div { class: "quiz-card",
                                div { class: "quiz-card-text",
                                    h4 { "{title}" }
                                    p { class: "quiz-card-meta", "{count} questions · {status}" }
                                }
                                if !closed {
                                    button {
                                        class: "btn btn-primary",
                                        r#type: "button",
                                        onclick: move |_| {
                                            let _ = nav.push(Route::Session { quiz_id });
                                        },
                                        "Open"
                                    }
                                }
                            }
                        }
                    });
                    rsx! {
                        if visible.is_empty() {
                            p { class: "empty", "{empty_message}" }
                        }
                        div { class: "quiz-list", {cards} }
                    }
                },
            }
        }
    }
}
