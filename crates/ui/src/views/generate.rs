use dioxus::prelude::*;
use dioxus_router::use_navigator;

use quizdesk_core::model::{QuizGeneratePayload, SubjectId};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};

#[component]
pub fn GenerateView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let mut selected = use_signal(Vec::<u64>::new);
    let mut max_questions = use_signal(|| String::from("10"));
    let mut with_duration = use_signal(|| false);
    let mut duration = use_signal(|| String::from("15"));
    let mut busy = use_signal(|| false);
    let mut error = use_signal(|| None::<&'static str>);

    let subjects_for_resource = ctx.subjects();
    let resource = use_resource(move || {
        let subjects = subjects_for_resource.clone();
        async move {
            subjects
                .list(None)
                .await
                .map_err(|_| ViewError::Unknown)
        }
    });
    let state = view_state_from_resource(&resource);

    // Live count of questions available for the current selection.
    let quizzes_for_count = ctx.quizzes();
    let count_resource = use_resource(move || {
        let quizzes = quizzes_for_count.clone();
        let subject_ids = selected().iter().map(|id| SubjectId::new(*id)).collect::<Vec<_>>();
        async move {
            if subject_ids.is_empty() {
                return Ok::<_, ViewError>(0);
            }
            quizzes
                .question_count(&subject_ids)
                .await
                .map_err(|_| ViewError::Unknown)
        }
    });
    let available = count_resource
        .value()
        .read()
        .as_ref()
        .and_then(|value| value.as_ref().ok())
        .copied()
        .unwrap_or(0);

    let on_generate = move |_| {
        if busy() {
            return;
        }
        let subject_ids = selected().iter().map(|id| SubjectId::new(*id)).collect::<Vec<_>>();
        if subject_ids.is_empty() {
            error.set(Some("Pick at least one subject."));
            return;
        }
        let Ok(max) = max_questions().trim().parse::<u32>() else {
            error.set(Some("Question count must be a number."));
            return;
        };
        let timed = with_duration();
        let minutes = if timed {
            match duration().trim().parse::<u32>() {
                Ok(minutes) => Some(minutes),
                Err(_) => {
                    error.set(Some("Duration must be a number of minutes."));
                    return;
                }
            }
        } else {
            None
        };

        let quizzes = ctx.quizzes();
        let nav = navigator;
        spawn(async move {
            busy.set(true);
            error.set(None);
            let payload = QuizGeneratePayload {
                subject_ids,
                max_questions: max,
                with_duration: timed,
                duration: minutes,
            };
            match quizzes.generate(&payload).await {
                Ok(session) => {
                    let _ = nav.push(Route::Session {
                        quiz_id: session.id.value(),
                    });
                }
                Err(_) => error.set(Some("Could not generate a quiz. Please try again.")),
            }
            busy.set(false);
        });
    };

    rsx! {
        div { class: "page",
            header { class: "view-header",
                h2 { class: "view-title", "New quiz" }
                p { class: "view-subtitle", "Pick subjects and how many questions you want." }
            }
            if let Some(message) = error() {
                p { class: "form-error", "{message}" }
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
                },
                ViewState::Ready(subjects) => {
                    let checkboxes = subjects.iter().map(|subject| {
                        let subject_id = subject.id.value();
                        let name = subject.name.clone();
                        let checked = selected().contains(&subject_id);
                        rsx! {
                            label { class: "subject-option",
                                input {
                                    r#type: "checkbox",
                                    checked,
                                    onchange: move |event| {
                                        let mut ids = selected();
                                        if event.checked() {
                                            if !ids.contains(&subject_id) {
                                                ids.push(subject_id);
                                            }
                                        } else {
                                            ids.retain(|id| *id != subject_id);
                                        }
                                        selected.set(ids);
                                    },
                                }
                                span { "{name}" }
                            }
                        }
                    });
                    rsx! {
                        div { class: "subject-list", {checkboxes} }
                        p { class: "available-count", "{available} questions available" }
                    }
                },
            }
            div { class: "generate-form",
                label { class: "field",
                    span { "Questions" }
                    input {
                        value: "{max_questions}",
                        oninput: move |event| max_questions.set(event.value()),
                    }
                }
                label { class: "field field-inline",
                    input {
                        r#type: "checkbox",
                        checked: with_duration(),
                        onchange: move |event| with_duration.set(event.checked()),
                    }
                    span { "Timed" }
                }
                if with_duration() {
                    label { class: "field",
                        span { "Minutes" }
                        input {
                            value: "{duration}",
                            oninput: move |event| duration.set(event.value()),
                        }
                    }
                }
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    disabled: busy(),
                    onclick: on_generate,
                    if busy() { "Generating..." } else { "Generate" }
                }
            }
        }
    }
}
