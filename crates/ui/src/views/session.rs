use dioxus::prelude::*;
use dioxus_router::use_navigator;

use quizdesk_core::model::{OptionId, QuizId};
use services::NavIntent;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{NavPillVm, QuizIntent, QuizOutcome, QuizVm, format_timer, load_quiz};

/// Immutable snapshot of the vm, taken once per render.
#[derive(Clone, PartialEq)]
struct SessionRender {
    title: String,
    index: u32,
    total: u32,
    question_title: String,
    question_description: String,
    options: Vec<(OptionId, String, bool)>,
    pills: Vec<NavPillVm>,
    flagged: bool,
    can_submit: bool,
    has_next: bool,
    has_previous: bool,
    answered: u32,
    timer_label: Option<String>,
}

fn snapshot(vm: &QuizVm) -> Option<SessionRender> {
    let question = vm.current_question()?;
    let options = question
        .options_sorted()
        .into_iter()
        .filter_map(|option| {
            option
                .id
                .map(|id| (id, option.content.clone(), vm.is_selected(id)))
        })
        .collect();
    Some(SessionRender {
        title: vm.title().to_string(),
        index: vm.current_index(),
        total: vm.total(),
        question_title: question.title.clone(),
        question_description: question.description.clone(),
        options,
        pills: vm.pills(),
        flagged: vm.current_flagged(),
        can_submit: vm.can_submit(),
        has_next: vm.has_next(),
        has_previous: vm.has_previous(),
        answered: vm.progress().answered,
        timer_label: vm.timer().map(format_timer),
    })
}

#[component]
pub fn SessionView(quiz_id: u64) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let quiz_id = QuizId::new(quiz_id);
    let taking = ctx.quiz_taking();

    let error = use_signal(|| None::<ViewError>);
    let vm = use_signal(|| None::<QuizVm>);
    let saving = use_signal(|| false);
    let finished = use_signal(|| false);

    let taking_for_resource = taking.clone();
    let resource = use_resource(move || {
        let taking = taking_for_resource.clone();
        let mut vm = vm;
        async move {
            let loaded = load_quiz(&taking, quiz_id).await?;
            vm.set(Some(loaded));
            Ok::<_, ViewError>(())
        }
    });
    let state = view_state_from_resource(&resource);

    let dispatch = {
        let taking = taking.clone();
        use_callback(move |intent: QuizIntent| {
            let mut vm = vm;
            let mut error = error;
            let mut saving = saving;
            let mut finished = finished;
            match intent {
                QuizIntent::ToggleOption(option) => {
                    if let Some(vm) = vm.write().as_mut() {
                        vm.toggle_option(option);
                    }
                }
                QuizIntent::Jump(index) => {
                    if let Some(vm) = vm.write().as_mut() {
                        vm.jump(index);
                    }
                }
                QuizIntent::FlagCurrent => {
                    if let Some(vm) = vm.write().as_mut() {
                        vm.flag_current();
                    }
                }
                QuizIntent::Submit(direction) => {
                    if saving() {
                        return;
                    }
                    let taking = taking.clone();
                    let nav = navigator;
                    spawn(async move {
                        saving.set(true);
                        let taken = { vm.write().take() };
                        let Some(mut vm_value) = taken else {
                            error.set(Some(ViewError::Unknown));
                            saving.set(false);
                            return;
                        };
                        let result = vm_value.submit(&taking, direction).await;
                        // Put the session back so the screen stays usable
                        // even after a failed save.
                        {
                            *vm.write() = Some(vm_value);
                        }
                        saving.set(false);
                        match result {
                            Ok(_) => error.set(None),
                            Err(ViewError::SessionExpired) => {
                                let _ = nav.push(Route::Login {});
                            }
                            Err(err) => error.set(Some(err)),
                        }
                    });
                }
                QuizIntent::Finish => {
                    if saving() {
                        return;
                    }
                    let taking = taking.clone();
                    let nav = navigator;
                    spawn(async move {
                        saving.set(true);
                        let taken = { vm.write().take() };
                        let Some(mut vm_value) = taken else {
                            error.set(Some(ViewError::Unknown));
                            saving.set(false);
                            return;
                        };
                        let result = vm_value.finish(&taking).await;
                        {
                            *vm.write() = Some(vm_value);
                        }
                        saving.set(false);
                        match result {
                            Ok(QuizOutcome::Finished) => finished.set(true),
                            Ok(QuizOutcome::Continue) => {}
                            Err(ViewError::SessionExpired) => {
                                let _ = nav.push(Route::Login {});
                            }
                            Err(err) => error.set(Some(err)),
                        }
                    });
                }
            }
        })
    };

    let render = vm.read().as_ref().and_then(snapshot);

    rsx! {
        div { class: "page session-page",
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                    if err == ViewError::SessionExpired {
                        button {
                            class: "btn btn-primary",
                            r#type: "button",
                            onclick: move |_| {
                                let _ = navigator.push(Route::Login {});
                            },
                            "Sign in"
                        }
                    }
                },
                ViewState::Ready(()) => {
                    if finished() {
                        let answered = render.as_ref().map_or(0, |data| data.answered);
                        let total = render.as_ref().map_or(0, |data| data.total);
                        rsx! {
                            div { class: "session-complete",
                                h2 { "Quiz submitted" }
                                p { "You answered {answered} of {total} questions." }
                                button {
                                    class: "btn btn-primary",
                                    r#type: "button",
                                    onclick: move |_| {
                                        let _ = navigator.push(Route::Quizzes {});
                                    },
                                    "Back to quizzes"
                                }
                            }
                        }
                    } else if let Some(data) = render.clone() {
                        let option_rows = data.options.iter().map(|(id, content, checked)| {
                            let option_id = *id;
                            let content = content.clone();
                            let checked = *checked;
                            rsx! {
                                label { class: if checked { "option option-selected" } else { "option" },
                                    input {
                                        r#type: "checkbox",
                                        checked,
                                        onchange: move |_| dispatch(QuizIntent::ToggleOption(option_id)),
                                    }
                                    span { "{content}" }
                                }
                            }
                        });
                        let pill_buttons = data.pills.iter().map(|pill| {
                            let index = pill.index;
                            let mut class = String::from("pill");
                            if pill.answered {
                                class.push_str(" pill-answered");
                            }
                            if pill.flagged {
                                class.push_str(" pill-flagged");
                            }
                            if pill.current {
                                class.push_str(" pill-current");
                            }
                            rsx! {
                                button {
                                    class: "{class}",
                                    r#type: "button",
                                    onclick: move |_| dispatch(QuizIntent::Jump(index)),
                                    "{index}"
                                }
                            }
                        });
                        rsx! {
                            header { class: "view-header",
                                h2 { class: "view-title", "{data.title}" }
                                p { class: "view-subtitle",
                                    "Question {data.index} of {data.total}"
                                    if let Some(timer) = data.timer_label.as_ref() {
                                        " · {timer}"
                                    }
                                }
                            }
                            div { class: "pill-strip", {pill_buttons} }
                            if let Some(err) = error() {
                                p { class: "form-error", "{err.message()}" }
                            }
                            section { class: "question-panel",
                                h3 { "{data.question_title}" }
                                if !data.question_description.is_empty() {
                                    p { class: "question-description", "{data.question_description}" }
                                }
                                div { class: "option-list", {option_rows} }
                            }
                            footer { class: "session-actions",
                                button {
                                    class: "btn btn-secondary",
                                    r#type: "button",
                                    disabled: !data.has_previous || saving(),
                                    onclick: move |_| dispatch(QuizIntent::Submit(NavIntent::Previous)),
                                    "Previous"
                                }
                                button {
                                    class: if data.flagged { "btn btn-flag btn-flag-on" } else { "btn btn-flag" },
                                    r#type: "button",
                                    onclick: move |_| dispatch(QuizIntent::FlagCurrent),
                                    if data.flagged { "Unflag" } else { "Flag for review" }
                                }
                                if data.has_next {
                                    button {
                                        class: "btn btn-primary",
                                        r#type: "button",
                                        disabled: !data.can_submit || saving(),
                                        onclick: move |_| dispatch(QuizIntent::Submit(NavIntent::Next)),
                                        if saving() { "Saving..." } else { "Save & next" }
                                    }
                                } else {
                                    button {
                                        class: "btn btn-primary",
                                        r#type: "button",
                                        disabled: !data.can_submit || saving(),
                                        onclick: move |_| dispatch(QuizIntent::Submit(NavIntent::Stay)),
                                        if saving() { "Saving..." } else { "Save" }
                                    }
                                    button {
                                        class: "btn btn-primary",
                                        r#type: "button",
                                        disabled: saving(),
                                        onclick: move |_| dispatch(QuizIntent::Finish),
                                        "Submit quiz"
                                    }
                                }
                            }
                        }
                    } else {
                        rsx! {
                            p { "{ViewError::EmptyQuiz.message()}" }
                        }
                    }
                },
            }
        }
    }
}
