use dioxus::prelude::*;
use dioxus_router::use_navigator;

use services::error::{ApiError, AuthError};

use crate::context::AppContext;
use crate::routes::Route;

fn login_error_message(err: &AuthError) -> &'static str {
    match err {
        AuthError::Api(ApiError::Status { status, .. }) if status.as_u16() == 401 => {
            "Wrong username or password."
        }
        AuthError::Api(ApiError::Unreachable(_)) => "Cannot reach the server. Is it running?",
        _ => "Sign-in failed. Please try again.",
    }
}

#[component]
pub fn LoginView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();
    let mut username = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut remember = use_signal(|| false);
    let mut busy = use_signal(|| false);
    let mut error = use_signal(|| None::<String>);

    // One-shot attempt to pick up a persisted session.
    let auth_for_restore = ctx.auth();
    let restore = use_resource(move || {
        let auth = auth_for_restore.clone();
        async move { auth.restore_session().await.unwrap_or(None).is_some() }
    });
    use_effect(move || {
        if restore.value().read().as_ref() == Some(&true) {
            let _ = navigator.push(Route::Quizzes {});
        }
    });

    let on_submit = move |event: FormEvent| {
        event.prevent_default();
        if busy() {
            return;
        }
        let auth = ctx.auth();
        let preferences = ctx.preferences();
        let nav = navigator;
        let user = username().trim().to_string();
        let pass = password();
        let remember_flag = remember();
        spawn(async move {
            busy.set(true);
            error.set(None);
            match auth.login(&user, &pass, remember_flag).await {
                Ok(me) => {
                    if let Err(err) = preferences.sync_from_profile(&me).await {
                        tracing::warn!(error = %err, "failed to persist language preference");
                    }
                    let _ = nav.push(Route::Quizzes {});
                }
                Err(err) => error.set(Some(login_error_message(&err).to_string())),
            }
            busy.set(false);
        });
    };

    rsx! {
        div { class: "login-page",
            form { class: "login-card", onsubmit: on_submit,
                h2 { "Sign in" }
                if let Some(message) = error() {
                    p { class: "form-error", "{message}" }
                }
                label { class: "field",
                    span { "Username" }
                    input {
                        value: "{username}",
                        autofocus: true,
                        oninput: move |event| username.set(event.value()),
                    }
                }
                label { class: "field",
                    span { "Password" }
                    input {
                        r#type: "password",
                        value: "{password}",
                        oninput: move |event| password.set(event.value()),
                    }
                }
                label { class: "field field-inline",
                    input {
                        r#type: "checkbox",
                        checked: remember(),
                        onchange: move |event| remember.set(event.checked()),
                    }
                    span { "Stay signed in" }
                }
                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: busy(),
                    if busy() { "Signing in..." } else { "Sign in" }
                }
            }
        }
    }
}
