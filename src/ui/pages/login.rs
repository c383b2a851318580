use dioxus::prelude::*;
use tracing::info;

use crate::{
    app::{current_client, persist_user_state, report_api_error, set_client_token, ApiHandle, Route},
    domain::AppState,
    ui::{
        components::toast::{push_toast, ToastKind, ToastMessage},
        theme,
    },
};

#[component]
pub fn LoginPage() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let api = use_context::<ApiHandle>();
    let nav = use_navigator();

    let mut username = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut busy = use_signal(|| false);
    let mut error = use_signal(|| None::<String>);

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let (user, pass) = (username().trim().to_string(), password());
        if user.is_empty() || pass.is_empty() {
            error.set(Some("Enter a username and password.".to_string()));
            return;
        }
        let Some(client) = current_client(api, toasts) else {
            return;
        };
        error.set(None);
        busy.set(true);
        spawn(async move {
            match client.login(&user, &pass).await {
                Ok(token) => {
                    state.with_mut(|st| st.session.token = Some(token.clone()));
                    persist_user_state(&state);
                    set_client_token(api, Some(token));
                    if let Some(client) = api.peek().clone() {
                        match client.current_user().await {
                            Ok(me) => state.with_mut(|st| st.session.user = Some(me)),
                            Err(err) => report_api_error(state, toasts, api, "load profile", &err),
                        }
                    }
                    info!(username = %user, "signed in");
                    push_toast(toasts, ToastKind::Success, format!("Welcome back, {user}."));
                    password.set(String::new());
                    nav.push(Route::Dashboard {});
                }
                Err(err) => {
                    error.set(Some(err.to_string()));
                }
            }
            busy.set(false);
        });
    };

    rsx! {
        div { class: "page login-page",
            form { class: "{theme::PANEL} login-form", onsubmit: on_submit,
                h2 { class: theme::PANEL_TITLE, "Log in" }
                label { class: theme::LABEL, "Username" }
                input {
                    class: theme::INPUT,
                    autocomplete: "username",
                    value: username(),
                    oninput: move |evt| username.set(evt.value()),
                }
                label { class: theme::LABEL, "Password" }
                input {
                    class: theme::INPUT,
                    r#type: "password",
                    autocomplete: "current-password",
                    value: password(),
                    oninput: move |evt| password.set(evt.value()),
                }
                if let Some(message) = error() {
                    p { class: theme::FIELD_ERROR, "{message}" }
                }
                button {
                    class: theme::BTN_PRIMARY,
                    r#type: "submit",
                    disabled: busy(),
                    if busy() { "Signing in…" } else { "Log in" }
                }
            }
        }
    }
}
