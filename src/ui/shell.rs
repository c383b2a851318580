use dioxus::prelude::*;

use crate::app::Route;
use crate::domain::AppState;
use crate::ui::theme;
use crate::util::version::APP_NAME;

#[component]
pub fn Shell(children: Element) -> Element {
    let state = use_context::<Signal<AppState>>();
    let current_route = use_route::<Route>();
    let nav = use_navigator();

    let (signed_in, username) = state.with(|st| {
        (
            st.session.is_authenticated(),
            st.session.user.as_ref().map(|user| user.username.clone()),
        )
    });
    let compared = state.with(|st| st.selection.filled().count());

    rsx! {
        div { class: "app",
            header { class: "app-header",
                div { class: "app-title",
                    h1 { "{APP_NAME}" }
                    if let Some(name) = username {
                        p { class: theme::TEXT_MUTED, "Signed in as {name}" }
                    }
                }
                nav { class: "app-nav",
                    NavButton {
                        active: matches!(current_route, Route::Compare {}),
                        onclick: move |_| { nav.push(Route::Compare {}); },
                        label: if compared > 0 { format!("Compare ({compared})") } else { "Compare".to_string() },
                    }
                    if signed_in {
                        NavButton {
                            active: matches!(current_route, Route::Dashboard {}),
                            onclick: move |_| { nav.push(Route::Dashboard {}); },
                            label: "Dashboard",
                        }
                        NavButton {
                            active: matches!(current_route, Route::AdminProjects {}),
                            onclick: move |_| { nav.push(Route::AdminProjects {}); },
                            label: "Projects",
                        }
                        NavButton {
                            active: matches!(current_route, Route::AdminPlaces {}),
                            onclick: move |_| { nav.push(Route::AdminPlaces {}); },
                            label: "Places",
                        }
                        NavButton {
                            active: matches!(current_route, Route::AdminPropertyTypes {}),
                            onclick: move |_| { nav.push(Route::AdminPropertyTypes {}); },
                            label: "Property types",
                        }
                        NavButton {
                            active: matches!(current_route, Route::AdminUsers {}),
                            onclick: move |_| { nav.push(Route::AdminUsers {}); },
                            label: "Users",
                        }
                    } else {
                        NavButton {
                            active: matches!(current_route, Route::Login {}),
                            onclick: move |_| { nav.push(Route::Login {}); },
                            label: "Log in",
                        }
                    }
                    NavButton {
                        active: matches!(current_route, Route::Settings {}),
                        onclick: move |_| { nav.push(Route::Settings {}); },
                        label: "Settings",
                    }
                }
            }
            main { class: "app-main", {children} }
        }
    }
}

/// Shell for pages behind the login. Anonymous visitors get a prompt instead
/// of the page body.
#[component]
pub fn AdminShell(children: Element) -> Element {
    let state = use_context::<Signal<AppState>>();
    let nav = use_navigator();
    let signed_in = state.with(|st| st.session.is_authenticated());

    rsx! {
        Shell {
            if signed_in {
                {children}
            } else {
                section { class: theme::PANEL,
                    h2 { class: theme::PANEL_TITLE, "Sign in required" }
                    p { class: theme::TEXT_MUTED, "The admin pages need an account." }
                    button {
                        class: theme::BTN_PRIMARY,
                        onclick: move |_| { nav.push(Route::Login {}); },
                        "Go to login"
                    }
                }
            }
        }
    }
}

#[component]
fn NavButton(active: bool, onclick: EventHandler<()>, label: String) -> Element {
    rsx! {
        button {
            class: theme::nav_button(active),
            onclick: move |_| onclick.call(()),
            "{label}"
        }
    }
}
