use std::time::SystemTime;

use dioxus::prelude::*;
use tracing::{info, warn};

use crate::{
    app::{load_catalogue, persist_user_state, rebuild_client, set_client_token, ApiHandle},
    config::normalize_base_url,
    domain::AppState,
    infra::cache::clear_projects_cache,
    ui::{
        components::toast::{push_toast, ToastKind, ToastMessage},
        theme,
    },
    util::version::version_label,
};

#[component]
pub fn SettingsPage() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let api = use_context::<ApiHandle>();

    let initial_url = state.with(|st| st.settings.api_base_url.clone().unwrap_or_default());
    let mut base_url_input = use_signal(|| initial_url);

    let active_url = api.with(|client| {
        client
            .as_ref()
            .map(|c| c.base_url().to_string())
            .unwrap_or_else(|| "unavailable".to_string())
    });
    let highlight_enabled = state.with(|st| st.settings.highlight_enabled);
    let signed_in_as = state.with(|st| {
        st.session.is_authenticated().then(|| {
            st.session
                .user
                .as_ref()
                .map(|user| user.username.clone())
                .unwrap_or_else(|| "unknown user".to_string())
        })
    });

    let cache_entries = state.with(|st| {
        let mut entries: Vec<(String, String)> = st
            .cache
            .iter()
            .map(|(resource, time)| (resource.label(), humanize_age(*time)))
            .collect();
        entries.sort();
        entries
    });

    let on_apply_url = move |_| {
        let raw = base_url_input().trim().to_string();
        let override_url = if raw.is_empty() {
            None
        } else {
            match normalize_base_url(&raw) {
                Ok(url) => Some(url.to_string()),
                Err(err) => {
                    push_toast(toasts, ToastKind::Error, format!("Invalid URL: {err}"));
                    return;
                }
            }
        };
        info!(override_url = ?override_url, "backend url changed");
        state.with_mut(|st| {
            st.settings.api_base_url = override_url;
            st.cache.clear();
            st.selection.clear();
        });
        persist_user_state(&state);
        rebuild_client(state, api);
        push_toast(toasts, ToastKind::Success, "Backend URL updated.");
        spawn(async move {
            load_catalogue(state, toasts, api, true).await;
        });
    };

    let on_toggle_highlight = move |_| {
        state.with_mut(|st| st.settings.highlight_enabled = !st.settings.highlight_enabled);
        persist_user_state(&state);
    };

    let on_clear_cache = move |_| {
        state.with_mut(|st| st.cache.clear());
        if let Err(err) = clear_projects_cache() {
            warn!(%err, "failed to remove project cache file");
        }
        if let Some(client) = api.peek().clone() {
            spawn(async move {
                client.clear_cache().await;
            });
        }
        push_toast(
            toasts,
            ToastKind::Info,
            "Cleared caches. Data will refresh on next fetch.",
        );
    };

    let on_sign_out = move |_| {
        state.with_mut(|st| st.session.sign_out());
        persist_user_state(&state);
        set_client_token(api, None);
        push_toast(toasts, ToastKind::Info, "Signed out.");
    };

    rsx! {
        div { class: "page settings-page",
            section { class: theme::PANEL,
                h2 { class: theme::PANEL_TITLE, "Backend" }
                p { class: theme::TEXT_MUTED, "Active: {active_url}" }
                label { class: theme::LABEL, "Base URL override" }
                input {
                    class: theme::INPUT,
                    placeholder: "Leave blank to use the configured default",
                    value: base_url_input(),
                    oninput: move |evt| base_url_input.set(evt.value()),
                }
                div { class: "dialog-actions",
                    button { class: theme::BTN_PRIMARY, onclick: on_apply_url, "Apply" }
                }
            }

            section { class: theme::PANEL,
                h2 { class: theme::PANEL_TITLE, "Comparison" }
                label { class: "toggle",
                    input {
                        r#type: "checkbox",
                        checked: highlight_enabled,
                        onchange: on_toggle_highlight,
                    }
                    " Highlight best and worst values"
                }
            }

            section { class: theme::PANEL,
                h2 { class: theme::PANEL_TITLE, "Cache status" }
                if cache_entries.is_empty() {
                    p { class: theme::TEXT_MUTED, "No cached fetches yet." }
                } else {
                    ul { class: "cache-list",
                        for (label, age) in cache_entries {
                            li {
                                span { "{label}" }
                                span { class: theme::TEXT_MUTED, "{age}" }
                            }
                        }
                    }
                }
                button { class: theme::BTN_DANGER, onclick: on_clear_cache, "Clear caches" }
            }

            section { class: theme::PANEL,
                h2 { class: theme::PANEL_TITLE, "Account" }
                match signed_in_as {
                    Some(name) => rsx! {
                        p { "Signed in as {name}" }
                        button { class: theme::BTN_SECONDARY, onclick: on_sign_out, "Log out" }
                    },
                    None => rsx! { p { class: theme::TEXT_MUTED, "Not signed in." } },
                }
            }

            p { class: "{theme::TEXT_MUTED} version", "{version_label()}" }
        }
    }
}

pub fn humanize_age(fetched_at: SystemTime) -> String {
    let age = SystemTime::now()
        .duration_since(fetched_at)
        .unwrap_or_default()
        .as_secs();
    if age < 60 {
        format!("{age}s ago")
    } else if age < 3_600 {
        format!("{}m ago", age / 60)
    } else if age < 86_400 {
        format!("{}h ago", age / 3_600)
    } else {
        format!("{}d ago", age / 86_400)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn ages_use_the_largest_whole_unit() {
        let now = SystemTime::now();
        assert_eq!(humanize_age(now), "0s ago");
        assert_eq!(humanize_age(now - Duration::from_secs(125)), "2m ago");
        assert_eq!(humanize_age(now - Duration::from_secs(3 * 3_600 + 5)), "3h ago");
        assert_eq!(humanize_age(now - Duration::from_secs(2 * 86_400)), "2d ago");
    }

    #[test]
    fn future_timestamps_read_as_fresh() {
        let later = SystemTime::now() + Duration::from_secs(60);
        assert_eq!(humanize_age(later), "0s ago");
    }
}
