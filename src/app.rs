use std::time::{Duration, SystemTime};

use dioxus::{prelude::*, signals::Signal};
use tracing::{debug, error, info, warn};

use crate::{
    config::AppConfig,
    domain::{AppState, CacheResource, Project, SlotChange},
    infra::api::{ApiClient, ApiClientError, CacheStatus},
    ui::{
        components::toast::{push_toast, Toast, ToastKind, ToastMessage},
        pages::{
            AdminPlacesPage, AdminProjectsPage, AdminPropertyTypesPage, AdminUsersPage,
            ComparePage, DashboardPage, LoginPage, ProjectDetailPage, SettingsPage,
        },
        shell::{AdminShell, Shell},
    },
    util::{
        assets,
        persistence::{load_persisted_state, save_persisted_state},
    },
};

/// Statistics older than this are refetched when the dashboard opens.
pub const STATISTICS_TTL: Duration = Duration::from_secs(15 * 60);

#[derive(Routable, Clone, PartialEq)]
pub enum Route {
    #[route("/")]
    Compare {},
    #[route("/projects/:id")]
    ProjectDetail { id: String },
    #[route("/dashboard")]
    Dashboard {},
    #[route("/admin/projects")]
    AdminProjects {},
    #[route("/admin/places")]
    AdminPlaces {},
    #[route("/admin/property-types")]
    AdminPropertyTypes {},
    #[route("/admin/users")]
    AdminUsers {},
    #[route("/login")]
    Login {},
    #[route("/settings")]
    Settings {},
}

/// Shared handle to the backend client. `None` when the HTTP stack failed to
/// initialise.
pub type ApiHandle = Signal<Option<ApiClient>>;

#[component]
pub fn App() -> Element {
    let mut state = use_signal(AppState::default);
    use_hook(move || {
        if let Some(saved) = load_persisted_state() {
            state.with_mut(|st| st.apply_persisted(saved));
        }
    });
    use_context_provider(|| state);

    let toasts = use_signal(Vec::<ToastMessage>::new);
    use_context_provider(|| toasts);

    let api: ApiHandle = use_signal(|| build_client(&state.peek()));
    use_context_provider(|| api);

    let _catalogue = use_resource(move || async move {
        load_catalogue(state, toasts, api, false).await;
    });

    let _session = use_resource(move || async move {
        restore_session(state, toasts, api).await;
    });

    rsx! {
        document::Link { rel: "icon", href: assets::favicon_data_uri() }
        document::Style { "{assets::main_css()}" }
        Router::<Route> {}
        Toast {}
    }
}

fn build_client(state: &AppState) -> Option<ApiClient> {
    let config = AppConfig::resolve(&state.settings);
    match ApiClient::new(config.api_base_url.clone()) {
        Ok(client) => {
            info!(base_url = %config.api_base_url, "api client ready");
            Some(client.with_token(state.session.token.clone()))
        }
        Err(err) => {
            error!(%err, "failed to build api client");
            None
        }
    }
}

/// Recreates the client after the base URL changed. The in-memory cache is
/// dropped with the old client.
pub fn rebuild_client(state: Signal<AppState>, mut api: ApiHandle) {
    let client = build_client(&state.peek());
    api.set(client);
}

/// Swaps the bearer token on the shared client, keeping its cache.
pub fn set_client_token(mut api: ApiHandle, token: Option<String>) {
    api.with_mut(|slot| {
        if let Some(client) = slot.take() {
            *slot = Some(client.with_token(token));
        }
    });
}

pub fn current_client(api: ApiHandle, toasts: Signal<Vec<ToastMessage>>) -> Option<ApiClient> {
    let client = api.peek().clone();
    if client.is_none() {
        push_toast(toasts, ToastKind::Error, "The API client could not be initialised.");
    }
    client
}

pub fn persist_user_state(state: &Signal<AppState>) {
    let snapshot = state.with(|st| st.to_persisted());
    if let Err(err) = save_persisted_state(&snapshot) {
        warn!(%err, "failed to persist user state");
    }
}

/// Logs and surfaces a failed request. An expired session also clears the
/// stored token so admin pages fall back to the login prompt.
pub fn report_api_error(
    mut state: Signal<AppState>,
    toasts: Signal<Vec<ToastMessage>>,
    api: ApiHandle,
    action: &str,
    err: &ApiClientError,
) {
    warn!(action, %err, "request failed");
    if matches!(err, ApiClientError::Unauthorized) {
        state.with_mut(|st| st.session.sign_out());
        persist_user_state(&state);
        set_client_token(api, None);
        push_toast(toasts, ToastKind::Warning, "Your session expired. Please log in again.");
    } else {
        push_toast(toasts, ToastKind::Error, format!("Failed to {action}: {err}"));
    }
}

pub async fn load_catalogue(
    mut state: Signal<AppState>,
    toasts: Signal<Vec<ToastMessage>>,
    api: ApiHandle,
    force: bool,
) -> Option<CacheStatus> {
    let client = current_client(api, toasts)?;
    state.with_mut(|st| st.projects.begin());

    match client.get_projects(force).await {
        Ok(payload) => {
            let count = payload.data.len();
            state.with_mut(|st| {
                st.projects.finish_list(payload.data);
                st.cache
                    .record_fetch(CacheResource::Projects, payload.fetched_at);
            });
            debug!(count, status = ?payload.status, "project catalogue loaded");
            if payload.status == CacheStatus::Stale {
                push_toast(
                    toasts,
                    ToastKind::Warning,
                    "Backend unreachable; showing the last saved project list.",
                );
            }
            Some(payload.status)
        }
        Err(err) => {
            state.with_mut(|st| st.projects.fail(err.to_string()));
            report_api_error(state, toasts, api, "load projects", &err);
            None
        }
    }
}

/// Puts a catalogue project into the next free compare slot and fetches its
/// detail collections in the background.
pub fn select_project(
    mut state: Signal<AppState>,
    toasts: Signal<Vec<ToastMessage>>,
    api: ApiHandle,
    project: Project,
) {
    let id = project.id.clone();
    let name = project.name.clone();
    let needs_details = project.lacks_details();

    match state.with_mut(|st| st.selection.add(project)) {
        SlotChange::Added(slot) => {
            debug!(project_id = %id, slot, "project added to comparison");
            if needs_details {
                spawn(async move {
                    load_details(state, toasts, api, id).await;
                });
            }
        }
        SlotChange::AlreadySelected => {
            push_toast(toasts, ToastKind::Info, format!("{name} is already being compared."));
        }
        SlotChange::Full => {
            push_toast(
                toasts,
                ToastKind::Warning,
                "All three slots are taken. Remove a project first.",
            );
        }
        SlotChange::Removed | SlotChange::NotFound => {}
    }
}

pub async fn load_details(
    mut state: Signal<AppState>,
    toasts: Signal<Vec<ToastMessage>>,
    api: ApiHandle,
    project_id: String,
) {
    let Some(client) = current_client(api, toasts) else {
        return;
    };
    match client.project_details(&project_id).await {
        Ok(details) => {
            let attached = state.with_mut(|st| {
                st.cache.record_fetch(
                    CacheResource::ProjectDetail(project_id.clone()),
                    SystemTime::now(),
                );
                st.selection.attach_details(&project_id, details)
            });
            if !attached {
                debug!(%project_id, "details arrived after the project left the comparison");
            }
        }
        Err(err) => report_api_error(state, toasts, api, "load project details", &err),
    }
}

pub async fn load_statistics(
    mut state: Signal<AppState>,
    toasts: Signal<Vec<ToastMessage>>,
    api: ApiHandle,
    force: bool,
) {
    let fresh = !state.peek().is_stale(&CacheResource::Statistics, STATISTICS_TTL);
    if fresh && !force && state.peek().statistics.is_some() {
        return;
    }
    let Some(client) = current_client(api, toasts) else {
        return;
    };
    match client.statistics().await {
        Ok(stats) => state.with_mut(|st| {
            st.statistics = Some(stats);
            st.cache
                .record_fetch(CacheResource::Statistics, SystemTime::now());
        }),
        Err(err) => report_api_error(state, toasts, api, "load statistics", &err),
    }
}

/// Confirms a persisted token is still accepted and loads the user behind it.
async fn restore_session(
    mut state: Signal<AppState>,
    toasts: Signal<Vec<ToastMessage>>,
    api: ApiHandle,
) {
    let Some(client) = api.peek().clone().filter(ApiClient::has_token) else {
        return;
    };
    match client.current_user().await {
        Ok(user) => {
            info!(username = %user.username, "restored session");
            state.with_mut(|st| st.session.user = Some(user));
        }
        Err(err) => report_api_error(state, toasts, api, "restore session", &err),
    }
}

#[component]
pub fn Compare() -> Element {
    rsx! { Shell { ComparePage {} } }
}

#[component]
pub fn ProjectDetail(id: String) -> Element {
    rsx! { Shell { ProjectDetailPage { id } } }
}

#[component]
pub fn Dashboard() -> Element {
    rsx! { AdminShell { DashboardPage {} } }
}

#[component]
pub fn AdminProjects() -> Element {
    rsx! { AdminShell { AdminProjectsPage {} } }
}

#[component]
pub fn AdminPlaces() -> Element {
    rsx! { AdminShell { AdminPlacesPage {} } }
}

#[component]
pub fn AdminPropertyTypes() -> Element {
    rsx! { AdminShell { AdminPropertyTypesPage {} } }
}

#[component]
pub fn AdminUsers() -> Element {
    rsx! { AdminShell { AdminUsersPage {} } }
}

#[component]
pub fn Login() -> Element {
    rsx! { Shell { LoginPage {} } }
}

#[component]
pub fn Settings() -> Element {
    rsx! { Shell { SettingsPage {} } }
}
