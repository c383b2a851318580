//! Admin CRUD pages. Each page lists one resource and edits it in a dialog
//! built from the matching draft's field table.

mod places;
mod projects;
mod property_types;
mod users;

pub use places::AdminPlacesPage;
pub use projects::AdminProjectsPage;
pub use property_types::AdminPropertyTypesPage;
pub use users::AdminUsersPage;

use dioxus::prelude::*;
use tracing::info;

use crate::{
    app::{report_api_error, ApiHandle},
    domain::{
        forms::FieldError, AppState, EntityId, EntityStore, HasId, Place, Project, PropertyType,
        User,
    },
    infra::api::ApiClientError,
    ui::{
        components::toast::{push_toast, ToastKind, ToastMessage},
        theme,
    },
};

/// A record type managed by an admin page.
pub trait AdminResource: HasId + Clone + 'static {
    const NOUN: &'static str;

    fn store(state: &mut AppState) -> &mut EntityStore<Self>;
}

impl AdminResource for Project {
    const NOUN: &'static str = "project";

    fn store(state: &mut AppState) -> &mut EntityStore<Self> {
        &mut state.projects
    }
}

impl AdminResource for Place {
    const NOUN: &'static str = "place";

    fn store(state: &mut AppState) -> &mut EntityStore<Self> {
        &mut state.places
    }
}

impl AdminResource for PropertyType {
    const NOUN: &'static str = "property type";

    fn store(state: &mut AppState) -> &mut EntityStore<Self> {
        &mut state.property_types
    }
}

impl AdminResource for User {
    const NOUN: &'static str = "user";

    fn store(state: &mut AppState) -> &mut EntityStore<Self> {
        &mut state.users
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Editor {
    Closed,
    Creating,
    Editing(EntityId),
}

impl Editor {
    pub fn is_open(&self) -> bool {
        !matches!(self, Editor::Closed)
    }

    pub fn title(&self, noun: &str) -> String {
        match self {
            Editor::Editing(_) => format!("Edit {noun}"),
            _ => format!("New {noun}"),
        }
    }

    /// Remounts the dialog whenever the edited record changes.
    pub fn key(&self) -> String {
        match self {
            Editor::Closed => "closed".to_string(),
            Editor::Creating => "new".to_string(),
            Editor::Editing(id) => format!("edit-{id}"),
        }
    }
}

pub fn field_messages(errors: Vec<FieldError>) -> Vec<String> {
    errors.into_iter().map(|err| err.to_string()).collect()
}

/// Records the outcome of a create or update and closes the dialog on
/// success.
pub fn finish_save<T: AdminResource>(
    mut state: Signal<AppState>,
    toasts: Signal<Vec<ToastMessage>>,
    api: ApiHandle,
    mut editor: Signal<Editor>,
    result: Result<T, ApiClientError>,
) {
    let creating = *editor.peek() == Editor::Creating;
    match result {
        Ok(item) => {
            info!(id = item.id(), kind = T::NOUN, creating, "saved");
            state.with_mut(|st| {
                let store = T::store(st);
                if creating {
                    store.finish_create(item);
                } else {
                    store.finish_update(item);
                }
            });
            editor.set(Editor::Closed);
            let verb = if creating { "Created" } else { "Updated" };
            push_toast(toasts, ToastKind::Success, format!("{verb} {}.", T::NOUN));
        }
        Err(err) => {
            state.with_mut(|st| T::store(st).fail(err.to_string()));
            report_api_error(state, toasts, api, &format!("save {}", T::NOUN), &err);
        }
    }
}

pub fn finish_delete<T: AdminResource>(
    mut state: Signal<AppState>,
    toasts: Signal<Vec<ToastMessage>>,
    api: ApiHandle,
    id: &str,
    result: Result<(), ApiClientError>,
) {
    match result {
        Ok(()) => {
            info!(id, kind = T::NOUN, "deleted");
            state.with_mut(|st| T::store(st).finish_delete(id));
            push_toast(toasts, ToastKind::Success, format!("Deleted {}.", T::NOUN));
        }
        Err(err) => {
            state.with_mut(|st| T::store(st).fail(err.to_string()));
            report_api_error(state, toasts, api, &format!("delete {}", T::NOUN), &err);
        }
    }
}

pub fn finish_list<T: AdminResource>(
    mut state: Signal<AppState>,
    toasts: Signal<Vec<ToastMessage>>,
    api: ApiHandle,
    result: Result<Vec<T>, ApiClientError>,
) {
    match result {
        Ok(items) => state.with_mut(|st| T::store(st).finish_list(items)),
        Err(err) => {
            state.with_mut(|st| T::store(st).fail(err.to_string()));
            report_api_error(state, toasts, api, &format!("load {}s", T::NOUN), &err);
        }
    }
}

/// Chooses which project the places and property type pages work on.
#[component]
pub fn ProjectPicker() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let (projects, selected) = state.with(|st| {
        let mut projects: Vec<(String, String)> = st
            .projects
            .items
            .iter()
            .map(|p| (p.id.clone(), p.name.clone()))
            .collect();
        projects.sort_by(|a, b| a.1.cmp(&b.1));
        (projects, st.admin_project.clone().unwrap_or_default())
    });

    rsx! {
        div { class: "project-picker",
            label { class: theme::LABEL, "Project" }
            select {
                class: theme::INPUT,
                value: "{selected}",
                onchange: move |evt| {
                    let value = evt.value();
                    state.with_mut(|st| {
                        st.admin_project = (!value.is_empty()).then_some(value);
                    });
                },
                option { value: "", "Choose a project" }
                for (id, name) in projects {
                    option { key: "{id}", value: "{id}", selected: id == selected, "{name}" }
                }
            }
        }
    }
}

#[component]
pub fn StoreError(message: Option<String>) -> Element {
    match message {
        Some(message) => rsx! { p { class: theme::FIELD_ERROR, "{message}" } },
        None => rsx! {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editor_titles_follow_mode() {
        assert_eq!(Editor::Creating.title("place"), "New place");
        assert_eq!(Editor::Editing("p-1".into()).title("place"), "Edit place");
        assert!(!Editor::Closed.is_open());
    }

    #[test]
    fn editor_keys_differ_per_record() {
        assert_ne!(
            Editor::Editing("a".into()).key(),
            Editor::Editing("b".into()).key()
        );
        assert_ne!(Editor::Creating.key(), Editor::Closed.key());
    }

    #[test]
    fn store_accessor_reaches_the_matching_list() {
        let mut state = AppState::default();
        User::store(&mut state).finish_create(User {
            id: "u-1".into(),
            username: "admin".into(),
            full_name: None,
            email: None,
            role: None,
            password: None,
        });
        assert_eq!(state.users.items.len(), 1);
        assert!(state.projects.items.is_empty());
    }
}
