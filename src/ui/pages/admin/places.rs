use dioxus::prelude::*;

use super::{
    field_messages, finish_delete, finish_list, finish_save, Editor, ProjectPicker, StoreError,
};
use crate::{
    app::{current_client, ApiHandle},
    domain::{forms::PlaceDraft, AppState, Draft, FormSource, FormValues, Place},
    ui::{
        components::{
            entity_form::EntityForm,
            entity_table::{EntityTable, TableRow},
            toast::ToastMessage,
        },
        theme,
    },
};

const PAGE_SIZE: u32 = 20;
const COLUMNS: [&str; 4] = ["Name", "Category", "Distance (km)", "Rating"];

/// A full page means the backend may hold more.
fn has_next_page(count: usize) -> bool {
    count as u32 >= PAGE_SIZE
}

fn row(place: &Place) -> TableRow {
    TableRow {
        id: place.id.clone(),
        cells: vec![
            place.name.clone(),
            place.category.label().to_string(),
            place.distance.to_string(),
            place.rating.to_string(),
        ],
    }
}

#[component]
pub fn AdminPlacesPage() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let api = use_context::<ApiHandle>();

    let mut editor = use_signal(|| Editor::Closed);
    let mut form_errors = use_signal(Vec::<String>::new);
    let mut page = use_signal(|| 0_u32);

    let project_id = state.with(|st| st.admin_project.clone());
    let has_project = project_id.is_some();
    let page_index = page();

    use_effect(use_reactive!(|project_id| {
        let _changed = project_id;
        page.set(0);
    }));

    let _places = use_resource(use_reactive!(|(project_id, page_index)| async move {
        let Some(project_id) = project_id else {
            state.with_mut(|st| st.places.finish_list(Vec::new()));
            return;
        };
        let Some(client) = current_client(api, toasts) else {
            return;
        };
        state.with_mut(|st| st.places.begin());
        let result = client.list_places(&project_id, PAGE_SIZE, page_index).await;
        finish_list(state, toasts, api, result);
    }));

    let (rows, count, loading, error) = state.with(|st| {
        (
            st.places.items.iter().map(row).collect::<Vec<_>>(),
            st.places.items.len(),
            st.places.loading,
            st.places.error.clone(),
        )
    });
    let has_next = has_next_page(count);

    let initial: FormValues = match editor() {
        Editor::Editing(id) => state
            .with(|st| st.places.get(&id).map(Place::form_values))
            .unwrap_or_default(),
        _ => FormValues::new(),
    };

    let on_submit = move |values: FormValues| {
        let draft = match PlaceDraft::parse(&values) {
            Ok(draft) => draft,
            Err(errors) => {
                form_errors.set(field_messages(errors));
                return;
            }
        };
        let Some(project_id) = state.peek().admin_project.clone() else {
            return;
        };
        let Some(client) = current_client(api, toasts) else {
            return;
        };
        form_errors.set(Vec::new());
        let target = editor();
        state.with_mut(|st| st.places.begin());
        spawn(async move {
            let result = match &target {
                Editor::Editing(id) => client.update_place(id, &draft).await,
                _ => client.create_place(&project_id, &draft).await,
            };
            finish_save(state, toasts, api, editor, result);
        });
    };

    let on_delete = move |id: String| {
        let Some(client) = current_client(api, toasts) else {
            return;
        };
        state.with_mut(|st| st.places.begin());
        spawn(async move {
            let result = client.delete_place(&id).await;
            finish_delete::<Place>(state, toasts, api, &id, result);
        });
    };

    rsx! {
        div { class: "page admin-page",
            div { class: "panel-header",
                h2 { class: theme::PANEL_TITLE, "Places" }
                ProjectPicker {}
                button {
                    class: theme::BTN_PRIMARY,
                    disabled: !has_project,
                    onclick: move |_| {
                        form_errors.set(Vec::new());
                        editor.set(Editor::Creating);
                    },
                    "New place"
                }
            }
            StoreError { message: error }
            if has_project {
                EntityTable {
                    columns: COLUMNS.to_vec(),
                    rows,
                    loading,
                    on_edit: move |id: String| {
                        form_errors.set(Vec::new());
                        editor.set(Editor::Editing(id));
                    },
                    on_delete,
                }
                div { class: "pager",
                    button {
                        class: theme::BTN_SMALL,
                        disabled: page_index == 0,
                        onclick: move |_| page.set(page_index.saturating_sub(1)),
                        "Previous"
                    }
                    span { class: theme::TEXT_MUTED, "Page {page_index + 1}" }
                    button {
                        class: theme::BTN_SMALL,
                        disabled: !has_next,
                        onclick: move |_| page.set(page_index + 1),
                        "Next"
                    }
                }
            } else {
                p { class: theme::TEXT_MUTED, "Choose a project to manage its places." }
            }
            if editor().is_open() {
                EntityForm {
                    key: "{editor().key()}",
                    title: editor().title("place"),
                    fields: PlaceDraft::FIELDS,
                    initial,
                    errors: form_errors(),
                    busy: loading,
                    on_submit,
                    on_cancel: move |_| editor.set(Editor::Closed),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_full_pages_offer_a_next_page() {
        assert!(!has_next_page(0));
        assert!(!has_next_page(PAGE_SIZE as usize - 1));
        assert!(has_next_page(PAGE_SIZE as usize));
    }
}
