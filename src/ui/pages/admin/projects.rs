use dioxus::prelude::*;

use super::{field_messages, finish_delete, finish_save, Editor, StoreError};
use crate::{
    app::{current_client, load_catalogue, ApiHandle},
    domain::{
        format::{billions_range, format_date},
        forms::ProjectDraft,
        AppState, Draft, FormSource, FormValues, Project,
    },
    ui::{
        components::{
            entity_form::EntityForm,
            entity_table::{EntityTable, TableRow},
            toast::ToastMessage,
        },
        theme,
    },
};

const COLUMNS: [&str; 5] = ["Code", "Name", "Developer", "Price (bn VND)", "Handover"];

fn row(project: &Project) -> TableRow {
    let price = match (project.min_selling_price, project.max_selling_price) {
        (Some(min), Some(max)) => billions_range(min, max),
        _ => "-".to_string(),
    };
    TableRow {
        id: project.id.clone(),
        cells: vec![
            project.code.clone(),
            project.name.clone(),
            project.developer_name.clone(),
            price,
            project.handover_date.as_deref().map(format_date).unwrap_or_default(),
        ],
    }
}

#[component]
pub fn AdminProjectsPage() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let api = use_context::<ApiHandle>();

    let mut editor = use_signal(|| Editor::Closed);
    let mut form_errors = use_signal(Vec::<String>::new);

    let (rows, loading, error) = state.with(|st| {
        (
            st.projects.items.iter().map(row).collect::<Vec<_>>(),
            st.projects.loading,
            st.projects.error.clone(),
        )
    });

    let initial: FormValues = match editor() {
        Editor::Editing(id) => state
            .with(|st| st.project(&id).map(Project::form_values))
            .unwrap_or_default(),
        _ => FormValues::new(),
    };

    let on_submit = move |values: FormValues| {
        let draft = match ProjectDraft::parse(&values) {
            Ok(draft) => draft,
            Err(errors) => {
                form_errors.set(field_messages(errors));
                return;
            }
        };
        let Some(client) = current_client(api, toasts) else {
            return;
        };
        form_errors.set(Vec::new());
        let target = editor();
        state.with_mut(|st| st.projects.begin());
        spawn(async move {
            let result = match &target {
                Editor::Editing(id) => client.update_project(id, &draft).await,
                _ => client.create_project(&draft).await,
            };
            finish_save(state, toasts, api, editor, result);
        });
    };

    let on_delete = move |id: String| {
        let Some(client) = current_client(api, toasts) else {
            return;
        };
        state.with_mut(|st| {
            st.projects.begin();
            st.selection.remove(&id);
        });
        spawn(async move {
            let result = client.delete_project(&id).await;
            finish_delete::<Project>(state, toasts, api, &id, result);
        });
    };

    rsx! {
        div { class: "page admin-page",
            div { class: "panel-header",
                h2 { class: theme::PANEL_TITLE, "Projects" }
                div { class: "dialog-actions",
                    button {
                        class: theme::BTN_SECONDARY,
                        onclick: move |_| {
                            spawn(async move {
                                load_catalogue(state, toasts, api, true).await;
                            });
                        },
                        "Refresh"
                    }
                    button {
                        class: theme::BTN_PRIMARY,
                        onclick: move |_| {
                            form_errors.set(Vec::new());
                            editor.set(Editor::Creating);
                        },
                        "New project"
                    }
                }
            }
            StoreError { message: error }
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
            if editor().is_open() {
                EntityForm {
                    key: "{editor().key()}",
                    title: editor().title("project"),
                    fields: ProjectDraft::FIELDS,
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
