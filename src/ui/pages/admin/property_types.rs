use dioxus::prelude::*;

use super::{
    field_messages, finish_delete, finish_list, finish_save, Editor, ProjectPicker, StoreError,
};
use crate::{
    app::{current_client, ApiHandle},
    domain::{
        format::{billions_range, range_string},
        forms::PropertyTypeDraft,
        AppState, Draft, FormSource, FormValues, PropertyType,
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

const COLUMNS: [&str; 3] = ["Bedrooms", "Area (m²)", "Price (bn VND)"];

fn row(property: &PropertyType) -> TableRow {
    TableRow {
        id: property.id.clone(),
        cells: vec![
            property.number_of_bedroom.to_string(),
            range_string(property.min_area, property.max_area),
            billions_range(property.min_price, property.max_price),
        ],
    }
}

#[component]
pub fn AdminPropertyTypesPage() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let api = use_context::<ApiHandle>();

    let mut editor = use_signal(|| Editor::Closed);
    let mut form_errors = use_signal(Vec::<String>::new);

    let project_id = state.with(|st| st.admin_project.clone());
    let has_project = project_id.is_some();

    let _property_types = use_resource(use_reactive!(|project_id| async move {
        let Some(project_id) = project_id else {
            state.with_mut(|st| st.property_types.finish_list(Vec::new()));
            return;
        };
        let Some(client) = current_client(api, toasts) else {
            return;
        };
        state.with_mut(|st| st.property_types.begin());
        let result = client.list_property_types(&project_id).await.map(|mut items| {
            items.sort_by_key(|p| p.number_of_bedroom);
            items
        });
        finish_list(state, toasts, api, result);
    }));

    let (rows, loading, error) = state.with(|st| {
        (
            st.property_types.items.iter().map(row).collect::<Vec<_>>(),
            st.property_types.loading,
            st.property_types.error.clone(),
        )
    });

    let initial: FormValues = match editor() {
        Editor::Editing(id) => state
            .with(|st| st.property_types.get(&id).map(PropertyType::form_values))
            .unwrap_or_default(),
        _ => FormValues::new(),
    };

    let on_submit = move |values: FormValues| {
        let draft = match PropertyTypeDraft::parse(&values) {
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
        state.with_mut(|st| st.property_types.begin());
        spawn(async move {
            let result = match &target {
                Editor::Editing(id) => client.update_property_type(id, &draft).await,
                _ => client.create_property_type(&project_id, &draft).await,
            };
            finish_save(state, toasts, api, editor, result);
        });
    };

    let on_delete = move |id: String| {
        let Some(client) = current_client(api, toasts) else {
            return;
        };
        state.with_mut(|st| st.property_types.begin());
        spawn(async move {
            let result = client.delete_property_type(&id).await;
            finish_delete::<PropertyType>(state, toasts, api, &id, result);
        });
    };

    rsx! {
        div { class: "page admin-page",
            div { class: "panel-header",
                h2 { class: theme::PANEL_TITLE, "Property types" }
                ProjectPicker {}
                button {
                    class: theme::BTN_PRIMARY,
                    disabled: !has_project,
                    onclick: move |_| {
                        form_errors.set(Vec::new());
                        editor.set(Editor::Creating);
                    },
                    "New property type"
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
            } else {
                p { class: theme::TEXT_MUTED, "Choose a project to manage its apartment types." }
            }
            if editor().is_open() {
                EntityForm {
                    key: "{editor().key()}",
                    title: editor().title("property type"),
                    fields: PropertyTypeDraft::FIELDS,
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
