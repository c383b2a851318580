use dioxus::prelude::*;

use super::{field_messages, finish_delete, finish_list, finish_save, Editor, StoreError};
use crate::{
    app::{current_client, ApiHandle},
    domain::{forms::UserDraft, AppState, Draft, FormSource, FormValues, User},
    ui::{
        components::{
            entity_form::EntityForm,
            entity_table::{EntityTable, TableRow},
            toast::{push_toast, ToastKind, ToastMessage},
        },
        theme,
    },
};

const COLUMNS: [&str; 4] = ["Username", "Full name", "Email", "Role"];

fn row(user: &User) -> TableRow {
    TableRow {
        id: user.id.clone(),
        cells: vec![
            user.username.clone(),
            user.full_name.clone().unwrap_or_default(),
            user.email.clone().unwrap_or_default(),
            user.role.clone().unwrap_or_default(),
        ],
    }
}

#[component]
pub fn AdminUsersPage() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let api = use_context::<ApiHandle>();

    let mut editor = use_signal(|| Editor::Closed);
    let mut form_errors = use_signal(Vec::<String>::new);

    let _users = use_resource(move || async move {
        let Some(client) = current_client(api, toasts) else {
            return;
        };
        state.with_mut(|st| st.users.begin());
        let result = client.list_users().await;
        finish_list(state, toasts, api, result);
    });

    let (rows, loading, error) = state.with(|st| {
        (
            st.users.items.iter().map(row).collect::<Vec<_>>(),
            st.users.loading,
            st.users.error.clone(),
        )
    });

    let initial: FormValues = match editor() {
        Editor::Editing(id) => state
            .with(|st| st.users.get(&id).map(User::form_values))
            .unwrap_or_default(),
        _ => FormValues::new(),
    };

    let on_submit = move |values: FormValues| {
        let target = editor();
        let draft = match UserDraft::parse(&values) {
            Ok(draft) if target == Editor::Creating && draft.password.is_none() => {
                form_errors.set(vec!["Password is required for new users".to_string()]);
                return;
            }
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
        state.with_mut(|st| st.users.begin());
        spawn(async move {
            let result = match &target {
                Editor::Editing(id) => client.update_user(id, &draft).await,
                _ => client.create_user(&draft).await,
            };
            finish_save(state, toasts, api, editor, result);
        });
    };

    let on_delete = move |id: String| {
        let own_account = state.with(|st| st.session.user.as_ref().is_some_and(|me| me.id == id));
        if own_account {
            push_toast(
                toasts,
                ToastKind::Warning,
                "You cannot delete the account you are signed in with.",
            );
            return;
        }
        let Some(client) = current_client(api, toasts) else {
            return;
        };
        state.with_mut(|st| st.users.begin());
        spawn(async move {
            let result = client.delete_user(&id).await;
            finish_delete::<User>(state, toasts, api, &id, result);
        });
    };

    rsx! {
        div { class: "page admin-page",
            div { class: "panel-header",
                h2 { class: theme::PANEL_TITLE, "Users" }
                button {
                    class: theme::BTN_PRIMARY,
                    onclick: move |_| {
                        form_errors.set(Vec::new());
                        editor.set(Editor::Creating);
                    },
                    "New user"
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
                    title: editor().title("user"),
                    fields: UserDraft::FIELDS,
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
