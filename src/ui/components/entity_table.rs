use dioxus::prelude::*;

use crate::ui::theme;

#[derive(Clone, Debug, PartialEq)]
pub struct TableRow {
    pub id: String,
    pub cells: Vec<String>,
}

/// Admin listing with edit/delete actions per row.
#[component]
pub fn EntityTable(
    columns: Vec<&'static str>,
    rows: Vec<TableRow>,
    loading: bool,
    on_edit: EventHandler<String>,
    on_delete: EventHandler<String>,
) -> Element {
    let mut confirm_delete = use_signal(|| None::<String>);

    rsx! {
        div { class: "table-container",
            if loading {
                p { class: "{theme::TEXT_MUTED} table-status", "Loading…" }
            }
            table { class: theme::TABLE,
                thead {
                    tr {
                        for column in columns.iter() {
                            th { "{column}" }
                        }
                        th { class: "actions", "" }
                    }
                }
                tbody {
                    if rows.is_empty() && !loading {
                        tr {
                            td { colspan: "{columns.len() + 1}", class: theme::TEXT_MUTED, "Nothing here yet." }
                        }
                    }
                    for row in rows {
                        tr { key: "{row.id}",
                            for cell in row.cells.iter() {
                                td { "{cell}" }
                            }
                            td { class: "actions",
                                if confirm_delete().as_deref() == Some(row.id.as_str()) {
                                    button {
                                        class: theme::BTN_SMALL_DANGER,
                                        onclick: {
                                            let id = row.id.clone();
                                            move |_| {
                                                confirm_delete.set(None);
                                                on_delete.call(id.clone());
                                            }
                                        },
                                        "Confirm"
                                    }
                                    button {
                                        class: theme::BTN_SMALL,
                                        onclick: move |_| confirm_delete.set(None),
                                        "Cancel"
                                    }
                                } else {
                                    button {
                                        class: theme::BTN_SMALL,
                                        onclick: {
                                            let id = row.id.clone();
                                            move |_| on_edit.call(id.clone())
                                        },
                                        "Edit"
                                    }
                                    button {
                                        class: theme::BTN_SMALL_DANGER,
                                        onclick: {
                                            let id = row.id.clone();
                                            move |_| confirm_delete.set(Some(id.clone()))
                                        },
                                        "Delete"
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
