use dioxus::prelude::*;

use crate::domain::entities::PlaceCategory;
use crate::domain::forms::{FieldKind, FormField, FormValues};
use crate::ui::theme;

/// Create/edit dialog driven by a draft's field table.
///
/// The form only collects strings; the caller parses them into the draft
/// type and passes any messages back through `errors`.
#[component]
pub fn EntityForm(
    title: String,
    fields: &'static [FormField],
    initial: FormValues,
    errors: Vec<String>,
    busy: bool,
    on_submit: EventHandler<FormValues>,
    on_cancel: EventHandler<()>,
) -> Element {
    let mut values = use_signal(|| initial.clone());

    rsx! {
        div { class: "dialog-backdrop",
            form {
                class: "{theme::PANEL} dialog",
                onsubmit: move |evt| {
                    evt.prevent_default();
                    on_submit.call(values());
                },
                h2 { class: theme::PANEL_TITLE, "{title}" }
                div { class: "form-grid",
                    for field in fields.iter().copied() {
                        div { key: "{field.key}", class: "form-field",
                            label { class: theme::LABEL,
                                "{field.label}"
                                if field.required {
                                    span { class: "required", " *" }
                                }
                            }
                            FieldInput {
                                field,
                                value: values.with(|v| v.get(field.key).cloned().unwrap_or_default()),
                                on_change: move |value: String| {
                                    values.with_mut(|v| {
                                        v.insert(field.key.to_string(), value);
                                    });
                                },
                            }
                        }
                    }
                }
                if !errors.is_empty() {
                    ul { class: theme::FIELD_ERROR,
                        for error in errors.iter() {
                            li { "{error}" }
                        }
                    }
                }
                div { class: "dialog-actions",
                    button {
                        class: theme::BTN_SECONDARY,
                        r#type: "button",
                        onclick: move |_| on_cancel.call(()),
                        "Cancel"
                    }
                    button {
                        class: theme::BTN_PRIMARY,
                        r#type: "submit",
                        disabled: busy,
                        if busy { "Saving…" } else { "Save" }
                    }
                }
            }
        }
    }
}

#[component]
fn FieldInput(field: FormField, value: String, on_change: EventHandler<String>) -> Element {
    match field.kind {
        FieldKind::Category => rsx! {
            select {
                class: theme::INPUT,
                value: "{value}",
                onchange: move |evt| on_change.call(evt.value()),
                option { value: "", disabled: true, "Choose a category" }
                for category in PlaceCategory::ALL {
                    option {
                        value: category.code(),
                        selected: value == category.code(),
                        "{category.label()}"
                    }
                }
            }
        },
        kind => {
            let input_type = match kind {
                FieldKind::Number | FieldKind::Integer => "number",
                FieldKind::Date => "date",
                FieldKind::Password => "password",
                _ => "text",
            };
            let step = if kind == FieldKind::Number { "any" } else { "1" };
            rsx! {
                input {
                    class: theme::INPUT,
                    r#type: input_type,
                    step,
                    value: "{value}",
                    oninput: move |evt| on_change.call(evt.value()),
                }
            }
        }
    }
}
