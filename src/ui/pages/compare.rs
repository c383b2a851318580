use dioxus::prelude::*;

use crate::{
    app::{load_catalogue, load_details, persist_user_state, select_project, ApiHandle, Route},
    domain::{
        comparison::compute_comparison,
        format::current_month_year,
        price_history::merge_price_history,
        project_comparison::project_layout,
        selection::search_projects,
        AppState, Project, SlotChange,
    },
    ui::{
        components::{
            comparison_table::ComparisonTable,
            price_history_table::PriceHistoryTable,
            toast::ToastMessage,
        },
        theme,
    },
};

/// Search results shown under the box at most.
const SEARCH_RESULT_LIMIT: usize = 8;

#[component]
pub fn ComparePage() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let api = use_context::<ApiHandle>();

    let mut query = use_signal(String::new);

    let slots = state.with(|st| st.selection.slots().to_vec());
    let highlight_enabled = state.with(|st| st.settings.highlight_enabled);
    let (catalogue_loading, catalogue_error) =
        state.with(|st| (st.projects.loading, st.projects.error.clone()));

    // An invalid layout stops startup, so the empty fallback is never shown.
    let sections = project_layout()
        .map(|layout| compute_comparison(&slots, layout, highlight_enabled))
        .unwrap_or_default();
    let history = merge_price_history(&slots);
    let names: Vec<String> = slots
        .iter()
        .map(|slot| slot.as_ref().map(|p| p.name.clone()).unwrap_or_default())
        .collect();
    let any_selected = slots.iter().any(Option::is_some);
    let pending = state.with(|st| st.selection.pending_details());
    let has_pending = !pending.is_empty();

    let results: Vec<Project> = {
        let needle = query();
        if needle.trim().is_empty() {
            Vec::new()
        } else {
            state.with(|st| {
                search_projects(&st.projects.items, &needle)
                    .into_iter()
                    .filter(|p| !st.selection.contains(&p.id))
                    .take(SEARCH_RESULT_LIMIT)
                    .cloned()
                    .collect()
            })
        }
    };

    let on_toggle_highlight = move |_| {
        state.with_mut(|st| st.settings.highlight_enabled = !st.settings.highlight_enabled);
        persist_user_state(&state);
    };

    rsx! {
        div { class: "page compare-page",
            section { class: theme::PANEL,
                div { class: "panel-header",
                    h2 { class: theme::PANEL_TITLE, "Compare projects" }
                    p { class: theme::TEXT_MUTED, "{current_month_year()}" }
                }
                div { class: "search",
                    input {
                        class: theme::INPUT,
                        placeholder: "Search by project name or address",
                        value: query(),
                        oninput: move |evt| query.set(evt.value()),
                    }
                    if catalogue_loading {
                        p { class: theme::TEXT_MUTED, "Loading project catalogue…" }
                    }
                    if let Some(error) = catalogue_error {
                        div { class: "search-error",
                            p { class: theme::FIELD_ERROR, "{error}" }
                            button {
                                class: theme::BTN_SMALL,
                                onclick: move |_| {
                                    spawn(async move {
                                        load_catalogue(state, toasts, api, true).await;
                                    });
                                },
                                "Retry"
                            }
                        }
                    }
                    if !results.is_empty() {
                        ul { class: "search-results",
                            for project in results {
                                SearchResult { key: "{project.id}", project }
                            }
                        }
                    }
                }
            }

            section { class: "slot-row",
                for (index, slot) in slots.iter().cloned().enumerate() {
                    SlotCard { key: "{index}", index, project: slot }
                }
            }

            if any_selected {
                div { class: "comparison-toolbar",
                    label { class: "toggle",
                        input {
                            r#type: "checkbox",
                            checked: highlight_enabled,
                            onchange: on_toggle_highlight,
                        }
                        " Highlight best values"
                    }
                    if has_pending {
                        button {
                            class: theme::BTN_SECONDARY,
                            onclick: move |_| {
                                for id in pending.clone() {
                                    spawn(async move {
                                        load_details(state, toasts, api, id).await;
                                    });
                                }
                            },
                            "Reload details"
                        }
                    }
                    button {
                        class: theme::BTN_SECONDARY,
                        onclick: move |_| state.with_mut(|st| st.selection.clear()),
                        "Clear all"
                    }
                }
                ComparisonTable { sections, slot_count: slots.len() }
                section { class: theme::PANEL,
                    h2 { class: theme::PANEL_TITLE, "Price history" }
                    PriceHistoryTable { rows: history, names }
                }
            } else {
                p { class: "{theme::TEXT_MUTED} empty-state",
                    "Pick up to three projects above to compare them side by side."
                }
            }
        }
    }
}

#[component]
fn SearchResult(project: Project) -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let api = use_context::<ApiHandle>();
    let full = state.with(|st| st.selection.is_full());

    let name = project.name.clone();
    let address = project.address.clone();

    rsx! {
        li { class: "search-result",
            div {
                p { class: "search-result-name", "{name}" }
                p { class: theme::TEXT_MUTED, "{address}" }
            }
            button {
                class: theme::BTN_SMALL,
                disabled: full,
                onclick: move |_| select_project(state, toasts, api, project.clone()),
                "Add"
            }
        }
    }
}

#[component]
fn SlotCard(index: usize, project: Option<Project>) -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let nav = use_navigator();
    let colour = theme::slot_colour(index);

    let Some(project) = project else {
        return rsx! {
            div { class: "slot-card slot-empty", style: "border-color: {colour}",
                p { class: theme::TEXT_MUTED, "Slot {index + 1}: empty" }
            }
        };
    };

    let id = project.id.clone();
    let detail_id = project.id.clone();
    let loading_details = !project.has_details();

    rsx! {
        div { class: "slot-card", style: "border-color: {colour}",
            p { class: "slot-name", "{project.name}" }
            p { class: theme::TEXT_MUTED, "{project.developer_name}" }
            if loading_details {
                p { class: theme::TEXT_MUTED, "Loading details…" }
            }
            div { class: "slot-actions",
                button {
                    class: theme::BTN_SMALL,
                    onclick: move |_| { nav.push(Route::ProjectDetail { id: detail_id.clone() }); },
                    "Details"
                }
                button {
                    class: theme::BTN_SMALL_DANGER,
                    onclick: move |_| {
                        let change = state.with_mut(|st| st.selection.remove(&id));
                        if change == SlotChange::NotFound {
                            tracing::debug!(project_id = %id, "slot already empty");
                        }
                    },
                    "Remove"
                }
            }
        }
    }
}
