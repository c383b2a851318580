use dioxus::prelude::*;

use crate::{
    app::{report_api_error, ApiHandle, Route},
    domain::{
        entities::PlaceGroup,
        format::{billions_range, coordinate_string, format_date, map_url, millions_range, range_string},
        price_history::merge_price_history,
        project_comparison::{overview_value, ProjectField},
        AppState, Project,
    },
    infra::api::{ApiClient, ApiClientError},
    ui::{
        components::{
            kpi_card::KpiCard,
            price_history_table::PriceHistoryTable,
            toast::ToastMessage,
        },
        theme,
    },
    util::assets,
};

/// Read-only view of one project with its detail collections.
#[component]
pub fn ProjectDetailPage(id: String) -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let api = use_context::<ApiHandle>();
    let nav = use_navigator();

    let resource_id = id.clone();
    let project = use_resource(use_reactive!(|resource_id| async move {
        let selected = state
            .peek()
            .selection
            .filled()
            .find(|p| p.id == resource_id && p.has_details())
            .cloned();
        if let Some(project) = selected {
            return Some(project);
        }
        let client = api.peek().clone()?;
        match fetch_project(&client, &resource_id, state).await {
            Ok(project) => Some(project),
            Err(err) => {
                report_api_error(state, toasts, api, "load project", &err);
                None
            }
        }
    }));

    let body = match &*project.read() {
        None => rsx! { p { class: theme::TEXT_MUTED, "Loading project…" } },
        Some(None) => rsx! {
            section { class: theme::PANEL,
                h2 { class: theme::PANEL_TITLE, "Project unavailable" }
                p { class: theme::TEXT_MUTED, "This project could not be loaded." }
            }
        },
        Some(Some(project)) => rsx! { ProjectOverview { project: project.clone() } },
    };

    rsx! {
        div { class: "page detail-page",
            button {
                class: theme::BTN_SECONDARY,
                onclick: move |_| { nav.push(Route::Compare {}); },
                "Back to comparison"
            }
            {body}
        }
    }
}

/// Catalogue entry, or a fresh fetch when the catalogue lacks it, plus its
/// detail collections.
async fn fetch_project(
    client: &ApiClient,
    id: &str,
    state: Signal<AppState>,
) -> Result<Project, ApiClientError> {
    let known = state.peek().project(id).cloned();
    let mut project = match known {
        Some(project) => project,
        None => client.get_project(id).await?,
    };
    let details = client.project_details(id).await?;
    let mut properties = details.properties;
    properties.sort_by_key(|p| p.number_of_bedroom);
    project.properties = Some(properties);
    project.places = Some(details.places);
    project.prices = Some(details.prices);
    Ok(project)
}

#[component]
fn ProjectOverview(project: Project) -> Element {
    let selling = match (project.min_selling_price, project.max_selling_price) {
        (Some(min), Some(max)) => format!("{} bn VND", billions_range(min, max)),
        _ => "-".to_string(),
    };
    let unit_price = match (project.min_unit_price, project.max_unit_price) {
        (Some(min), Some(max)) => format!("{} M VND/m²", millions_range(min, max)),
        _ => "-".to_string(),
    };
    let handover = project
        .handover_date
        .as_deref()
        .map(format_date)
        .unwrap_or_else(|| "-".to_string());
    let construction = project
        .construction_start_date_from
        .as_deref()
        .map(format_date)
        .unwrap_or_else(|| "-".to_string());
    let location = project.coordinates();
    let master_plan = project
        .master_plan_url
        .clone()
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| assets::placeholder_data_uri().to_string());

    let properties = project.properties.clone().unwrap_or_default();
    let history = merge_price_history(&[Some(project.clone())]);
    let groups = [PlaceGroup::Schools, PlaceGroup::Hospitals, PlaceGroup::Other];

    rsx! {
        section { class: theme::PANEL,
            h2 { class: theme::PANEL_TITLE, "{project.name}" }
            p { class: theme::TEXT_MUTED, "{project.address}" }
            p { "Developer: {project.developer_name}" }
            if let Some((lat, lng)) = location {
                p {
                    "Location: {coordinate_string(lat, lng)} "
                    a { href: map_url(lat, lng), target: "_blank", "Open map" }
                }
            }
            img { class: "comparison-image", src: "{master_plan}", alt: "Master plan" }
        }

        div { class: "kpi-row",
            KpiCard { title: "Selling price", value: selling }
            KpiCard { title: "Price per m²", value: unit_price }
            KpiCard {
                title: "Scale",
                value: format!("{} ha", overview_value(&project, ProjectField::TotalArea)),
            }
            KpiCard {
                title: "Units",
                value: overview_value(&project, ProjectField::TotalUnits),
                description: Some(format!("{} blocks", overview_value(&project, ProjectField::Blocks))),
            }
            KpiCard {
                title: "Handover",
                value: handover,
                description: Some(format!("Construction from {construction}")),
            }
        }

        section { class: theme::PANEL,
            h2 { class: theme::PANEL_TITLE, "Apartment types" }
            if properties.is_empty() {
                p { class: theme::TEXT_MUTED, "No apartment types recorded." }
            } else {
                table { class: theme::TABLE,
                    thead {
                        tr {
                            th { "Bedrooms" }
                            th { "Area (m²)" }
                            th { "Price (bn VND)" }
                        }
                    }
                    tbody {
                        for property in properties {
                            tr { key: "{property.id}",
                                td { "{property.number_of_bedroom}" }
                                td { "{range_string(property.min_area, property.max_area)}" }
                                td { "{billions_range(property.min_price, property.max_price)}" }
                            }
                        }
                    }
                }
            }
        }

        section { class: theme::PANEL,
            h2 { class: theme::PANEL_TITLE, "Nearby places" }
            for group in groups {
                PlaceList { key: "{group.noun()}", project: project.clone(), group }
            }
        }

        section { class: theme::PANEL,
            h2 { class: theme::PANEL_TITLE, "Price history" }
            PriceHistoryTable { rows: history, names: vec![project.name.clone()] }
        }
    }
}

#[component]
fn PlaceList(project: Project, group: PlaceGroup) -> Element {
    let places: Vec<_> = project
        .places_in(group)
        .unwrap_or_default()
        .into_iter()
        .cloned()
        .collect();

    rsx! {
        div { class: "place-group",
            h3 { class: theme::LABEL, "{places.len()} {group.noun()}" }
            if !places.is_empty() {
                ul { class: "list-items",
                    for place in places {
                        li { key: "{place.id}",
                            "{place.name} "
                            span { class: theme::TEXT_MUTED, "({place.distance} km)" }
                        }
                    }
                }
            }
        }
    }
}
