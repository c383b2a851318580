use dioxus::prelude::*;

use crate::{
    app::{load_statistics, ApiHandle},
    domain::{
        format::format_number,
        statistics::{average_price_billions, average_unit_price_millions},
        AppState, MarketStatistics,
    },
    ui::{
        components::{kpi_card::KpiCard, toast::ToastMessage},
        theme,
    },
};

#[component]
pub fn DashboardPage() -> Element {
    let state = use_context::<Signal<AppState>>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let api = use_context::<ApiHandle>();

    let _stats = use_resource(move || async move {
        load_statistics(state, toasts, api, false).await;
    });

    let statistics = state.with(|st| st.statistics.clone());
    let (avg_price, avg_unit_price, catalogue_size) = state.with(|st| {
        (
            average_price_billions(&st.projects.items),
            average_unit_price_millions(&st.projects.items),
            st.projects.items.len(),
        )
    });

    rsx! {
        div { class: "page dashboard-page",
            div { class: "panel-header",
                h2 { class: theme::PANEL_TITLE, "Market overview" }
                button {
                    class: theme::BTN_SECONDARY,
                    onclick: move |_| {
                        spawn(async move {
                            load_statistics(state, toasts, api, true).await;
                        });
                    },
                    "Refresh"
                }
            }

            div { class: "kpi-row",
                KpiCard {
                    title: "Projects",
                    value: statistics
                        .as_ref()
                        .map(|s| s.total_projects().to_string())
                        .unwrap_or_else(|| catalogue_size.to_string()),
                }
                KpiCard {
                    title: "Average price",
                    value: avg_price.map(|v| format!("{} bn VND", format_number(v))).unwrap_or_else(|| "-".into()),
                    description: Some("Mean of maximum selling prices".to_string()),
                }
                KpiCard {
                    title: "Average price per m²",
                    value: avg_unit_price.map(|v| format!("{} M VND", format_number(v))).unwrap_or_else(|| "-".into()),
                }
                KpiCard {
                    title: "Districts",
                    value: statistics
                        .as_ref()
                        .map(|s| s.featured_districts().to_string())
                        .unwrap_or_else(|| "-".into()),
                }
            }

            match statistics {
                Some(stats) => rsx! { StatisticsTables { stats } },
                None => rsx! { p { class: theme::TEXT_MUTED, "Loading statistics…" } },
            }
        }
    }
}

#[component]
fn StatisticsTables(stats: MarketStatistics) -> Element {
    let largest_price = stats.prices.iter().map(|b| b.count).max().unwrap_or(0);
    let largest_district = stats.largest_district_count();
    let largest_area = stats.areas.iter().map(|b| b.project_count).max().unwrap_or(0);

    rsx! {
        div { class: "stats-grid",
            section { class: theme::PANEL,
                h3 { class: theme::PANEL_TITLE, "Projects by price range" }
                table { class: theme::TABLE,
                    tbody {
                        for bucket in stats.prices.iter() {
                            tr {
                                td { "{bucket.price_range}" }
                                td { Bar { value: bucket.count, max: largest_price } }
                            }
                        }
                    }
                }
            }
            section { class: theme::PANEL,
                h3 { class: theme::PANEL_TITLE, "Projects by district" }
                table { class: theme::TABLE,
                    tbody {
                        for bucket in stats.districts.iter() {
                            tr {
                                td { "{bucket.district}" }
                                td { Bar { value: bucket.count, max: largest_district } }
                            }
                        }
                    }
                }
            }
            section { class: theme::PANEL,
                h3 { class: theme::PANEL_TITLE, "Projects by apartment area" }
                table { class: theme::TABLE,
                    tbody {
                        for bucket in stats.areas.iter() {
                            tr {
                                td { "{bucket.area_category}" }
                                td { Bar { value: bucket.project_count, max: largest_area } }
                            }
                        }
                    }
                }
            }
            section { class: theme::PANEL,
                h3 { class: theme::PANEL_TITLE, "Monthly parking fees (VND)" }
                table { class: theme::TABLE,
                    thead {
                        tr {
                            th { "Fee" }
                            th { "Motorbike" }
                            th { "Car" }
                        }
                    }
                    tbody {
                        for row in stats.parking.iter() {
                            tr {
                                td { "{row.price}" }
                                td { "{row.bike}" }
                                td { "{row.car}" }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Horizontal bar scaled against the largest bucket.
#[component]
fn Bar(value: u64, max: u64) -> Element {
    let width = if max == 0 {
        0.0
    } else {
        value as f64 / max as f64 * 100.0
    };
    rsx! {
        div { class: "bar",
            div { class: "bar-fill", style: "width: {width:.1}%" }
            span { class: "bar-label", "{value}" }
        }
    }
}
