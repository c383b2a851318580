use dioxus::prelude::*;

use crate::domain::price_history::{percent_caption, MonthRow};
use crate::domain::format::format_number;
use crate::ui::theme;

/// Monthly price table. `names[i]` labels the column for slot `i`.
#[component]
pub fn PriceHistoryTable(rows: Vec<MonthRow>, names: Vec<String>) -> Element {
    if rows.is_empty() {
        return rsx! {
            p { class: theme::TEXT_MUTED, "No price history recorded yet." }
        };
    }

    rsx! {
        table { class: theme::TABLE,
            thead {
                tr {
                    th { "Month" }
                    for (index, name) in names.iter().enumerate() {
                        th { style: "color: {theme::slot_colour(index)}", "{name}" }
                    }
                }
            }
            tbody {
                for row in rows {
                    tr {
                        td { "{row.month}" }
                        for point in row.values {
                            td {
                                match point {
                                    Some(point) => rsx! {
                                        span { "{format_number(point.price)} bn" }
                                        span { class: "trend {theme::trend_class(point.percent)}",
                                            "{percent_caption(point.percent)}"
                                        }
                                    },
                                    None => rsx! { span { class: theme::TEXT_MUTED, "-" } },
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
