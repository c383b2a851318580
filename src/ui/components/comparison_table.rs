use dioxus::prelude::*;

use crate::domain::comparison::{CellValue, RankedCell, RankedSection, PLACEHOLDER};
use crate::ui::theme;

/// Side-by-side table: one label column plus one column per compare slot.
#[component]
pub fn ComparisonTable(sections: Vec<RankedSection>, slot_count: usize) -> Element {
    rsx! {
        div { class: "comparison",
            for section in sections {
                section { class: theme::PANEL,
                    h2 { class: theme::PANEL_TITLE, "{section.title}" }
                    table { class: "{theme::TABLE} comparison-table",
                        colgroup {
                            col { class: "comparison-label-col" }
                            for _ in 0..slot_count {
                                col {}
                            }
                        }
                        tbody {
                            for row in section.rows {
                                tr {
                                    th { scope: "row", "{row.label}" }
                                    for cell in row.cells {
                                        ComparisonCell { cell }
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

#[component]
fn ComparisonCell(cell: RankedCell) -> Element {
    let title = match cell.rank {
        Some(rank) => format!("#{rank}: {}", cell.value.display_text()),
        None => cell.value.display_text(),
    };

    rsx! {
        td { class: theme::highlight_class(cell.highlight), title: "{title}",
            match cell.value {
                CellValue::Text { text } => rsx! { span { "{text}" } },
                CellValue::Image { url, alt } => rsx! {
                    img { class: "comparison-image", src: "{url}", alt: "{alt}" }
                },
                CellValue::List { summary, items, truncated } => rsx! {
                    p { class: "list-summary", "{summary}" }
                    ul { class: "list-items",
                        for item in items {
                            li { "{item}" }
                        }
                        if truncated {
                            li { class: theme::TEXT_MUTED, "…" }
                        }
                    }
                },
                CellValue::Missing => rsx! { span { class: theme::TEXT_MUTED, "{PLACEHOLDER}" } },
            }
        }
    }
}
