//! Class names shared across pages. Styles live in `assets/main.css`.

use crate::domain::comparison::Highlight;
use crate::ui::components::toast::ToastKind;

// Buttons

pub const BTN_PRIMARY: &str = "btn btn-primary";
pub const BTN_SECONDARY: &str = "btn btn-secondary";
pub const BTN_DANGER: &str = "btn btn-danger";
pub const BTN_SMALL: &str = "btn btn-small";
pub const BTN_SMALL_DANGER: &str = "btn btn-small btn-danger";

pub fn nav_button(active: bool) -> &'static str {
    if active {
        "nav-button nav-button-active"
    } else {
        "nav-button"
    }
}

// Inputs

pub const INPUT: &str = "input";
pub const LABEL: &str = "field-label";
pub const FIELD_ERROR: &str = "field-error";

// Panels and tables

pub const PANEL: &str = "panel";
pub const PANEL_TITLE: &str = "panel-title";
pub const TABLE: &str = "data-table";
pub const TEXT_MUTED: &str = "text-muted";

/// Cell background for a comparison highlight.
pub fn highlight_class(highlight: Highlight) -> &'static str {
    match highlight {
        Highlight::Best => "cell cell-best",
        Highlight::Middle => "cell cell-middle",
        Highlight::WorstOrMissing => "cell cell-worst",
        Highlight::Neutral => "cell",
    }
}

/// Colour for the month-over-month price change.
pub fn trend_class(percent: f64) -> &'static str {
    if percent >= 0.0 {
        "trend-up"
    } else {
        "trend-down"
    }
}

pub fn toast_class(kind: ToastKind) -> &'static str {
    match kind {
        ToastKind::Info => "toast toast-info",
        ToastKind::Success => "toast toast-success",
        ToastKind::Warning => "toast toast-warning",
        ToastKind::Error => "toast toast-error",
    }
}

/// Slot colours, in slot order, used for legends and history columns.
pub const SLOT_COLOURS: [&str; 3] = ["#094bf4", "#ff8718", "#00c64f"];

pub fn slot_colour(index: usize) -> &'static str {
    SLOT_COLOURS[index % SLOT_COLOURS.len()]
}
