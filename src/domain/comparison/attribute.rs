use std::{fmt, str::FromStr};

use serde::Serialize;

use super::LayoutError;
use crate::domain::format::{format_number, range_string};

/// Placeholder rendered for empty slots and missing data.
pub const PLACEHOLDER: &str = "- -";

/// A record that can take part in a side-by-side comparison.
///
/// Lookups return `None` for anything missing or not yet loaded; the engine
/// never treats that as an error.
pub trait ComparableEntity {
    type Field: Copy + fmt::Debug + PartialEq;

    fn number(&self, field: Self::Field) -> Option<f64>;

    fn text(&self, field: Self::Field) -> Option<String>;
}

/// Ranking direction of an attribute row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RankOrder {
    /// Smallest value wins.
    Ascending,
    /// Largest value wins.
    Descending,
    #[default]
    None,
}

impl RankOrder {
    pub fn is_ranked(self) -> bool {
        !matches!(self, RankOrder::None)
    }
}

impl FromStr for RankOrder {
    type Err = LayoutError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(RankOrder::Ascending),
            "desc" | "descending" => Ok(RankOrder::Descending),
            "none" | "" => Ok(RankOrder::None),
            other => Err(LayoutError::UnknownOrder(other.to_string())),
        }
    }
}

/// Render-agnostic cell content.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CellValue {
    Text {
        text: String,
    },
    Image {
        url: String,
        alt: String,
    },
    /// A counted list, e.g. nearby schools. `items` is already truncated.
    List {
        summary: String,
        items: Vec<String>,
        truncated: bool,
    },
    Missing,
}

impl CellValue {
    pub fn text(text: impl Into<String>) -> Self {
        CellValue::Text { text: text.into() }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }

    /// Plain-text rendering, used for tooltips and clipboard exports.
    pub fn display_text(&self) -> String {
        match self {
            CellValue::Text { text } => text.clone(),
            CellValue::Image { alt, .. } => alt.clone(),
            CellValue::List { summary, .. } => summary.clone(),
            CellValue::Missing => PLACEHOLDER.to_string(),
        }
    }

    fn with_unit(self, unit: Option<&str>) -> Self {
        match (self, unit) {
            (CellValue::Text { text }, Some(unit)) if !unit.is_empty() => CellValue::Text {
                text: format!("{text} {unit}"),
            },
            (value, _) => value,
        }
    }
}

/// Custom display function for a row. Returns `None` when the entity lacks the data.
pub type Formatter<E> = fn(&E) -> Option<CellValue>;

/// How a row reads its value.
pub enum RowKind<E: ComparableEntity> {
    /// Displays the value of the fields (a range for several fields) and ranks
    /// on their average.
    Direct { fields: Vec<E::Field>, scale: f64 },
    /// Displays whatever the formatter returns and ranks on the average of
    /// `fields`, which may be empty for unranked rows.
    Custom {
        fields: Vec<E::Field>,
        formatter: Formatter<E>,
    },
}

/// One comparison dimension.
pub struct AttributeRow<E: ComparableEntity> {
    label: String,
    kind: RowKind<E>,
    order: RankOrder,
    unit: Option<String>,
}

impl<E: ComparableEntity> AttributeRow<E> {
    pub fn direct(label: impl Into<String>, fields: impl IntoIterator<Item = E::Field>) -> Self {
        Self {
            label: label.into(),
            kind: RowKind::Direct {
                fields: fields.into_iter().collect(),
                scale: 1.0,
            },
            order: RankOrder::None,
            unit: None,
        }
    }

    pub fn custom(
        label: impl Into<String>,
        fields: impl IntoIterator<Item = E::Field>,
        formatter: Formatter<E>,
    ) -> Self {
        Self {
            label: label.into(),
            kind: RowKind::Custom {
                fields: fields.into_iter().collect(),
                formatter,
            },
            order: RankOrder::None,
            unit: None,
        }
    }

    pub fn order(mut self, order: RankOrder) -> Self {
        self.order = order;
        self
    }

    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Display divisor for direct rows (e.g. `1e9` to show billions).
    /// Ranking always uses the raw values.
    pub fn scale(mut self, divisor: f64) -> Self {
        if let RowKind::Direct { scale, .. } = &mut self.kind {
            *scale = divisor;
        }
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn rank_order(&self) -> RankOrder {
        self.order
    }

    fn fields(&self) -> &[E::Field] {
        match &self.kind {
            RowKind::Direct { fields, .. } | RowKind::Custom { fields, .. } => fields,
        }
    }

    /// Scalar the row ranks on.
    pub fn comparable_value(&self, entity: Option<&E>) -> Option<f64> {
        average(entity, self.fields())
    }

    /// Display value for one slot; empty slots and missing data yield [`CellValue::Missing`].
    pub fn format(&self, entity: Option<&E>) -> CellValue {
        let Some(entity) = entity else {
            return CellValue::Missing;
        };

        let value = match &self.kind {
            RowKind::Direct { fields, scale } => format_direct(entity, fields, *scale),
            RowKind::Custom { formatter, .. } => formatter(entity),
        };

        value
            .unwrap_or(CellValue::Missing)
            .with_unit(self.unit.as_deref())
    }

    pub(super) fn validate(&self) -> Result<(), LayoutError> {
        if self.label.trim().is_empty() {
            return Err(LayoutError::EmptyLabel);
        }
        match &self.kind {
            RowKind::Direct { fields, scale } => {
                if fields.is_empty() {
                    return Err(LayoutError::NoFields(self.label.clone()));
                }
                if !scale.is_finite() || *scale <= 0.0 {
                    return Err(LayoutError::InvalidScale(self.label.clone()));
                }
            }
            RowKind::Custom { fields, .. } => {
                if self.order.is_ranked() && fields.is_empty() {
                    return Err(LayoutError::NoFields(self.label.clone()));
                }
            }
        }
        Ok(())
    }
}

/// Arithmetic mean of the present, finite values of `fields`.
///
/// Missing fields are excluded rather than counted as zero; an absent entity
/// or a row with no present field yields `None`.
pub fn average<E: ComparableEntity>(entity: Option<&E>, fields: &[E::Field]) -> Option<f64> {
    let entity = entity?;
    let (sum, count) = fields
        .iter()
        .filter_map(|field| entity.number(*field))
        .filter(|value| value.is_finite())
        .fold((0.0, 0_usize), |(sum, count), value| (sum + value, count + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

fn format_direct<E: ComparableEntity>(entity: &E, fields: &[E::Field], scale: f64) -> Option<CellValue> {
    let numbers: Vec<f64> = fields
        .iter()
        .filter_map(|field| entity.number(*field))
        .filter(|value| value.is_finite())
        .map(|value| value / scale)
        .collect();

    if numbers.is_empty() {
        // Text attributes (address, developer, ...) go through the same row kind.
        return fields
            .iter()
            .find_map(|field| entity.text(*field))
            .filter(|text| !text.trim().is_empty())
            .map(CellValue::text);
    }

    let min = numbers.iter().copied().fold(f64::INFINITY, f64::min);
    let max = numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let text = if numbers.len() == 1 {
        format_number(min)
    } else {
        range_string(min, max)
    };
    Some(CellValue::text(text))
}
