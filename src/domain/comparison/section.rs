use serde::Serialize;
use thiserror::Error;

use super::{
    attribute::{AttributeRow, CellValue, ComparableEntity, RankOrder},
    highlight::{classify, Highlight},
    ranking::rank_values,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("comparison section title is empty")]
    EmptyTitle,
    #[error("attribute row label is empty")]
    EmptyLabel,
    #[error("row `{0}` has no fields to read")]
    NoFields(String),
    #[error("row `{0}` has a non-positive display scale")]
    InvalidScale(String),
    #[error("unknown rank order `{0}`")]
    UnknownOrder(String),
}

/// Titled group of rows rendered under one header.
pub struct ComparisonSection<E: ComparableEntity> {
    title: String,
    rows: Vec<AttributeRow<E>>,
}

impl<E: ComparableEntity> ComparisonSection<E> {
    pub fn new(title: impl Into<String>, rows: Vec<AttributeRow<E>>) -> Self {
        Self {
            title: title.into(),
            rows,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn rows(&self) -> &[AttributeRow<E>] {
        &self.rows
    }
}

/// Validated, static row configuration for one page type.
pub struct ComparisonLayout<E: ComparableEntity> {
    sections: Vec<ComparisonSection<E>>,
}

impl<E: ComparableEntity> ComparisonLayout<E> {
    pub fn new(sections: Vec<ComparisonSection<E>>) -> Result<Self, LayoutError> {
        for section in &sections {
            if section.title.trim().is_empty() {
                return Err(LayoutError::EmptyTitle);
            }
            for row in &section.rows {
                row.validate()?;
            }
        }
        Ok(Self { sections })
    }

    pub fn sections(&self) -> &[ComparisonSection<E>] {
        &self.sections
    }

    pub fn row_count(&self) -> usize {
        self.sections.iter().map(|section| section.rows.len()).sum()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RankedCell {
    pub entity_index: usize,
    pub value: CellValue,
    pub rank: Option<u32>,
    pub highlight: Highlight,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RankedRow {
    pub label: String,
    pub order: RankOrder,
    pub cells: Vec<RankedCell>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RankedSection {
    pub title: String,
    pub rows: Vec<RankedRow>,
}

/// Runs one comparison pass.
///
/// `entities` is the fixed slot list; `None` marks an empty slot and still
/// produces a placeholder cell so columns stay aligned. The pass is pure: the
/// same inputs always produce the same output.
pub fn compute_comparison<E: ComparableEntity>(
    entities: &[Option<E>],
    layout: &ComparisonLayout<E>,
    highlight_enabled: bool,
) -> Vec<RankedSection> {
    layout
        .sections
        .iter()
        .map(|section| RankedSection {
            title: section.title.clone(),
            rows: section
                .rows
                .iter()
                .map(|row| rank_row(row, entities, highlight_enabled))
                .collect(),
        })
        .collect()
}

fn rank_row<E: ComparableEntity>(
    row: &AttributeRow<E>,
    entities: &[Option<E>],
    highlight_enabled: bool,
) -> RankedRow {
    let order = row.rank_order();
    let scalars: Vec<Option<f64>> = if order.is_ranked() {
        entities
            .iter()
            .map(|entity| row.comparable_value(entity.as_ref()))
            .collect()
    } else {
        vec![None; entities.len()]
    };
    let ranks = rank_values(&scalars, order);
    let highlight_row = highlight_enabled && order.is_ranked();

    let cells = entities
        .iter()
        .zip(scalars.iter().zip(ranks))
        .enumerate()
        .map(|(entity_index, (entity, (scalar, rank)))| RankedCell {
            entity_index,
            value: row.format(entity.as_ref()),
            rank,
            highlight: classify(scalar.is_some(), rank, highlight_row),
        })
        .collect();

    RankedRow {
        label: row.label().to_string(),
        order,
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Clone, Debug)]
    struct Listing {
        name: &'static str,
        price: Option<f64>,
        floors: Option<f64>,
    }

    #[derive(Clone, Copy, Debug, PartialEq)]
    enum Field {
        Name,
        Price,
        Floors,
    }

    impl ComparableEntity for Listing {
        type Field = Field;

        fn number(&self, field: Field) -> Option<f64> {
            match field {
                Field::Price => self.price,
                Field::Floors => self.floors,
                Field::Name => None,
            }
        }

        fn text(&self, field: Field) -> Option<String> {
            match field {
                Field::Name => Some(self.name.to_string()),
                _ => None,
            }
        }
    }

    fn listing(name: &'static str, price: Option<f64>, floors: Option<f64>) -> Option<Listing> {
        Some(Listing {
            name,
            price,
            floors,
        })
    }

    fn layout() -> ComparisonLayout<Listing> {
        ComparisonLayout::<Listing>::new(vec![
            ComparisonSection::new(
                "Pricing",
                vec![AttributeRow::direct("Price", [Field::Price])
                    .order(RankOrder::Ascending)
                    .unit("bn")],
            ),
            ComparisonSection::new(
                "Overview",
                vec![
                    AttributeRow::direct("Name", [Field::Name]),
                    AttributeRow::direct("Floors", [Field::Floors]).order(RankOrder::Descending),
                ],
            ),
        ])
        .unwrap()
    }

    fn ranks(row: &RankedRow) -> Vec<Option<u32>> {
        row.cells.iter().map(|cell| cell.rank).collect()
    }

    fn highlights(row: &RankedRow) -> Vec<Highlight> {
        row.cells.iter().map(|cell| cell.highlight).collect()
    }

    #[test]
    fn sections_and_rows_keep_declaration_order() {
        let output = compute_comparison(&[listing("A", Some(1.0), None), None], &layout(), true);
        let titles: Vec<_> = output.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["Pricing", "Overview"]);
        let labels: Vec<_> = output[1].rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["Name", "Floors"]);
    }

    #[test]
    fn every_slot_gets_a_cell() {
        let output = compute_comparison(&[listing("A", Some(3.0), Some(20.0)), None, None], &layout(), true);
        for section in &output {
            for row in &section.rows {
                assert_eq!(row.cells.len(), 3);
                assert_eq!(row.cells[1].value, CellValue::Missing);
                assert_eq!(row.cells[2].entity_index, 2);
            }
        }
        assert_eq!(output[0].rows[0].cells[0].value, CellValue::text("3 bn"));
    }

    #[test]
    fn ranked_rows_highlight_best_middle_and_worst() {
        let entities = [
            listing("A", Some(12.0), Some(30.0)),
            listing("B", Some(10.0), Some(25.0)),
            listing("C", Some(11.0), None),
        ];
        let output = compute_comparison(&entities, &layout(), true);
        let price = &output[0].rows[0];
        assert_eq!(ranks(price), vec![Some(3), Some(1), Some(2)]);
        assert_eq!(
            highlights(price),
            vec![Highlight::WorstOrMissing, Highlight::Best, Highlight::Middle]
        );

        let floors = &output[1].rows[1];
        assert_eq!(ranks(floors), vec![Some(1), Some(2), None]);
        assert_eq!(
            highlights(floors),
            vec![Highlight::Best, Highlight::Middle, Highlight::WorstOrMissing]
        );
    }

    #[test]
    fn unranked_rows_stay_neutral() {
        let entities = [listing("A", None, None), None];
        let output = compute_comparison(&entities, &layout(), true);
        let name = &output[1].rows[0];
        assert_eq!(ranks(name), vec![None, None]);
        assert_eq!(highlights(name), vec![Highlight::Neutral, Highlight::Neutral]);
        assert_eq!(name.cells[0].value, CellValue::text("A"));
    }

    #[test]
    fn all_empty_slots_produce_placeholders() {
        let entities: [Option<Listing>; 3] = [None, None, None];
        let enabled = compute_comparison(&entities, &layout(), true);
        let price = &enabled[0].rows[0];
        assert_eq!(ranks(price), vec![None, None, None]);
        assert_eq!(highlights(price), vec![Highlight::WorstOrMissing; 3]);
        assert!(price.cells.iter().all(|cell| cell.value.is_missing()));

        let disabled = compute_comparison(&entities, &layout(), false);
        assert_eq!(highlights(&disabled[0].rows[0]), vec![Highlight::Neutral; 3]);
    }

    #[test]
    fn disabled_highlighting_keeps_ranks() {
        let entities = [listing("A", Some(1.0), None), listing("B", Some(2.0), None)];
        let output = compute_comparison(&entities, &layout(), false);
        let price = &output[0].rows[0];
        assert_eq!(ranks(price), vec![Some(1), Some(2)]);
        assert_eq!(highlights(price), vec![Highlight::Neutral; 2]);
    }

    #[test]
    fn filling_the_third_slot_keeps_the_leader() {
        let before = compute_comparison(
            &[listing("A", Some(5.0), None), listing("B", Some(7.0), None), None],
            &layout(),
            true,
        );
        let after = compute_comparison(
            &[
                listing("A", Some(5.0), None),
                listing("B", Some(7.0), None),
                listing("C", Some(9.0), None),
            ],
            &layout(),
            true,
        );
        assert_eq!(before[0].rows[0].cells[0].rank, Some(1));
        assert_eq!(after[0].rows[0].cells[0].rank, Some(1));
        // Unrelated rows are untouched by the new slot's price.
        assert_eq!(before[1].rows[0].cells[0], after[1].rows[0].cells[0]);
    }

    #[test]
    fn invalid_layouts_fail_at_setup() {
        let untitled = ComparisonLayout::<Listing>::new(vec![ComparisonSection::new(" ", vec![])]);
        assert_eq!(untitled.err(), Some(LayoutError::EmptyTitle));

        let fieldless = ComparisonLayout::<Listing>::new(vec![ComparisonSection::new(
            "Broken",
            vec![AttributeRow::direct("Nothing", Vec::new())],
        )]);
        assert_eq!(fieldless.err(), Some(LayoutError::NoFields("Nothing".into())));
    }

    fn slot() -> impl Strategy<Value = Option<Listing>> {
        prop_oneof![
            Just(None),
            (
                proptest::option::of(0u32..50),
                proptest::option::of(1u32..80)
            )
                .prop_map(|(price, floors)| {
                    Some(Listing {
                        name: "P",
                        price: price.map(f64::from),
                        floors: floors.map(f64::from),
                    })
                }),
        ]
    }

    proptest! {
        #[test]
        fn comparison_is_idempotent(entities in prop::collection::vec(slot(), 2..=3), enabled in any::<bool>()) {
            let layout = layout();
            let first = serde_json::to_string(&compute_comparison(&entities, &layout, enabled)).unwrap();
            let second = serde_json::to_string(&compute_comparison(&entities, &layout, enabled)).unwrap();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn missing_values_are_never_best(entities in prop::collection::vec(slot(), 2..=3)) {
            let output = compute_comparison(&entities, &layout(), true);
            for section in &output {
                for row in &section.rows {
                    prop_assert_eq!(row.cells.len(), entities.len());
                    for cell in &row.cells {
                        if cell.rank.is_none() {
                            prop_assert_ne!(cell.highlight, Highlight::Best);
                        }
                        if cell.value.is_missing() && row.order.is_ranked() {
                            prop_assert_eq!(cell.highlight, Highlight::WorstOrMissing);
                        }
                    }
                }
            }
        }

        #[test]
        fn losing_third_slot_keeps_the_leader(a in 0u32..50, b in 0u32..50, c in 0u32..50) {
            prop_assume!(c > a.min(b));
            let pair = vec![
                listing("A", Some(f64::from(a)), None),
                listing("B", Some(f64::from(b)), None),
                None,
            ];
            let mut trio = pair.clone();
            trio[2] = listing("C", Some(f64::from(c)), None);

            let layout = layout();
            let before = ranks(&compute_comparison(&pair, &layout, true)[0].rows[0]);
            let after = ranks(&compute_comparison(&trio, &layout, true)[0].rows[0]);
            for slot in 0..2 {
                if before[slot] == Some(1) {
                    prop_assert_eq!(after[slot], Some(1));
                }
            }
            prop_assert_ne!(after[2], Some(1));
        }

        #[test]
        fn disabled_highlighting_is_neutral_everywhere(entities in prop::collection::vec(slot(), 1..=3)) {
            let layout = layout();
            let plain = compute_comparison(&entities, &layout, false);
            let marked = compute_comparison(&entities, &layout, true);
            for (plain_section, marked_section) in plain.iter().zip(&marked) {
                for (plain_row, marked_row) in plain_section.rows.iter().zip(&marked_section.rows) {
                    prop_assert!(highlights(plain_row).iter().all(|h| *h == Highlight::Neutral));
                    prop_assert_eq!(ranks(plain_row), ranks(marked_row));
                }
            }
        }
    }
}
