use serde::Serialize;

use super::entities::{Price, Project};
use super::format::to_billions;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MonthPoint {
    /// Billions VND, two decimals.
    pub price: f64,
    pub percent: f64,
}

/// One month across all compared slots. `values[i]` belongs to slot `i`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MonthRow {
    pub month: String,
    pub values: Vec<Option<MonthPoint>>,
}

pub fn month_label(price: &Price) -> String {
    format!("T{}-{}", price.unit, price.year)
}

/// Merges every slot's monthly series into one table.
///
/// Each slot's prices are walked in (year, month) order; a month is appended
/// the first time any slot mentions it, so the table follows the earliest
/// slot's timeline first.
pub fn merge_price_history(slots: &[Option<Project>]) -> Vec<MonthRow> {
    let mut rows: Vec<MonthRow> = Vec::new();

    for (slot, project) in slots.iter().enumerate() {
        let Some(prices) = project.as_ref().and_then(|p| p.prices.as_ref()) else {
            continue;
        };
        let mut sorted: Vec<&Price> = prices.iter().collect();
        sorted.sort_by_key(|price| (price.year, price.unit));

        for price in sorted {
            let month = month_label(price);
            let index = match rows.iter().position(|row| row.month == month) {
                Some(index) => index,
                None => {
                    rows.push(MonthRow {
                        month,
                        values: vec![None; slots.len()],
                    });
                    rows.len() - 1
                }
            };
            rows[index].values[slot] = Some(MonthPoint {
                price: to_billions(price.price),
                percent: price.percent,
            });
        }
    }

    rows
}

/// `+1.25%` / `-0.40%` against the previous month.
pub fn percent_caption(percent: f64) -> String {
    let sign = if percent >= 0.0 { '+' } else { '-' };
    format!("{sign}{:.2}%", percent.abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price(year: i32, unit: u32, value: f64, percent: f64) -> Price {
        Price {
            id: None,
            unit,
            year,
            price: value,
            percent,
        }
    }

    fn project(id: &str, prices: Vec<Price>) -> Option<Project> {
        Some(Project {
            id: id.into(),
            name: id.into(),
            prices: Some(prices),
            ..Default::default()
        })
    }

    #[test]
    fn months_are_sorted_per_project_and_merged() {
        let slots = [
            project(
                "a",
                vec![
                    price(2024, 2, 3_100_000_000.0, 3.3),
                    price(2024, 1, 3_000_000_000.0, 0.0),
                ],
            ),
            project(
                "b",
                vec![
                    price(2024, 2, 5_000_000_000.0, -1.0),
                    price(2024, 3, 5_250_000_000.0, 5.0),
                ],
            ),
            None,
        ];
        let rows = merge_price_history(&slots);
        let months: Vec<_> = rows.iter().map(|r| r.month.as_str()).collect();
        assert_eq!(months, ["T1-2024", "T2-2024", "T3-2024"]);

        assert_eq!(rows[0].values[1], None);
        assert_eq!(
            rows[1].values[0],
            Some(MonthPoint {
                price: 3.1,
                percent: 3.3
            })
        );
        assert_eq!(rows[2].values[1].map(|p| p.price), Some(5.25));
        assert!(rows.iter().all(|row| row.values.len() == 3 && row.values[2].is_none()));
    }

    #[test]
    fn year_sorts_before_month() {
        let slots = [project(
            "a",
            vec![price(2024, 1, 1.0, 0.0), price(2023, 12, 1.0, 0.0)],
        )];
        let months: Vec<_> = merge_price_history(&slots)
            .into_iter()
            .map(|r| r.month)
            .collect();
        assert_eq!(months, ["T12-2023", "T1-2024"]);
    }

    #[test]
    fn projects_without_prices_yield_nothing() {
        let unloaded = Some(Project::default());
        assert!(merge_price_history(&[unloaded, None]).is_empty());
    }

    #[test]
    fn percent_caption_carries_sign() {
        assert_eq!(percent_caption(1.254), "+1.25%");
        assert_eq!(percent_caption(-0.4), "-0.40%");
        assert_eq!(percent_caption(0.0), "+0.00%");
    }
}
