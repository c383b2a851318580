use std::cmp::Ordering;

use super::RankOrder;

/// Competition ranking ("1224") of one row's values, aligned with the input.
///
/// Absent and non-finite values sort after every present value and receive
/// no rank. Exact ties share a rank and the following rank skips ahead by the
/// number of tied slots, so `[10, 10, 20]` ascending ranks as `[1, 1, 3]`.
/// Tied slots keep their input order.
pub fn rank_values(values: &[Option<f64>], order: RankOrder) -> Vec<Option<u32>> {
    let mut ranks = vec![None; values.len()];
    if !order.is_ranked() {
        return ranks;
    }

    let mut present: Vec<(usize, f64)> = values
        .iter()
        .enumerate()
        .filter_map(|(slot, value)| value.filter(|v| v.is_finite()).map(|v| (slot, v)))
        .collect();

    // `sort_by` is stable, which keeps tied slots in input order.
    present.sort_by(|a, b| compare(order, a.1, b.1));

    let mut previous: Option<f64> = None;
    let mut current = 0_u32;
    for (position, (slot, value)) in present.into_iter().enumerate() {
        if previous != Some(value) {
            current = position as u32 + 1;
            previous = Some(value);
        }
        ranks[slot] = Some(current);
    }

    ranks
}

fn compare(order: RankOrder, a: f64, b: f64) -> Ordering {
    match order {
        RankOrder::Ascending => a.total_cmp(&b),
        RankOrder::Descending => b.total_cmp(&a),
        RankOrder::None => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn ties_use_competition_ranking() {
        assert_eq!(
            rank_values(&[Some(10.0), Some(10.0), Some(20.0)], RankOrder::Ascending),
            vec![Some(1), Some(1), Some(3)]
        );
        assert_eq!(
            rank_values(
                &[Some(10_000_000_000.0), Some(12_000_000_000.0), Some(10_000_000_000.0)],
                RankOrder::Ascending
            ),
            vec![Some(1), Some(3), Some(1)]
        );
    }

    #[test]
    fn absent_values_are_unranked() {
        assert_eq!(
            rank_values(&[None, Some(5.0), Some(3.0)], RankOrder::Descending),
            vec![None, Some(1), Some(2)]
        );
        assert_eq!(
            rank_values(&[None, None, None], RankOrder::Ascending),
            vec![None, None, None]
        );
        assert_eq!(
            rank_values(&[Some(f64::NAN), Some(1.0)], RankOrder::Ascending),
            vec![None, Some(1)]
        );
    }

    #[test]
    fn unordered_rows_are_never_ranked() {
        assert_eq!(
            rank_values(&[Some(1.0), Some(2.0)], RankOrder::None),
            vec![None, None]
        );
    }

    #[test]
    fn filling_an_empty_slot_keeps_the_winner() {
        let before = rank_values(&[Some(2.0), Some(3.0), None], RankOrder::Ascending);
        let after = rank_values(&[Some(2.0), Some(3.0), Some(4.0)], RankOrder::Ascending);
        assert_eq!(before[0], Some(1));
        assert_eq!(after[0], Some(1));
        assert_eq!(after[2], Some(3));
    }

    fn slot() -> impl Strategy<Value = Option<f64>> {
        prop_oneof![Just(None), (-1_000i32..1_000).prop_map(|v| Some(v as f64))]
    }

    proptest! {
        #[test]
        fn ranks_align_with_presence(values in prop::collection::vec(slot(), 0..4)) {
            for order in [RankOrder::Ascending, RankOrder::Descending] {
                let ranks = rank_values(&values, order);
                prop_assert_eq!(ranks.len(), values.len());
                for (value, rank) in values.iter().zip(&ranks) {
                    prop_assert_eq!(value.is_some(), rank.is_some());
                }
            }
        }

        #[test]
        fn best_value_ranks_first(values in prop::collection::vec(slot(), 1..4)) {
            let present: Vec<f64> = values.iter().flatten().copied().collect();
            prop_assume!(!present.is_empty());
            let min = present.iter().copied().fold(f64::INFINITY, f64::min);
            let max = present.iter().copied().fold(f64::NEG_INFINITY, f64::max);

            let ascending = rank_values(&values, RankOrder::Ascending);
            let descending = rank_values(&values, RankOrder::Descending);
            for (slot, value) in values.iter().enumerate() {
                if *value == Some(min) {
                    prop_assert_eq!(ascending[slot], Some(1));
                }
                if *value == Some(max) {
                    prop_assert_eq!(descending[slot], Some(1));
                }
            }
        }

        #[test]
        fn equal_values_share_a_rank(values in prop::collection::vec(slot(), 0..4)) {
            let ranks = rank_values(&values, RankOrder::Ascending);
            for i in 0..values.len() {
                for j in 0..values.len() {
                    if values[i].is_some() && values[i] == values[j] {
                        prop_assert_eq!(ranks[i], ranks[j]);
                    }
                }
            }
        }

        #[test]
        fn rank_counts_strictly_better_values(values in prop::collection::vec(slot(), 0..4)) {
            let ranks = rank_values(&values, RankOrder::Ascending);
            for (slot, value) in values.iter().enumerate() {
                if let Some(v) = value {
                    let better = values.iter().flatten().filter(|other| *other < v).count() as u32;
                    prop_assert_eq!(ranks[slot], Some(better + 1));
                }
            }
        }
    }
}
