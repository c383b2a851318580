use serde::Serialize;

/// Semantic highlight of a comparison cell. The presentation layer maps it to
/// colours; the engine never deals in styles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Highlight {
    Best,
    Middle,
    WorstOrMissing,
    Neutral,
}

/// Classifies one cell.
///
/// With highlighting off every cell is neutral. Otherwise a missing value is
/// `WorstOrMissing`, rank 1 is `Best`, rank 2 is `Middle` and anything lower
/// is `WorstOrMissing`. A present value without a rank stays neutral.
pub fn classify(value_present: bool, rank: Option<u32>, highlight_enabled: bool) -> Highlight {
    if !highlight_enabled {
        return Highlight::Neutral;
    }
    if !value_present {
        return Highlight::WorstOrMissing;
    }
    match rank {
        Some(1) => Highlight::Best,
        Some(2) => Highlight::Middle,
        Some(_) => Highlight::WorstOrMissing,
        None => Highlight::Neutral,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_highlighting_is_always_neutral() {
        for rank in [None, Some(1), Some(2), Some(3)] {
            assert_eq!(classify(true, rank, false), Highlight::Neutral);
            assert_eq!(classify(false, rank, false), Highlight::Neutral);
        }
    }

    #[test]
    fn ranks_map_to_categories() {
        assert_eq!(classify(true, Some(1), true), Highlight::Best);
        assert_eq!(classify(true, Some(2), true), Highlight::Middle);
        assert_eq!(classify(true, Some(3), true), Highlight::WorstOrMissing);
        assert_eq!(classify(false, None, true), Highlight::WorstOrMissing);
        assert_eq!(classify(true, None, true), Highlight::Neutral);
    }

    #[test]
    fn serializes_with_kebab_case_names() {
        assert_eq!(
            serde_json::to_string(&Highlight::WorstOrMissing).unwrap(),
            "\"worst-or-missing\""
        );
    }
}
