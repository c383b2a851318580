//! Side-by-side comparison engine.
//!
//! A [`ComparisonLayout`] describes which attributes are compared and how they
//! rank. [`compute_comparison`] turns a fixed list of entity slots into rows of
//! ranked, highlight-classified cells. Everything here is synchronous and
//! stateless; callers re-run it whenever the slots or their data change.

pub mod attribute;
pub mod highlight;
pub mod ranking;
pub mod section;

pub use attribute::{AttributeRow, CellValue, ComparableEntity, RankOrder, PLACEHOLDER};
pub use highlight::Highlight;
pub use section::{
    compute_comparison, ComparisonLayout, ComparisonSection, LayoutError, RankedCell, RankedRow,
    RankedSection,
};
