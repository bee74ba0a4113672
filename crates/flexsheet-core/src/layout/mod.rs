//! Geometry-only reconstruction of a form page from positioned fragments.

pub mod lookup;
pub mod ordering;

pub use lookup::{fragment_after, value_after};
pub use ordering::{fuzzy_cmp, reading_order, LAYOUT_TOLERANCE};
