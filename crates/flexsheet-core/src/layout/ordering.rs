use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::extraction::TextFragment;

/// Coordinates closer than this (in layout units) are treated as the same row/column.
pub const LAYOUT_TOLERANCE: f32 = 5.0;

/// Three-way comparison where values closer than `tolerance` compare Equal.
///
/// Outside the tolerance the rounded coordinates decide; when rounding makes
/// them equal the exact values do.
pub fn fuzzy_cmp(a: f32, b: f32, tolerance: f32) -> Ordering {
    if (a - b).abs() < tolerance {
        return Ordering::Equal;
    }
    match a.round().total_cmp(&b.round()) {
        Ordering::Equal => a.total_cmp(&b),
        other => other,
    }
}

/// Sort fragments into reading order: rows top to bottom, then left to right.
///
/// Zero-area fragments are dropped. Vertical and horizontal positions are
/// resolved into bands by chaining neighbours that `fuzzy_cmp` considers
/// equal, so any two fragments less than [`LAYOUT_TOLERANCE`] apart vertically
/// share a row. Sorting on integer bands keeps the order total; the sort is
/// stable, so fragments sharing both bands keep their content order.
///
/// Chaining is transitive: lines stepping down by less than the tolerance
/// each (y = 100, 96, 92) collapse into one row even though the outer pair
/// is more than [`LAYOUT_TOLERANCE`] apart, and are then ordered by x alone.
pub fn reading_order(fragments: &[TextFragment]) -> Vec<TextFragment> {
    let visible: Vec<&TextFragment> = fragments.iter().filter(|f| f.is_visible()).collect();

    // PDF y grows upwards: negate so that ascending bands run top to bottom.
    let ys: Vec<f32> = visible.iter().map(|f| -f.y()).collect();
    let rows = bands(&ys);

    let mut members_by_row: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (i, &row) in rows.iter().enumerate() {
        members_by_row.entry(row).or_default().push(i);
    }

    let mut columns = vec![0; visible.len()];
    for members in members_by_row.values() {
        let xs: Vec<f32> = members.iter().map(|&i| visible[i].x()).collect();
        for (column, &i) in bands(&xs).into_iter().zip(members) {
            columns[i] = column;
        }
    }

    let mut order: Vec<usize> = (0..visible.len()).collect();
    order.sort_by_key(|&i| (rows[i], columns[i]));
    order.into_iter().map(|i| visible[i].clone()).collect()
}

/// Assign each value a band index by single-linkage over the sorted values.
///
/// Returned indices are ascending with the values; neighbours (in sorted
/// order) that compare Equal under `fuzzy_cmp` share a band.
fn bands(values: &[f32]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut band_of = vec![0; values.len()];
    let mut band = 0;
    let mut previous: Option<f32> = None;
    for i in order {
        if let Some(prev) = previous {
            if fuzzy_cmp(prev, values[i], LAYOUT_TOLERANCE) != Ordering::Equal {
                band += 1;
            }
        }
        band_of[i] = band;
        previous = Some(values[i]);
    }
    band_of
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frag(text: &str, x: f32, y: f32) -> TextFragment {
        TextFragment::at(text, x, y, 10.0, 8.0)
    }

    fn texts(fragments: &[TextFragment]) -> Vec<&str> {
        fragments.iter().map(|f| f.text.as_str()).collect()
    }

    #[test]
    fn test_fuzzy_cmp_within_tolerance_is_equal() {
        assert_eq!(fuzzy_cmp(100.0, 104.9, 5.0), Ordering::Equal);
        assert_eq!(fuzzy_cmp(104.9, 100.0, 5.0), Ordering::Equal);
    }

    #[test]
    fn test_fuzzy_cmp_outside_tolerance() {
        assert_eq!(fuzzy_cmp(100.0, 105.0, 5.0), Ordering::Less);
        assert_eq!(fuzzy_cmp(105.0, 100.0, 5.0), Ordering::Greater);
        assert_eq!(fuzzy_cmp(-3.0, 12.0, 5.0), Ordering::Less);
    }

    #[test]
    fn test_rows_top_to_bottom_then_left_to_right() {
        let fragments = vec![
            frag("b2", 200.0, 600.0),
            frag("a1", 50.0, 700.0),
            frag("b1", 50.0, 600.0),
            frag("a2", 200.0, 700.0),
        ];
        assert_eq!(texts(&reading_order(&fragments)), vec!["a1", "a2", "b1", "b2"]);
    }

    #[test]
    fn test_baseline_jitter_stays_on_one_row() {
        // right cell sits 3 units higher but is still the same row
        let fragments = vec![frag("value", 200.0, 703.0), frag("label", 50.0, 700.0)];
        assert_eq!(texts(&reading_order(&fragments)), vec!["label", "value"]);
    }

    #[test]
    fn test_zero_area_fragments_are_dropped() {
        let fragments = vec![
            frag("kept", 10.0, 10.0),
            TextFragment::at("", 20.0, 10.0, 0.0, 8.0),
            TextFragment::at(" ", 30.0, 10.0, 4.0, 0.0),
        ];
        assert_eq!(texts(&reading_order(&fragments)), vec!["kept"]);
    }

    #[test]
    fn test_near_overlapping_columns_keep_content_order() {
        let fragments = vec![frag("first", 102.0, 50.0), frag("second", 100.0, 50.0)];
        assert_eq!(texts(&reading_order(&fragments)), vec!["first", "second"]);
    }

    #[test]
    fn test_chained_rows_merge() {
        // 4 units apart each: all within reach of a neighbour, so one row
        let fragments = vec![
            frag("c", 30.0, 92.0),
            frag("a", 10.0, 100.0),
            frag("b", 20.0, 96.0),
        ];
        assert_eq!(texts(&reading_order(&fragments)), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_chained_rows_order_by_x_alone() {
        // 100 and 92 are 8 apart but chain through 96, so x decides
        let fragments = vec![
            frag("top", 30.0, 100.0),
            frag("middle", 20.0, 96.0),
            frag("bottom", 10.0, 92.0),
        ];
        assert_eq!(
            texts(&reading_order(&fragments)),
            vec!["bottom", "middle", "top"]
        );
    }

    #[test]
    fn test_reading_order_is_deterministic() {
        let fragments = vec![
            frag("x", 300.0, 400.0),
            frag("y", 10.0, 402.0),
            frag("z", 12.0, 100.0),
        ];
        assert_eq!(reading_order(&fragments), reading_order(&fragments));
    }
}
