// ===============================
// src/pivot.rs
// ===============================
//
// Pure derivations over a row set: size axis, color/warehouse rankings,
// aggregate summaries, warehouse filtering, matrix cell lookup. No I/O,
// no state; the rendering layer calls these over whatever slice it holds
// (all rows or a warehouse-filtered subset).

use ahash::AHashMap as HashMap;
use once_cell::sync::Lazy;

use crate::domain::InventoryRow;

/// Fixed size ordering used by the garment line; sizes not listed here
/// sort lexically after the known ones.
pub const CANONICAL_SIZE_ORDER: [&str; 13] = [
    "XS", "S", "M", "L", "XL", "2XL", "3XL", "4XL", "5XL", "6XL", "AXL-CP", "A3XL-CP", "A4XL-CP",
];

static SIZE_RANK: Lazy<HashMap<&'static str, usize>> = Lazy::new(|| {
    CANONICAL_SIZE_ORDER
        .iter()
        .enumerate()
        .map(|(i, s)| (*s, i))
        .collect()
});

/// Sentinel selection meaning "all warehouses".
pub const ALL_WAREHOUSES: &str = "__ALL__";

/// Aggregate figures for one row set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub sum_in: i64,
    pub sum_out: i64,
    pub low_count: usize,
    pub abnormal_count: usize,
}

/// Distinct size labels, canonical order first, unknown labels lexically after.
pub fn sorted_sizes(rows: &[InventoryRow]) -> Vec<String> {
    let mut seen: Vec<&str> = Vec::new();
    for r in rows {
        if !seen.contains(&r.size.as_str()) {
            seen.push(&r.size);
        }
    }

    let (mut known, mut other): (Vec<&str>, Vec<&str>) =
        seen.into_iter().partition(|s| SIZE_RANK.contains_key(s));
    known.sort_by_key(|s| SIZE_RANK.get(s).copied().unwrap_or(usize::MAX));
    other.sort_unstable();

    known.into_iter().chain(other).map(str::to_string).collect()
}

/// Per-key totals of `max(0, qty_out)`, in first-occurrence order of the key.
/// The clamp keeps abnormal negative rows from dragging a ranking down.
fn clamped_out_totals<'a>(
    rows: &'a [InventoryRow],
    key: impl Fn(&'a InventoryRow) -> &'a str,
) -> Vec<(String, i64)> {
    let mut totals: Vec<(String, i64)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for r in rows {
        let k = key(r);
        let slot = *index.entry(k).or_insert_with(|| {
            totals.push((k.to_string(), 0));
            totals.len() - 1
        });
        totals[slot].1 += r.qty_out.max(0);
    }
    totals
}

/// Distinct colors ranked by total clamped `qty_out` descending, ties broken
/// by color label ascending.
pub fn ranked_colors(rows: &[InventoryRow]) -> Vec<String> {
    let mut totals = clamped_out_totals(rows, |r| &r.color);
    totals.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    totals.into_iter().map(|(c, _)| c).collect()
}

/// Up to `top_n` warehouses ranked by total clamped `qty_out` descending;
/// ties keep first-occurrence grouping order (stable sort, no further
/// tie-break).
pub fn ranked_warehouses(rows: &[InventoryRow], top_n: usize) -> Vec<String> {
    let mut totals = clamped_out_totals(rows, |r| &r.warehouse);
    totals.sort_by(|a, b| b.1.cmp(&a.1));
    totals.truncate(top_n);
    totals.into_iter().map(|(w, _)| w).collect()
}

/// Unclamped totals plus low-stock / abnormal row counts. A negative
/// quantity makes the row abnormal and takes priority over the low check,
/// so no row lands in both buckets.
pub fn summarize(rows: &[InventoryRow], low_threshold: i64) -> Summary {
    let mut s = Summary::default();
    for r in rows {
        s.sum_in += r.qty_in;
        s.sum_out += r.qty_out;
        if r.qty_out < 0 || r.qty_in < 0 {
            s.abnormal_count += 1;
        } else if r.qty_out < low_threshold {
            s.low_count += 1;
        }
    }
    s
}

/// Rows for one warehouse, order and duplicates preserved; the `__ALL__`
/// sentinel returns the full set unchanged.
pub fn filter_by_warehouse(rows: &[InventoryRow], key: &str) -> Vec<InventoryRow> {
    if key == ALL_WAREHOUSES {
        return rows.to_vec();
    }
    rows.iter().filter(|r| r.warehouse == key).cloned().collect()
}

/// `(qty_in, qty_out)` of the first row matching color and size, or `None`
/// for a cell with no data (distinct from a present zero-quantity cell).
/// Later duplicates for the same color+size are shadowed by the first.
pub fn matrix_cell(rows: &[InventoryRow], color: &str, size: &str) -> Option<(i64, i64)> {
    rows.iter()
        .find(|r| r.color == color && r.size == size)
        .map(|r| (r.qty_in, r.qty_out))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(color: &str, size: &str, wh: &str, qty_in: i64, qty_out: i64) -> InventoryRow {
        InventoryRow {
            style: "ST01".into(),
            color: color.into(),
            size: size.into(),
            warehouse: wh.into(),
            qty_in,
            qty_out,
        }
    }

    #[test]
    fn sizes_follow_canonical_order_then_lexical() {
        let rows = vec![
            row("Red", "M", "W1", 1, 1),
            row("Red", "XL", "W1", 1, 1),
            row("Red", "Q7", "W1", 1, 1),
            row("Red", "S", "W1", 1, 1),
        ];
        assert_eq!(sorted_sizes(&rows), vec!["S", "M", "XL", "Q7"]);
    }

    #[test]
    fn sizes_are_distinct() {
        let rows = vec![
            row("Red", "M", "W1", 1, 1),
            row("Blue", "M", "W2", 2, 2),
        ];
        assert_eq!(sorted_sizes(&rows), vec!["M"]);
    }

    #[test]
    fn unknown_sizes_sort_lexically_after_known() {
        let rows = vec![
            row("Red", "ZZ", "W1", 1, 1),
            row("Red", "AA", "W1", 1, 1),
            row("Red", "6XL", "W1", 1, 1),
            row("Red", "XS", "W1", 1, 1),
        ];
        assert_eq!(sorted_sizes(&rows), vec!["XS", "6XL", "AA", "ZZ"]);
    }

    #[test]
    fn colors_rank_by_clamped_out_total() {
        // Red's -3 clamps to 0, so Blue (5) ranks first
        let rows = vec![
            row("Red", "M", "W1", 1, -3),
            row("Blue", "M", "W1", 1, 5),
        ];
        assert_eq!(ranked_colors(&rows), vec!["Blue", "Red"]);
    }

    #[test]
    fn color_ties_break_lexically() {
        let rows = vec![
            row("Cyan", "M", "W1", 1, 4),
            row("Amber", "M", "W1", 1, 4),
        ];
        assert_eq!(ranked_colors(&rows), vec!["Amber", "Cyan"]);
    }

    #[test]
    fn warehouses_rank_and_truncate() {
        let rows = vec![
            row("Red", "M", "W1", 1, 2),
            row("Red", "M", "W2", 1, 9),
            row("Red", "M", "W3", 1, 5),
            row("Red", "M", "W4", 1, 7),
        ];
        assert_eq!(ranked_warehouses(&rows, 3), vec!["W2", "W4", "W3"]);
    }

    #[test]
    fn warehouse_ties_keep_first_occurrence_order() {
        let rows = vec![
            row("Red", "M", "W9", 1, 4),
            row("Red", "M", "W1", 1, 4),
        ];
        assert_eq!(ranked_warehouses(&rows, 3), vec!["W9", "W1"]);
    }

    #[test]
    fn summarize_counts_low_and_abnormal_once() {
        let rows = vec![
            row("Red", "M", "W1", -1, 5),
            row("Red", "L", "W1", 3, 2),
            row("Red", "XL", "W1", 4, 20),
        ];
        let s = summarize(&rows, 10);
        assert_eq!(s.sum_in, 6);
        assert_eq!(s.sum_out, 27);
        assert_eq!(s.low_count, 1);
        assert_eq!(s.abnormal_count, 1);
    }

    #[test]
    fn summarize_sums_are_unclamped() {
        let rows = vec![row("Red", "M", "W1", -4, -2)];
        let s = summarize(&rows, 10);
        assert_eq!(s.sum_in, -4);
        assert_eq!(s.sum_out, -2);
        assert_eq!(s.abnormal_count, 1);
        assert_eq!(s.low_count, 0);
    }

    #[test]
    fn all_sentinel_returns_rows_unchanged() {
        let rows = vec![
            row("Red", "M", "W1", 1, 1),
            row("Red", "M", "W1", 1, 1),
            row("Blue", "L", "W2", 2, 2),
        ];
        assert_eq!(filter_by_warehouse(&rows, ALL_WAREHOUSES), rows);
    }

    #[test]
    fn filter_keeps_only_exact_matches_in_order() {
        let rows = vec![
            row("Red", "M", "W1", 1, 1),
            row("Blue", "L", "W2", 2, 2),
            row("Green", "S", "W1", 3, 3),
        ];
        let got = filter_by_warehouse(&rows, "W1");
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].color, "Red");
        assert_eq!(got[1].color, "Green");
        assert!(filter_by_warehouse(&rows, "w1").is_empty());
    }

    #[test]
    fn matrix_cell_takes_first_match() {
        let rows = vec![
            row("Red", "M", "W1", 10, 5),
            row("Red", "M", "W2", 99, 99),
        ];
        assert_eq!(matrix_cell(&rows, "Red", "M"), Some((10, 5)));
        assert_eq!(matrix_cell(&rows, "Red", "L"), None);
        assert_eq!(matrix_cell(&rows, "Blue", "M"), None);
    }

    #[test]
    fn matrix_cell_zero_is_distinct_from_absent() {
        let rows = vec![row("Red", "M", "W1", 0, 0)];
        assert_eq!(matrix_cell(&rows, "Red", "M"), Some((0, 0)));
    }
}
