// ===============================
// src/render.rs
// ===============================
//
// Plain-text stand-in for the grid widget: color rows x size columns with
// "in/out" cells, "-" for cells with no data, plus the one-line summary
// and the warehouse chip row. Labels come from the fixed Chinese dictionary
// the warehouse staff are used to.

use crate::domain::{InventoryRow, InventorySnapshot};
use crate::pivot::{self, Summary, ALL_WAREHOUSES};

const CELL_EMPTY: &str = "-";
const HEADER_CORNER: &str = "颜色/尺码";

pub fn warehouse_display(key: &str) -> &str {
    if key == ALL_WAREHOUSES {
        "全部"
    } else {
        key
    }
}

/// Color x size grid over the given rows (all rows or a warehouse subset).
pub fn render_matrix(rows: &[InventoryRow]) -> String {
    let sizes = pivot::sorted_sizes(rows);
    let colors = pivot::ranked_colors(rows);

    let mut table: Vec<Vec<String>> = Vec::with_capacity(colors.len() + 1);
    let mut header = vec![HEADER_CORNER.to_string()];
    header.extend(sizes.iter().cloned());
    table.push(header);

    for color in &colors {
        let mut line = vec![color.clone()];
        for size in &sizes {
            line.push(match pivot::matrix_cell(rows, color, size) {
                Some((qty_in, qty_out)) => format!("{qty_in}/{qty_out}"),
                None => CELL_EMPTY.to_string(),
            });
        }
        table.push(line);
    }

    let cols = table[0].len();
    let widths: Vec<usize> = (0..cols)
        .map(|c| table.iter().map(|r| r[c].chars().count()).max().unwrap_or(0))
        .collect();

    let mut out = String::new();
    for line in &table {
        let rendered: Vec<String> = line
            .iter()
            .zip(widths.iter().copied())
            .map(|(cell, w)| format!("{cell:>w$}"))
            .collect();
        out.push_str(&rendered.join("  "));
        out.push('\n');
    }
    out
}

/// One-line aggregate summary for the status area.
pub fn render_summary(snap: &InventorySnapshot, warehouse_key: &str, summary: &Summary) -> String {
    let updated = snap.fetched_at.with_timezone(&chrono::Local).format("%H:%M:%S");
    format!(
        "库存 —— 仓库：{}｜在库合计：{}｜可用合计：{}｜低库存项：{}｜异常项：{}｜最近更新：{}",
        warehouse_display(warehouse_key),
        summary.sum_in,
        summary.sum_out,
        summary.low_count,
        summary.abnormal_count,
        updated
    )
}

/// Numbered chips for the top warehouses plus the catch-all entry.
pub fn render_warehouse_chips(top: &[String]) -> String {
    let mut chips: Vec<String> = top
        .iter()
        .enumerate()
        .map(|(i, wh)| format!("{}. {}", i + 1, wh))
        .collect();
    chips.push("综合视图（全部仓）".to_string());
    chips.join("  ")
}

/// Advisory line shown when a fetch failed and stale data is on display.
pub fn render_stale_notice(error: &str) -> String {
    format!("库存：拉取失败（{error}）。保留上次数据。")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pivot::summarize;

    fn row(color: &str, size: &str, qty_in: i64, qty_out: i64) -> InventoryRow {
        InventoryRow {
            style: "ST01".into(),
            color: color.into(),
            size: size.into(),
            warehouse: "W1".into(),
            qty_in,
            qty_out,
        }
    }

    #[test]
    fn matrix_has_cells_and_placeholders() {
        let rows = vec![row("Red", "M", 10, 5), row("Blue", "L", 3, 8)];
        let text = render_matrix(&rows);
        assert!(text.contains("颜色/尺码"));
        assert!(text.contains("10/5"));
        assert!(text.contains("3/8"));
        // Red has no L cell and Blue has no M cell
        assert!(text.contains('-'));
    }

    #[test]
    fn summary_line_carries_the_aggregates() {
        let rows = vec![row("Red", "M", 10, 5), row("Blue", "L", -1, 8)];
        let snap = InventorySnapshot {
            input: "ST01".into(),
            fetched_at: chrono::Utc::now(),
            rows: rows.clone(),
        };
        let text = render_summary(&snap, ALL_WAREHOUSES, &summarize(&rows, 10));
        assert!(text.contains("仓库：全部"));
        assert!(text.contains("在库合计：9"));
        assert!(text.contains("可用合计：13"));
        assert!(text.contains("低库存项：1"));
        assert!(text.contains("异常项：1"));
    }

    #[test]
    fn chips_are_numbered_with_catch_all_last() {
        let text = render_warehouse_chips(&["W2".into(), "W4".into()]);
        assert!(text.starts_with("1. W2  2. W4"));
        assert!(text.ends_with("综合视图（全部仓）"));
    }
}
