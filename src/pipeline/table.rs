//! Merging parsed rows into the final ordered table.
//!
//! Duplicate labels appear in real replies (sub-totals restated, the model
//! echoing a section twice). The later occurrence always wins the values;
//! where the row *sits* is governed by [`RowOrder`] — the upstream format
//! left this ambiguous, so both placements are offered explicitly instead of
//! inheriting whatever the container happens to do.

use crate::config::RowOrder;
use crate::output::{LineItemRow, ResultTable};
use tracing::debug;

/// Merge rows, in the order received, into a label-unique [`ResultTable`].
///
/// An empty `rows` yields an empty table — that is the "no structured data
/// detected" outcome, not an error; callers report it distinctly from
/// transport failures.
pub fn assemble(rows: Vec<LineItemRow>, order: RowOrder) -> ResultTable {
    let parsed = rows.len();
    let mut table = ResultTable::new();
    for row in rows {
        table.insert(row, order);
    }
    if parsed != table.len() {
        debug!(
            "merged {} parsed row(s) into {} unique label(s)",
            parsed,
            table.len()
        );
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::parse::parse_reply;

    #[test]
    fn empty_input_empty_table() {
        let t = assemble(Vec::new(), RowOrder::LastSeen);
        assert!(t.is_empty());
        assert_eq!(t.len(), 0);
    }

    #[test]
    fn last_write_wins_through_parser() {
        let t = assemble(parse_reply("Revenue 100\nRevenue 200"), RowOrder::LastSeen);
        assert_eq!(t.len(), 1);
        assert_eq!(t.get("Revenue").unwrap(), ["200".to_string()]);
    }

    #[test]
    fn duplicate_moves_to_last_position_under_last_seen() {
        let t = assemble(
            parse_reply("Revenue 100\nGross Profit 60\nRevenue 200"),
            RowOrder::LastSeen,
        );
        let labels: Vec<&str> = t.iter().map(|(l, _)| l).collect();
        assert_eq!(labels, vec!["Gross Profit", "Revenue"]);
    }

    #[test]
    fn duplicate_stays_put_under_first_seen() {
        let t = assemble(
            parse_reply("Revenue 100\nGross Profit 60\nRevenue 200"),
            RowOrder::FirstSeen,
        );
        let labels: Vec<&str> = t.iter().map(|(l, _)| l).collect();
        assert_eq!(labels, vec!["Revenue", "Gross Profit"]);
        assert_eq!(t.get("Revenue").unwrap(), ["200".to_string()]);
    }

    #[test]
    fn insertion_order_preserved() {
        let t = assemble(
            parse_reply("Revenue 100\nCost of Sales (40)\nGross Profit 60"),
            RowOrder::LastSeen,
        );
        let labels: Vec<&str> = t.iter().map(|(l, _)| l).collect();
        assert_eq!(labels, vec!["Revenue", "Cost of Sales", "Gross Profit"]);
    }
}
