use crate::report::table::SummaryTable;

// ============================================================================
// TestRail pipe-markup rendering
// ============================================================================

/// Render a summary table as TestRail description markup.
///
/// Header cells are prefixed `|:` after a leading `||`; data rows start
/// with `|` and prefix every cell with `|`. Each row ends with a newline.
pub fn render_table(table: &SummaryTable) -> String {
    let mut out = String::new();

    let mut header = String::from("||");
    for column in &table.columns {
        header.push_str(&format!("|:{}", column));
    }
    out.push_str(&header);
    out.push('\n');

    for row in &table.rows {
        let mut line = String::from("|");
        for cell in row {
            line.push_str(&format!("|{}", cell));
        }
        out.push_str(&line);
        out.push('\n');
    }

    out
}
