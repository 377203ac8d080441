//! Plain-text rendering of tables for the terminal.

use haulbook_export::Table;

/// Lay `table` out as aligned text: title, info lines, header, rule, body,
/// rule, footer. Numeric columns are right-aligned.
pub fn text(table: &Table) -> String {
    let mut widths: Vec<usize> = table.headers.iter().map(|h| h.chars().count()).collect();
    for row in table.rows.iter().chain(&table.footer) {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| -> String {
        let parts: Vec<String> = cells
            .iter()
            .zip(&widths)
            .zip(&table.numeric)
            .map(|((cell, w), numeric)| {
                if *numeric {
                    format!("{cell:>w$}")
                } else {
                    format!("{cell:<w$}")
                }
            })
            .collect();
        parts.join("  ").trim_end().to_string()
    };
    let rule = "-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1));

    let mut out = String::new();
    out.push_str(&table.title);
    out.push('\n');
    for info in &table.info {
        out.push_str(&format!("{}: {}\n", info.label, info.value));
    }
    out.push('\n');
    out.push_str(&line(&table.headers));
    out.push('\n');
    out.push_str(&rule);
    out.push('\n');
    for row in &table.rows {
        out.push_str(&line(row));
        out.push('\n');
    }
    if !table.footer.is_empty() {
        out.push_str(&rule);
        out.push('\n');
        for row in &table.footer {
            out.push_str(&line(row));
            out.push('\n');
        }
    }
    out
}
