//! Printable HTML: one standalone document, inline styles, prints on load.

use std::fmt::Write as _;

use crate::table::Table;

const STYLE: &str = "body{font-family:Arial,Helvetica,sans-serif;font-size:12px;margin:24px;color:#222}\
h1{font-size:18px;margin:0 0 12px}\
.info{margin-bottom:16px}.info div{margin:2px 0}.info span{font-weight:bold;display:inline-block;min-width:140px}\
table{width:100%;border-collapse:collapse}\
th,td{border:1px solid #999;padding:4px 6px}\
th{background:#f0f0f0;text-align:left}\
td.num,th.num{text-align:right}\
tfoot td{font-weight:bold;background:#fafafa}\
.generated{margin-top:16px;font-size:10px;color:#666}\
@media print{body{margin:0}}";

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn cell(out: &mut String, tag: &str, text: &str, numeric: bool) {
    let class = if numeric { r#" class="num""# } else { "" };
    let _ = write!(out, "<{tag}{class}>{}</{tag}>", escape(text));
}

/// Render `table` as a document that opens the print dialog when loaded.
pub fn render(table: &Table, generated_on: &str) -> String {
    let mut out = String::new();
    let title = escape(&table.title);

    let _ = write!(
        out,
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{title}</title><style>{STYLE}</style></head><body>"
    );
    let _ = write!(out, "<h1>{title}</h1>");

    if !table.info.is_empty() {
        out.push_str("<div class=\"info\">");
        for line in &table.info {
            let _ = write!(
                out,
                "<div><span>{}</span>{}</div>",
                escape(&line.label),
                escape(&line.value)
            );
        }
        out.push_str("</div>");
    }

    out.push_str("<table><thead><tr>");
    for (h, numeric) in table.headers.iter().zip(&table.numeric) {
        cell(&mut out, "th", h, *numeric);
    }
    out.push_str("</tr></thead><tbody>");
    for row in &table.rows {
        out.push_str("<tr>");
        for (v, numeric) in row.iter().zip(&table.numeric) {
            cell(&mut out, "td", v, *numeric);
        }
        out.push_str("</tr>");
    }
    out.push_str("</tbody>");

    if !table.footer.is_empty() {
        out.push_str("<tfoot>");
        for row in &table.footer {
            out.push_str("<tr>");
            for (v, numeric) in row.iter().zip(&table.numeric) {
                cell(&mut out, "td", v, *numeric);
            }
            out.push_str("</tr>");
        }
        out.push_str("</tfoot>");
    }

    let _ = write!(
        out,
        "</table><div class=\"generated\">Generated on {}</div>\
<script>window.onload=function(){{window.print();}};</script></body></html>",
        escape(generated_on)
    );
    out
}
