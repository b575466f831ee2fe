//! Pipe table normalization.

use std::fmt::Write;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Header row, separator row, then any number of body rows.
static TABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^\|(.+)\|[ \t]*\r?\n\|(?:[ \t]*:?-+:?[ \t]*\|)+[ \t]*(?:\r?\n|\z)((?:\|.*\|[ \t]*(?:\r?\n|\z))*)",
    )
    .unwrap()
});

/// Rewrite pipe tables into `<table class="table-bordered">` markup.
///
/// The table is surrounded by blank lines so it is read as one HTML block.
pub fn replace_tables(text: &str) -> String {
    TABLE
        .replace_all(text, |caps: &Captures| {
            let mut html = String::from("\n<table class=\"table-bordered\"><thead><tr>");
            for cell in split_cells(&caps[1]) {
                let _ = write!(html, "<th>{cell}</th>");
            }
            html.push_str("</tr></thead><tbody>");

            for row in caps[2].lines().filter(|l| !l.trim().is_empty()) {
                html.push_str("<tr>");
                for cell in split_cells(strip_outer_pipes(row)) {
                    let _ = write!(html, "<td>{cell}</td>");
                }
                html.push_str("</tr>");
            }

            html.push_str("</tbody></table>\n\n");
            html
        })
        .into_owned()
}

fn strip_outer_pipes(row: &str) -> &str {
    let row = row.trim();
    let row = row.strip_prefix('|').unwrap_or(row);
    row.strip_suffix('|').unwrap_or(row)
}

fn split_cells(inner: &str) -> impl Iterator<Item = &str> {
    inner.split('|').map(str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn two_by_two_table() {
        let source = "| Name | Age |\n|------|-----|\n| Ada | 36 |\n| Alan | 41 |\n";

        let out = replace_tables(source);

        assert_eq!(
            out,
            "\n<table class=\"table-bordered\"><thead><tr><th>Name</th><th>Age</th></tr></thead>\
             <tbody><tr><td>Ada</td><td>36</td></tr><tr><td>Alan</td><td>41</td></tr></tbody></table>\n\n"
        );
    }

    #[test]
    fn keeps_empty_inner_cells() {
        let source = "| a | b | c |\n|---|:-:|---|\n| 1 |   | 3 |\n";

        let out = replace_tables(source);

        assert!(out.contains("<tr><td>1</td><td></td><td>3</td></tr>"));
    }

    #[test]
    fn leaves_surrounding_text() {
        let source = "Before\n| h |\n| - |\n| v |\nAfter\n";

        let out = replace_tables(source);

        assert!(out.starts_with("Before\n\n<table"));
        assert!(out.ends_with("</table>\n\nAfter\n"));
    }

    #[test]
    fn table_without_body() {
        let out = replace_tables("| h1 | h2 |\n| --- | --- |");

        assert!(out.contains("<th>h1</th><th>h2</th>"));
        assert!(out.contains("<tbody></tbody>"));
    }

    #[test]
    fn ignores_pipes_without_separator() {
        let source = "| not | a table |\nplain text\n";

        assert_eq!(replace_tables(source), source);
    }
}
