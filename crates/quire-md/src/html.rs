//! Markdown to HTML conversion with admonition blocks.

use std::fmt::Write;
use std::sync::LazyLock;

use pulldown_cmark::{html, Options, Parser};
use regex::Regex;

/// `!!! type "Title"` opening line of an admonition.
static ADMONITION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^!!![ \t]+([\w-]+)(?:[ \t]+"(.*)")?[ \t]*$"#).unwrap());

const INDENT: &str = "    ";

/// Convert rewritten markdown into an HTML fragment.
///
/// Admonition blocks (an `!!!` line followed by four-space indented content)
/// become `<div class="admonition type">` elements. Their body is converted
/// recursively, so admonitions may contain any other markdown.
pub fn to_html(markdown: &str) -> String {
    let lines: Vec<&str> = markdown.split_inclusive('\n').collect();
    let mut output = String::new();
    let mut pending = String::new();
    let mut i = 0;

    while i < lines.len() {
        let Some(caps) = ADMONITION.captures(lines[i].trim_end()) else {
            pending.push_str(lines[i]);
            i += 1;
            continue;
        };

        output.push_str(&render_markdown(&pending));
        pending.clear();

        let kind = &caps[1];
        let title = caps
            .get(2)
            .map_or_else(|| capitalize(kind), |m| m.as_str().to_string());

        let (body, next) = collect_body(&lines, i + 1);
        i = next;

        let _ = write!(
            output,
            "<div class=\"admonition {}\">\n<p class=\"admonition-title\">{}</p>\n{}</div>\n",
            escape_html(kind),
            escape_html(&title),
            to_html(&body)
        );
    }

    output.push_str(&render_markdown(&pending));
    output
}

/// Gather the indented body of an admonition starting at `start`.
///
/// Blank lines belong to the body only when more indented lines follow them.
/// Returns the dedented body and the index of the first line after it.
fn collect_body(lines: &[&str], start: usize) -> (String, usize) {
    let mut body = String::new();
    let mut end = start;
    let mut i = start;

    while i < lines.len() {
        let line = lines[i];
        if let Some(content) = line.strip_prefix(INDENT).or_else(|| line.strip_prefix('\t')) {
            body.push_str(content);
            end = i + 1;
        } else if line.trim().is_empty() {
            body.push('\n');
        } else {
            break;
        }
        i += 1;
    }

    // Trailing blank lines stay outside the block.
    let trailing_blanks = i - end;
    for _ in 0..trailing_blanks {
        body.pop();
    }

    (body, end)
}

/// Plain markdown rendering.
fn render_markdown(content: &str) -> String {
    if content.trim().is_empty() {
        return String::new();
    }

    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;

    let parser = Parser::new_ext(content, options);

    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    html_output
}

/// Escape text for use inside HTML elements and attribute values.
pub fn escape_html(text: &str) -> String {
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

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
