//! Plain-text and HTML clipboard encodings of a value matrix
//!
//! Plain text is tab/newline delimited and decoded with the csv crate, so quoted
//! cells may carry tabs and newlines the way spreadsheet apps write them.
//! HTML is a bare `<table>`; decoding reads `<td>` cells only.

use std::io::Cursor;

use crate::error::GridError;

/// Tab-joined cells, newline-joined rows
pub fn encode_plain(matrix: &[Vec<String>]) -> String {
    matrix
        .iter()
        .map(|row| row.join("\t"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `<table>` with escaped cells and an optional `<th>` header row
pub fn encode_html(matrix: &[Vec<String>], header: Option<&[String]>) -> String {
    let mut html = String::from("<table>");

    if let Some(titles) = header {
        html.push_str("<tr>");
        for title in titles {
            html.push_str("<th>");
            html.push_str(&escape_html(title));
            html.push_str("</th>");
        }
        html.push_str("</tr>");
    }

    for row in matrix {
        html.push_str("<tr>");
        for cell in row {
            html.push_str("<td>");
            html.push_str(&escape_html(cell).replace('\n', "<br/>"));
            html.push_str("</td>");
        }
        html.push_str("</tr>");
    }

    html.push_str("</table>");
    html
}

pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Decode tab-delimited text into a rectangular matrix
///
/// Empty input decodes to a single empty cell.
pub fn parse_plain(text: &str) -> Result<Vec<Vec<String>>, GridError> {
    let text = text
        .strip_suffix("\r\n")
        .or_else(|| text.strip_suffix('\n'))
        .unwrap_or(text);

    if text.is_empty() {
        return Ok(vec![vec![String::new()]]);
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_reader(Cursor::new(text.as_bytes()));

    let mut rows: Vec<Vec<String>> = Vec::new();
    for (line_num, result) in reader.records().enumerate() {
        let record = result.map_err(|e| GridError::Parse {
            message: e.to_string(),
            line: Some(line_num + 1),
        })?;
        rows.push(record.iter().map(|s| s.to_string()).collect());
    }

    if rows.is_empty() {
        rows.push(vec![String::new()]);
    }
    Ok(pad_rows(rows))
}

/// Decode an HTML table. Falls back to plain text when there is no table.
pub fn parse_html(html: &str) -> Result<Vec<Vec<String>>, GridError> {
    let lower = html.to_ascii_lowercase();

    let Some(table_start) = lower.find("<table") else {
        return parse_plain(&decode_entities(&strip_tags(html)));
    };
    let table_end = lower[table_start..]
        .find("</table")
        .map_or(html.len(), |i| table_start + i);

    let mut rows = Vec::new();
    let mut cursor = table_start;
    while let Some(offset) = lower[cursor..table_end].find("<tr") {
        let row_start = cursor + offset;
        let row_end = lower[row_start + 3..table_end]
            .find("<tr")
            .map_or(table_end, |i| row_start + 3 + i);

        let cells = parse_cells(&html[row_start..row_end], &lower[row_start..row_end]);
        if !cells.is_empty() {
            rows.push(cells);
        }
        cursor = row_end;
    }

    if rows.is_empty() {
        return Ok(vec![vec![String::new()]]);
    }
    Ok(pad_rows(rows))
}

/// `<td>` contents of one `<tr>` segment. `<th>` cells are ignored.
fn parse_cells(segment: &str, lower: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut cursor = 0;

    while let Some(offset) = find_tag(&lower[cursor..], "td") {
        let open = cursor + offset;
        let Some(open_end) = lower[open..].find('>').map(|i| open + i + 1) else {
            break;
        };
        let close = lower[open_end..]
            .find("</td")
            .map_or(segment.len(), |i| open_end + i);

        cells.push(cell_text(&segment[open_end..close]));
        cursor = close;
    }

    cells
}

/// Offset of the next `<name>` or `<name ...>` opening tag
fn find_tag(haystack: &str, name: &str) -> Option<usize> {
    let needle = format!("<{}", name);
    let mut from = 0;
    while let Some(i) = haystack[from..].find(&needle) {
        let at = from + i;
        match haystack.as_bytes().get(at + needle.len()) {
            Some(b'>') | Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r') | Some(b'/') => {
                return Some(at)
            }
            _ => from = at + needle.len(),
        }
    }
    None
}

fn cell_text(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let with_breaks = replace_breaks(&collapsed);
    let text = decode_entities(&strip_tags(&with_breaks));
    text.lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
}

/// `<br>`, `<br/>` and `<br />` become newlines
fn replace_breaks(html: &str) -> String {
    let lower = html.to_ascii_lowercase();
    let mut out = String::with_capacity(html.len());
    let mut cursor = 0;
    while let Some(offset) = find_tag(&lower[cursor..], "br") {
        let at = cursor + offset;
        out.push_str(&html[cursor..at]);
        match lower[at..].find('>') {
            Some(end) => {
                out.push('\n');
                cursor = at + end + 1;
            }
            None => {
                cursor = at;
                break;
            }
        }
    }
    out.push_str(&html[cursor..]);
    out
}

fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

pub fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let entity_end = tail.find(';').filter(|&end| end <= 10);

        let decoded = entity_end.and_then(|end| decode_entity(&tail[1..end]));
        match (decoded, entity_end) {
            (Some(c), Some(end)) => {
                out.push(c);
                rest = &tail[end + 1..];
            }
            _ => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            let number = name.strip_prefix('#')?;
            let code = match number.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => number.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        }
    }
}

fn pad_rows(mut rows: Vec<Vec<String>>) -> Vec<Vec<String>> {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0).max(1);
    for row in &mut rows {
        row.resize(width, String::new());
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_encode_plain() {
        let m = matrix(&[&["a", "b"], &["c", "d"]]);
        assert_eq!(encode_plain(&m), "a\tb\nc\td");
    }

    #[test]
    fn test_encode_html_escapes_and_breaks() {
        let m = matrix(&[&["<b>&\"'", "two\nlines"]]);
        assert_eq!(
            encode_html(&m, None),
            "<table><tr><td>&lt;b&gt;&amp;&quot;&#039;</td><td>two<br/>lines</td></tr></table>"
        );
    }

    #[test]
    fn test_encode_html_header() {
        let m = matrix(&[&["1"]]);
        let header = vec!["Name".to_string()];
        assert_eq!(
            encode_html(&m, Some(&header)),
            "<table><tr><th>Name</th></tr><tr><td>1</td></tr></table>"
        );
    }

    #[test]
    fn test_parse_plain_pads_rows() {
        let parsed = parse_plain("a\tb\tc\nd\n").unwrap();
        assert_eq!(parsed, matrix(&[&["a", "b", "c"], &["d", "", ""]]));
    }

    #[test]
    fn test_parse_plain_quoted_cells() {
        let parsed = parse_plain("\"x\ty\"\t\"multi\nline\"").unwrap();
        assert_eq!(parsed, matrix(&[&["x\ty", "multi\nline"]]));
    }

    #[test]
    fn test_parse_plain_empty() {
        assert_eq!(parse_plain("").unwrap(), matrix(&[&[""]]));
        assert_eq!(parse_plain("\n").unwrap(), matrix(&[&[""]]));
    }

    #[test]
    fn test_parse_html_reads_td_only() {
        let html = "<meta charset='utf-8'><table><tr><th>H</th></tr>\
                    <tr><td>a &amp; b</td><td class=\"x\">two<br>lines</td></tr>\
                    <tr><td><span>c</span></td></tr></table>";
        let parsed = parse_html(html).unwrap();
        assert_eq!(parsed, matrix(&[&["a & b", "two\nlines"], &["c", ""]]));
    }

    #[test]
    fn test_parse_html_collapses_source_whitespace() {
        let html = "<TABLE>\n <TR>\n  <TD>\n   spaced\n   out\n  </TD>\n </TR>\n</TABLE>";
        assert_eq!(parse_html(html).unwrap(), matrix(&[&["spaced out"]]));
    }

    #[test]
    fn test_parse_html_without_table_falls_back() {
        let parsed = parse_html("<p>a\tb</p>").unwrap();
        assert_eq!(parsed, matrix(&[&["a", "b"]]));
    }

    #[test]
    fn test_html_round_trip_preserves_values() {
        let m = matrix(&[&["x < y", "it's"], &["line\nbreak", ""]]);
        assert_eq!(parse_html(&encode_html(&m, None)).unwrap(), m);
    }

    #[test]
    fn test_decode_numeric_entities() {
        assert_eq!(decode_entities("&#65;&#x42;&bogus;&"), "AB&bogus;&");
    }
}
