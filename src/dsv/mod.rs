// src/dsv/mod.rs
pub mod coerce;
pub mod types;

pub use coerce::{coerce, looks_numeric, MAX_NUMERIC_LEN};
pub use types::{Record, Table, Value};

use tracing::{instrument, trace};

/// Split like `String.prototype.split`: an empty separator yields one piece
/// per character.
fn split_on<'a>(s: &'a str, sep: &str) -> Vec<&'a str> {
    if sep.is_empty() {
        s.char_indices()
            .map(|(i, c)| &s[i..i + c.len_utf8()])
            .collect()
    } else {
        s.split(sep).collect()
    }
}

/// Parse delimiter-separated text into header-keyed records.
///
/// - `None` / empty input → `None` ("no data").
/// - header only, or a single line → `Some(vec![])`.
/// - empty lines anywhere in the body are skipped.
/// - short rows leave trailing keys present but absent; long rows are cut
///   at the header length.
/// - numeric-looking fields (see [`coerce::looks_numeric`]) become numbers.
#[instrument(level = "debug", skip(raw), fields(len = raw.map(str::len).unwrap_or(0)))]
pub fn parse(raw: Option<&str>, field_sep: &str, line_sep: &str) -> Option<Table> {
    let raw = match raw {
        Some(r) if !r.is_empty() => r,
        _ => return None,
    };

    let lines = split_on(raw, line_sep);
    if lines.len() < 2 {
        return Some(Vec::new());
    }

    let header = split_on(lines[0], field_sep);
    let mut table = Vec::with_capacity(lines.len() - 1);

    for (idx, line) in lines.iter().enumerate().skip(1) {
        if line.is_empty() {
            trace!(line = idx, "skipping empty line");
            continue;
        }
        let parts = split_on(line, field_sep);

        let record: Record = header
            .iter()
            .enumerate()
            .map(|(j, name)| {
                let value = parts.get(j).map(|p| coerce(p));
                (name.to_string(), value)
            })
            .collect();
        table.push(record);
    }

    trace!(records = table.len(), "parsed");
    Some(table)
}

/// Comma/newline flavour.
pub fn parse_csv(raw: Option<&str>) -> Option<Table> {
    parse(raw, ",", "\n")
}

/// Tab/newline flavour, what the data endpoints and demo files serve.
pub fn parse_tsv(raw: Option<&str>) -> Option<Table> {
    parse(raw, "\t", "\n")
}
