//! JSON record → XML document.
//!
//! The layout is fixed: every line starts with a single space and every
//! nesting level adds one more, lines are joined with `\n` and there is no
//! XML declaration nor trailing newline. Text is escaped with numeric
//! references for quotes and line breaks (`&#34;`, `&#39;`, `&#xA;`).

use crate::core::Record;
use crate::utils::error::ConvertError;
use std::fmt::Display;

const PREFIX: &str = " ";
const INDENT: &str = " ";

/// Parses `data` as a [`Record`] and renders it as XML.
pub fn convert(data: &[u8]) -> Result<Vec<u8>, ConvertError> {
    let record = parse_record(data)?;
    Ok(to_xml(&record).into_bytes())
}

/// Parses `data` into a non-empty [`Record`].
pub fn parse_record(data: &[u8]) -> Result<Record, ConvertError> {
    let record: Record = serde_json::from_slice(data).map_err(ConvertError::Malformed)?;

    // Data could be valid json but not a record.
    if record.is_empty() {
        return Err(ConvertError::UnrecognizedSchema);
    }
    Ok(record)
}

pub fn to_xml(record: &Record) -> String {
    let mut doc = XmlLines::default();
    doc.open(Record::ROOT);
    doc.leaf("Id", record.id);
    doc.open("name");
    doc.leaf("first", &record.first_name);
    doc.leaf("last", &record.last_name);
    doc.close("name");
    doc.leaf("City", &record.city);
    doc.leaf("State", &record.state);
    doc.close(Record::ROOT);
    doc.finish()
}

#[derive(Default)]
struct XmlLines {
    lines: Vec<String>,
    depth: usize,
}

impl XmlLines {
    fn indent(&self) -> String {
        format!("{}{}", PREFIX, INDENT.repeat(self.depth))
    }

    fn open(&mut self, tag: &str) {
        self.lines.push(format!("{}<{}>", self.indent(), tag));
        self.depth += 1;
    }

    fn close(&mut self, tag: &str) {
        self.depth -= 1;
        self.lines.push(format!("{}</{}>", self.indent(), tag));
    }

    fn leaf(&mut self, tag: &str, value: impl Display) {
        let text = escape_text(&value.to_string());
        self.lines.push(format!("{}<{tag}>{}</{tag}>", self.indent(), text));
    }

    fn finish(self) -> String {
        self.lines.join("\n")
    }
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\t' => out.push_str("&#x9;"),
            '\n' => out.push_str("&#xA;"),
            '\r' => out.push_str("&#xD;"),
            c if is_xml_char(c) => out.push(c),
            _ => out.push(char::REPLACEMENT_CHARACTER),
        }
    }
    out
}

/// The `Char` production of XML 1.0.
fn is_xml_char(c: char) -> bool {
    matches!(c, '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}
