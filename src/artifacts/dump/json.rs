//! JSON string encoding
//!
//! Strings are written the way Python's `json.dumps` writes them: quotes,
//! backslashes and control characters escaped, and with `ascii_only` every
//! character outside printable ASCII as a lowercase `\uXXXX` escape (UTF-16
//! surrogate pairs above the BMP).

use serde::Serialize;
use serde_json::ser::Formatter;
use std::io;

struct EscapingFormatter {
    ascii_only: bool,
}

impl Formatter for EscapingFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if !self.ascii_only {
            return writer.write_all(fragment.as_bytes());
        }

        let mut start = 0;
        for (index, ch) in fragment.char_indices() {
            if ch.is_ascii() && ch != '\x7f' {
                continue;
            }

            writer.write_all(fragment[start..index].as_bytes())?;
            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{unit:04x}")?;
            }
            start = index + ch.len_utf8();
        }

        writer.write_all(fragment[start..].as_bytes())
    }
}

/// Encode `value` as a quoted JSON string literal.
pub fn to_json_string(value: &str, ascii_only: bool) -> anyhow::Result<String> {
    let mut encoded = Vec::with_capacity(value.len() + 2);
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut encoded, EscapingFormatter { ascii_only });
    value.serialize(&mut serializer)?;

    Ok(String::from_utf8(encoded)?)
}
