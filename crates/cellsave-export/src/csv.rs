//! CSV table serializer.
//!
//! Produces the text a CSV download producer usually returns: a header
//! record followed by data records, optionally with a leading index
//! column holding row labels (e.g. well names of a count matrix).
//!
//! ## Quoting
//!
//! A field is wrapped in double quotes when it contains a comma, a
//! double quote, a carriage return, or a newline.  Embedded double
//! quotes are doubled.  Every other field is written verbatim.
//!
//! Records end with `\n`.
//!
//! Serialization only builds the text; handing it to a download is the
//! caller's job.

use std::fmt::Write;

/// A rectangular-ish table of string cells.
///
/// Rows are written as given; a row shorter or longer than the header
/// is not padded or truncated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// Column names.  An empty header is omitted from the output.
    pub header: Vec<String>,

    /// Data records.
    pub rows: Vec<Vec<String>>,

    /// Optional index column: `(label, row labels)`.
    ///
    /// The label heads the first column; row `i` is prefixed with
    /// `row_labels[i]` (or an empty field when there are fewer labels
    /// than rows).
    pub index: Option<(String, Vec<String>)>,
}

impl Table {
    /// Create a table from a header and rows, with no index column.
    #[must_use]
    pub const fn new(header: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            header,
            rows,
            index: None,
        }
    }

    /// Attach an index column.
    #[must_use]
    pub fn with_index(mut self, label: impl Into<String>, row_labels: Vec<String>) -> Self {
        self.index = Some((label.into(), row_labels));
        self
    }
}

/// Serialize a [`Table`] to CSV text.
///
/// # Examples
///
/// ```
/// use cellsave_export::csv::{Table, to_csv};
///
/// let table = Table::new(
///     vec!["a".into(), "b".into()],
///     vec![vec!["1".into(), "2".into()]],
/// );
/// assert_eq!(to_csv(&table), "a,b\n1,2\n");
/// ```
#[must_use]
pub fn to_csv(table: &Table) -> String {
    let mut out = String::new();

    if !table.header.is_empty() {
        let label = table.index.as_ref().map(|(label, _)| label.as_str());
        write_record(&mut out, label, &table.header);
    }

    for (i, row) in table.rows.iter().enumerate() {
        let label = table
            .index
            .as_ref()
            .map(|(_, labels)| labels.get(i).map_or("", String::as_str));
        write_record(&mut out, label, row);
    }

    out
}

/// Append one record (optionally prefixed by an index field).
fn write_record(out: &mut String, index: Option<&str>, fields: &[String]) {
    let mut first = true;
    for field in index.into_iter().chain(fields.iter().map(String::as_str)) {
        if !first {
            out.push(',');
        }
        first = false;
        write_field(out, field);
    }
    out.push('\n');
}

fn write_field(out: &mut String, field: &str) {
    if needs_quoting(field) {
        let _ = write!(out, "\"{}\"", field.replace('"', "\"\""));
    } else {
        out.push_str(field);
    }
}

fn needs_quoting(field: &str) -> bool {
    field.contains([',', '"', '\r', '\n'])
}
