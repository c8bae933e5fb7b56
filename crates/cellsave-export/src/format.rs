//! Download formats and their MIME types.

use serde::{Deserialize, Serialize};

/// MIME type announced for CSV downloads.
pub const CSV_MIME_TYPE: &str = "text/csv";

/// MIME type announced for Office Open XML spreadsheet downloads.
pub const XLSX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// The kind of file a download action produces.
///
/// Determines both the MIME tag on the blob and how the producer's
/// string is turned into bytes: CSV text is passed through as-is,
/// spreadsheet content is a byte string (see [`crate::latin1`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadFormat {
    /// Comma-separated text.
    #[default]
    Csv,
    /// Binary `.xlsx` workbook, produced as a byte string.
    Xlsx,
}

impl DownloadFormat {
    /// MIME type used to tag the blob.
    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Csv => CSV_MIME_TYPE,
            Self::Xlsx => XLSX_MIME_TYPE,
        }
    }

    /// Conventional file extension, without the leading dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
        }
    }

    /// `true` when the producer's string must be converted byte-for-byte.
    #[must_use]
    pub const fn is_binary(self) -> bool {
        matches!(self, Self::Xlsx)
    }
}
