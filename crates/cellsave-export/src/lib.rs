//! cellsave-export: Pure download payload builders (sans-IO)
//!
//! Builds the content of client-side file downloads (CSV text and
//! spreadsheet bytes) and runs the download action against an abstract
//! [`DownloadHost`].  Nothing here touches browser APIs; the
//! `cellsave-io` crate provides the browser host.

pub mod action;
pub mod config;
pub mod csv;
pub mod format;
pub mod latin1;

pub use action::{
    Cancelable, DownloadAction, DownloadError, DownloadHost, ObjectUrl, Payload, PayloadBytes,
    make_csv_download_action, make_download_action, make_xlsx_download_action,
};
pub use config::{ConfigError, DownloadConfig};
pub use csv::{Table, to_csv};
pub use format::DownloadFormat;
pub use latin1::ByteStringError;
