//! Dioxus UI components for cellsave.

mod download_button;

pub use download_button::DownloadButton;
