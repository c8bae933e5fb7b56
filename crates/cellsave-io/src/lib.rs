//! cellsave-io: Browser download host, JavaScript bindings, and Dioxus
//! components.
//!
//! Wires the pure download action from `cellsave-export` to the
//! browser: Blob and object URL creation, the temporary anchor click,
//! plain-JavaScript click handlers, and a reusable download button.

pub mod bindings;
pub mod components;
pub mod download;

pub use components::DownloadButton;
pub use download::{DomEvent, WebHost};
