//! Download button component.

use cellsave_export::{Cancelable, DownloadAction, DownloadError, DownloadFormat};
use dioxus::prelude::*;

use crate::download::WebHost;

/// A Dioxus click event passed to a download action.
struct ClickEvent<'a>(&'a Event<MouseData>);

impl Cancelable for ClickEvent<'_> {
    fn prevent_default(&self) {
        self.0.prevent_default();
    }
}

/// Message shown under the button when a download fails.
fn failure_message(error: &DownloadError) -> String {
    match error {
        DownloadError::Conversion(_) => {
            format!("Download failed: the spreadsheet data is corrupt ({error})")
        }
        DownloadError::Producer(_) | DownloadError::Browser(_) => {
            format!("Download failed: {error}")
        }
    }
}

/// Props for the [`DownloadButton`] component.
#[derive(Props, Clone, PartialEq)]
pub struct DownloadButtonProps {
    /// Button text.
    label: String,
    /// Suggested save name, used verbatim.
    file_name: String,
    /// Output format.  Defaults to CSV.
    #[props(default)]
    format: DownloadFormat,
    /// Produces the file content when the button is clicked.  For
    /// spreadsheets this must be a byte string.
    content: Callback<(), String>,
    /// Disables the button, e.g. while no data is loaded.
    #[props(default)]
    disabled: bool,
}

/// A button that saves in-memory content as a file.
///
/// The content callback runs on each click, so the saved file always
/// reflects the current data.  A failure is shown below the button
/// until the next successful download.
#[component]
pub fn DownloadButton(props: DownloadButtonProps) -> Element {
    let mut error = use_signal(|| Option::<String>::None);

    let download_click = {
        let content = props.content;
        let file_name = props.file_name.clone();
        let format = props.format;
        move |evt: Event<MouseData>| {
            let mut action = DownloadAction::new(
                || Ok::<_, std::convert::Infallible>(content.call(())),
                file_name.clone(),
                format,
            );
            match action.invoke(&WebHost, &ClickEvent(&evt)) {
                Ok(()) => error.set(None),
                Err(e) => {
                    web_sys::console::warn_1(
                        &format!("download of {file_name:?} failed: {e}").into(),
                    );
                    error.set(Some(failure_message(&e)));
                }
            }
        }
    };

    let class = if props.disabled {
        "px-4 py-2 bg-[var(--btn-disabled)] rounded text-[var(--text-disabled)] cursor-not-allowed"
    } else {
        "px-4 py-2 bg-[var(--btn-primary)] hover:bg-[var(--btn-primary-hover)] rounded text-white font-medium transition-colors cursor-pointer"
    };

    rsx! {
        div { class: "space-y-1",
            button {
                class: "{class}",
                disabled: props.disabled,
                title: "{props.file_name}",
                onclick: download_click,
                "{props.label}"
            }
            if let Some(ref err) = error() {
                p { class: "text-[var(--text-error)] text-sm", "{err}" }
            }
        }
    }
}
