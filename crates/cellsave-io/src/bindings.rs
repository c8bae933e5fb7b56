//! JavaScript entry points.
//!
//! Pages that are not built with Dioxus bind downloads from plain
//! JavaScript:
//!
//! ```js
//! import init, { fileDownloader, xlsxFileDownloader } from "./cellsave_io.js";
//! await init();
//! button.addEventListener("click", fileDownloader(() => table.toCsv(), "data.csv"));
//! ```
//!
//! Each function returns a click handler.  The producer is called with
//! no arguments on every click and must return a string; for
//! spreadsheets, a byte string (one character per byte).
//!
//! A failed download throws out of the handler, so the page's own
//! `try`/`catch` or `window.onerror` sees it.  The object URL, if one
//! was created, is revoked before the exception leaves.

use std::fmt;

use cellsave_export::{
    DownloadAction, DownloadConfig, DownloadError, make_csv_download_action,
    make_download_action, make_xlsx_download_action,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::download::{DomEvent, WebHost};

/// Failures of a JavaScript content producer.
#[derive(Debug, thiserror::Error)]
pub enum ProducerError {
    /// The producer threw.
    #[error("producer threw: {0}")]
    Threw(String),

    /// The producer returned something other than a string.
    #[error("producer returned {0} instead of a string")]
    NotAString(String),
}

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

/// Wrap a JS function as a content producer.
fn js_producer(producer: js_sys::Function) -> impl FnMut() -> Result<String, ProducerError> {
    move || {
        let value = producer
            .call0(&JsValue::NULL)
            .map_err(|e| ProducerError::Threw(describe(&e)))?;
        value
            .as_string()
            .ok_or_else(|| ProducerError::NotAString(describe(&value)))
    }
}

/// Message carried by the exception a failed handler throws.
fn failure_message(file_name: &str, error: &DownloadError) -> String {
    format!("download of {file_name:?} failed: {error}")
}

/// Turn an action into a JS click handler `(event?) => void`.
///
/// The handler accepts a missing or non-`Event` argument, in which case
/// no default action is suppressed.  Failures are thrown as a string.
fn click_handler<F, E>(mut action: DownloadAction<F>) -> js_sys::Function
where
    F: FnMut() -> Result<String, E> + 'static,
    E: fmt::Display + 'static,
{
    let handler = Closure::<dyn FnMut(JsValue) -> Result<(), JsValue>>::new(
        move |event: JsValue| {
            let outcome = match event.dyn_ref::<web_sys::Event>() {
                Some(event) => action.invoke(&WebHost, &DomEvent(event)),
                None => action.invoke(&WebHost, &()),
            };
            outcome.map_err(|e| JsValue::from_str(&failure_message(action.file_name(), &e)))
        },
    );
    handler.into_js_value().unchecked_into()
}

/// Click handler that saves the producer's text as a CSV file.
#[wasm_bindgen(js_name = fileDownloader)]
#[must_use]
pub fn file_downloader(producer: js_sys::Function, file_name: String) -> js_sys::Function {
    click_handler(make_csv_download_action(js_producer(producer), file_name))
}

/// Click handler that saves the producer's byte string as an `.xlsx` file.
#[wasm_bindgen(js_name = xlsxFileDownloader)]
#[must_use]
pub fn xlsx_file_downloader(producer: js_sys::Function, file_name: String) -> js_sys::Function {
    click_handler(make_xlsx_download_action(js_producer(producer), file_name))
}

/// Click handler configured from a JSON `DownloadConfig`, e.g.
/// `{"file_name": "counts.xlsx", "format": "xlsx"}`.
///
/// # Errors
///
/// Throws a string describing the problem when the config is malformed
/// or the file name is unusable.
#[wasm_bindgen(js_name = downloaderFromConfig)]
pub fn downloader_from_config(
    producer: js_sys::Function,
    config_json: &str,
) -> Result<js_sys::Function, JsValue> {
    let config =
        DownloadConfig::from_json(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(click_handler(make_download_action(
        js_producer(producer),
        config,
    )))
}
