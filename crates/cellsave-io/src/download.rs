//! File download via Blob URLs.
//!
//! [`WebHost`] implements [`DownloadHost`] with the browser's `Blob`,
//! `URL.createObjectURL`, and a programmatically clicked temporary
//! `<a download>` element.  Text payloads become a string blob part,
//! binary payloads a `Uint8Array` part.
//!
//! All functions in this module require a browser environment
//! (`wasm32-unknown-unknown` target).

use cellsave_export::{Cancelable, DownloadError, DownloadHost, Payload, PayloadBytes};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use web_sys::BlobPropertyBag;

/// Convert a thrown JS value into a [`DownloadError::Browser`].
#[allow(clippy::needless_pass_by_value)] // used as `map_err(js_error)`
pub fn js_error(value: JsValue) -> DownloadError {
    DownloadError::Browser(format!("{value:?}"))
}

/// The browser's download primitives, looked up on the global `window`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebHost;

impl WebHost {
    fn document() -> Result<web_sys::Document, DownloadError> {
        let window =
            web_sys::window().ok_or_else(|| DownloadError::Browser("no global window".into()))?;
        window
            .document()
            .ok_or_else(|| DownloadError::Browser("no document".into()))
    }
}

impl DownloadHost for WebHost {
    fn create_object_url(&self, payload: &Payload) -> Result<String, DownloadError> {
        let opts = BlobPropertyBag::new();
        opts.set_type(payload.mime_type);

        let parts = js_sys::Array::new();
        let blob = match &payload.bytes {
            PayloadBytes::Text(text) => {
                parts.push(&JsValue::from_str(text));
                web_sys::Blob::new_with_str_sequence_and_options(&parts, &opts)
            }
            PayloadBytes::Binary(bytes) => {
                parts.push(&js_sys::Uint8Array::from(bytes.as_slice()));
                web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &opts)
            }
        }
        .map_err(js_error)?;

        web_sys::Url::create_object_url_with_blob(&blob).map_err(js_error)
    }

    fn click_anchor(&self, url: &str, file_name: &str) -> Result<(), DownloadError> {
        let document = Self::document()?;

        let anchor: web_sys::HtmlAnchorElement = document
            .create_element("a")
            .map_err(js_error)?
            .dyn_into::<web_sys::HtmlAnchorElement>()
            .map_err(|e| DownloadError::Browser(format!("failed to cast element: {e:?}")))?;

        anchor.set_href(url);
        anchor.set_download(file_name);

        // Firefox ignores clicks on detached anchors.
        let body = document
            .body()
            .ok_or_else(|| DownloadError::Browser("no document body".into()))?;
        body.append_child(&anchor).map_err(js_error)?;
        anchor.click();

        // The download has started; a failed removal is not a failed download.
        let _ = body.remove_child(&anchor);

        Ok(())
    }

    fn revoke_object_url(&self, url: &str) {
        let _ = web_sys::Url::revoke_object_url(url);
    }
}

/// A DOM event passed to a download action.
#[derive(Debug, Clone, Copy)]
pub struct DomEvent<'a>(pub &'a web_sys::Event);

impl Cancelable for DomEvent<'_> {
    fn prevent_default(&self) {
        self.0.prevent_default();
    }
}
