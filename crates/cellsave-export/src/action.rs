//! The download action.
//!
//! A [`DownloadAction`] pairs a content producer with a suggested file
//! name and format.  Invoking it with the triggering event:
//!
//! 1. suppresses the event's default behavior,
//! 2. calls the producer (at invocation time, never at setup time),
//! 3. converts the content into a [`Payload`] tagged with the format's
//!    MIME type,
//! 4. creates a short-lived object URL for it,
//! 5. clicks a download anchor pointing at that URL,
//! 6. revokes the URL.
//!
//! Browser primitives sit behind [`DownloadHost`] so the sequence can
//! be driven natively in tests.  The object URL is held by an
//! [`ObjectUrl`] guard and revoked when it goes out of scope, so a
//! failed click does not leak it.

use std::fmt;

use crate::config::DownloadConfig;
use crate::format::DownloadFormat;
use crate::latin1::{self, ByteStringError};

/// Errors that can occur while running a download action.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// The content producer reported a failure.
    #[error("content producer failed: {0}")]
    Producer(String),

    /// Spreadsheet content contained a character outside `0..=255`.
    #[error("spreadsheet content is not a byte string: {0}")]
    Conversion(#[from] ByteStringError),

    /// A browser API call returned an error or a required object was missing.
    #[error("browser API error: {0}")]
    Browser(String),
}

/// An event whose default action can be suppressed.
///
/// The triggering event is always passed to [`DownloadAction::invoke`]
/// explicitly.  `()` stands for "no event", e.g. a programmatic call.
pub trait Cancelable {
    /// Suppress the event's default action (navigation, form submit).
    fn prevent_default(&self);
}

impl Cancelable for () {
    fn prevent_default(&self) {}
}

/// The browser primitives a download needs.
pub trait DownloadHost {
    /// Wrap `payload` in a blob and return an object URL addressing it.
    ///
    /// # Errors
    ///
    /// [`DownloadError::Browser`] when the blob or URL cannot be created.
    fn create_object_url(&self, payload: &Payload) -> Result<String, DownloadError>;

    /// Simulate a click on `<a href=url download=file_name>`.
    ///
    /// # Errors
    ///
    /// [`DownloadError::Browser`] when the anchor cannot be created or
    /// attached.
    fn click_anchor(&self, url: &str, file_name: &str) -> Result<(), DownloadError>;

    /// Invalidate an object URL.  Best effort: failures are swallowed,
    /// the download has already been initiated.
    fn revoke_object_url(&self, url: &str);
}

impl<H: DownloadHost + ?Sized> DownloadHost for &H {
    fn create_object_url(&self, payload: &Payload) -> Result<String, DownloadError> {
        (**self).create_object_url(payload)
    }

    fn click_anchor(&self, url: &str, file_name: &str) -> Result<(), DownloadError> {
        (**self).click_anchor(url, file_name)
    }

    fn revoke_object_url(&self, url: &str) {
        (**self).revoke_object_url(url);
    }
}

/// Content of a payload: text passed through, or converted bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadBytes {
    /// UTF-8 text, stored by the blob as its UTF-8 encoding.
    Text(String),
    /// Raw bytes.
    Binary(Vec<u8>),
}

/// The content of one download, ready to be wrapped in a blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    /// The bytes to store.
    pub bytes: PayloadBytes,
    /// MIME type tag for the blob.
    pub mime_type: &'static str,
}

impl Payload {
    /// Build the payload for `format` from producer output.
    ///
    /// CSV content is kept as text.  Spreadsheet content is converted from
    /// a byte string.
    ///
    /// # Errors
    ///
    /// [`DownloadError::Conversion`] when spreadsheet content contains a
    /// character above `U+00FF`.
    pub fn build(format: DownloadFormat, content: String) -> Result<Self, DownloadError> {
        let bytes = if format.is_binary() {
            PayloadBytes::Binary(latin1::to_bytes(&content)?)
        } else {
            PayloadBytes::Text(content)
        };
        Ok(Self {
            bytes,
            mime_type: format.mime_type(),
        })
    }

    /// The bytes the blob will hold.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match &self.bytes {
            PayloadBytes::Text(text) => text.as_bytes(),
            PayloadBytes::Binary(bytes) => bytes,
        }
    }

    /// Size of the blob in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// `true` if the blob will be empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A live object URL, revoked when dropped.
pub struct ObjectUrl<'h, H: DownloadHost + ?Sized> {
    host: &'h H,
    url: String,
}

impl<'h, H: DownloadHost + ?Sized> ObjectUrl<'h, H> {
    /// Create an object URL for `payload` on `host`.
    ///
    /// # Errors
    ///
    /// Propagates [`DownloadHost::create_object_url`] failures; nothing
    /// needs revoking in that case.
    pub fn create(host: &'h H, payload: &Payload) -> Result<Self, DownloadError> {
        let url = host.create_object_url(payload)?;
        Ok(Self { host, url })
    }

    /// The URL string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.url
    }
}

impl<H: DownloadHost + ?Sized> Drop for ObjectUrl<'_, H> {
    fn drop(&mut self) {
        self.host.revoke_object_url(&self.url);
    }
}

impl<H: DownloadHost + ?Sized> fmt::Debug for ObjectUrl<'_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ObjectUrl").field(&self.url).finish()
    }
}

/// A deferred, user-triggered download.
///
/// Holds the producer, the suggested file name (used verbatim), and the
/// format.  Nothing is produced until [`invoke`](Self::invoke); each
/// invocation creates and releases its own blob and URL.
pub struct DownloadAction<F> {
    producer: F,
    file_name: String,
    format: DownloadFormat,
}

/// Build a CSV download action.
///
/// The producer's text is stored as-is under `text/csv`.
pub fn make_csv_download_action<F, E>(
    producer: F,
    file_name: impl Into<String>,
) -> DownloadAction<F>
where
    F: FnMut() -> Result<String, E>,
    E: fmt::Display,
{
    DownloadAction::new(producer, file_name, DownloadFormat::Csv)
}

/// Build a spreadsheet (`.xlsx`) download action.
///
/// The producer must return a byte string (see [`crate::latin1`]).
pub fn make_xlsx_download_action<F, E>(
    producer: F,
    file_name: impl Into<String>,
) -> DownloadAction<F>
where
    F: FnMut() -> Result<String, E>,
    E: fmt::Display,
{
    DownloadAction::new(producer, file_name, DownloadFormat::Xlsx)
}

/// Build a download action from a validated [`DownloadConfig`].
pub fn make_download_action<F, E>(producer: F, config: DownloadConfig) -> DownloadAction<F>
where
    F: FnMut() -> Result<String, E>,
    E: fmt::Display,
{
    DownloadAction::new(producer, config.file_name, config.format)
}

impl<F, E> DownloadAction<F>
where
    F: FnMut() -> Result<String, E>,
    E: fmt::Display,
{
    /// Create an action for any format.
    pub fn new(producer: F, file_name: impl Into<String>, format: DownloadFormat) -> Self {
        Self {
            producer,
            file_name: file_name.into(),
            format,
        }
    }

    /// Run the download.
    ///
    /// The event's default action is suppressed first, even if the
    /// download then fails.  No object URL exists until the content has
    /// been produced and converted, and once created it is revoked on
    /// every exit path.
    ///
    /// # Errors
    ///
    /// - [`DownloadError::Producer`] if the producer fails.
    /// - [`DownloadError::Conversion`] if spreadsheet content is not a
    ///   byte string.
    /// - [`DownloadError::Browser`] if the host fails to create the URL
    ///   or click the anchor.
    pub fn invoke<H, C>(&mut self, host: &H, event: &C) -> Result<(), DownloadError>
    where
        H: DownloadHost + ?Sized,
        C: Cancelable + ?Sized,
    {
        event.prevent_default();

        let content = (self.producer)().map_err(|e| DownloadError::Producer(e.to_string()))?;
        let payload = Payload::build(self.format, content)?;

        let url = ObjectUrl::create(host, &payload)?;
        host.click_anchor(url.as_str(), &self.file_name)
    }

    /// Suggested save name.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Output format.
    #[must_use]
    pub const fn format(&self) -> DownloadFormat {
        self.format
    }
}

impl<F> fmt::Debug for DownloadAction<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DownloadAction")
            .field("file_name", &self.file_name)
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}
