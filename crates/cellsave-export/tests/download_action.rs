//! Integration test: drive download actions against an in-memory host that
//! records blobs, object URLs, and anchor clicks.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use cellsave_export::{
    Cancelable, DownloadAction, DownloadConfig, DownloadError, DownloadFormat, DownloadHost,
    Payload, Table, latin1, make_csv_download_action, make_download_action,
    make_xlsx_download_action, to_csv,
};

/// A saved file as the browser would see it.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Artifact {
    file_name: String,
    mime_type: &'static str,
    bytes: Vec<u8>,
}

/// Records everything a browser would do.  Live object URLs resolve to
/// their payload until revoked.
#[derive(Default)]
struct RecordingHost {
    next_id: Cell<u32>,
    live: RefCell<HashMap<String, Payload>>,
    created: RefCell<Vec<String>>,
    revoked: RefCell<Vec<String>>,
    artifacts: RefCell<Vec<Artifact>>,
    fail_click: Cell<bool>,
}

impl RecordingHost {
    fn resolves(&self, url: &str) -> bool {
        self.live.borrow().contains_key(url)
    }

    fn artifacts(&self) -> Vec<Artifact> {
        self.artifacts.borrow().clone()
    }
}

impl DownloadHost for RecordingHost {
    fn create_object_url(&self, payload: &Payload) -> Result<String, DownloadError> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let url = format!("blob:test/{id}");
        self.live.borrow_mut().insert(url.clone(), payload.clone());
        self.created.borrow_mut().push(url.clone());
        Ok(url)
    }

    fn click_anchor(&self, url: &str, file_name: &str) -> Result<(), DownloadError> {
        if self.fail_click.get() {
            return Err(DownloadError::Browser("no document body".into()));
        }
        let live = self.live.borrow();
        let payload = live
            .get(url)
            .ok_or_else(|| DownloadError::Browser(format!("unresolvable URL {url}")))?;
        self.artifacts.borrow_mut().push(Artifact {
            file_name: file_name.to_owned(),
            mime_type: payload.mime_type,
            bytes: payload.as_bytes().to_vec(),
        });
        Ok(())
    }

    fn revoke_object_url(&self, url: &str) {
        self.live.borrow_mut().remove(url);
        self.revoked.borrow_mut().push(url.to_owned());
    }
}

/// An event that remembers whether its default was prevented.
#[derive(Default)]
struct ClickEvent {
    prevented: Cell<bool>,
}

impl Cancelable for ClickEvent {
    fn prevent_default(&self) {
        self.prevented.set(true);
    }
}

fn ok(text: &str) -> impl FnMut() -> Result<String, String> + '_ {
    move || Ok(text.to_owned())
}

#[test]
fn csv_example_saves_named_text_file() {
    let host = RecordingHost::default();
    let event = ClickEvent::default();
    let mut action = make_csv_download_action(ok("a,b\n1,2"), "data.csv");

    action.invoke(&host, &event).unwrap();

    assert!(event.prevented.get());
    assert_eq!(
        host.artifacts(),
        vec![Artifact {
            file_name: "data.csv".into(),
            mime_type: "text/csv",
            bytes: b"a,b\n1,2".to_vec(),
        }]
    );
}

#[test]
fn csv_content_is_read_back_unchanged() {
    let text = "name,note\n\u{e9}l\u{e8}ve,\"x, y\"\n\u{1f9ea},\u{20ac}\n";
    let host = RecordingHost::default();
    let mut action = make_csv_download_action(ok(text), "unicode.csv");

    action.invoke(&host, &()).unwrap();

    let artifact = &host.artifacts()[0];
    assert_eq!(String::from_utf8(artifact.bytes.clone()).unwrap(), text);
}

#[test]
fn xlsx_example_converts_byte_string() {
    let host = RecordingHost::default();
    let mut action = make_xlsx_download_action(ok("\u{41}\u{42}"), "all.xlsx");

    action.invoke(&host, &ClickEvent::default()).unwrap();

    let artifact = &host.artifacts()[0];
    assert_eq!(artifact.file_name, "all.xlsx");
    assert_eq!(
        artifact.mime_type,
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    assert_eq!(artifact.bytes, vec![0x41, 0x42]);
}

#[test]
fn xlsx_bytes_match_char_codes() {
    let original: Vec<u8> = (0..=u8::MAX).rev().collect();
    let text = latin1::from_bytes(&original);
    let host = RecordingHost::default();
    let mut action = make_xlsx_download_action(ok(&text), "bytes.xlsx");

    action.invoke(&host, &()).unwrap();

    let bytes = &host.artifacts()[0].bytes;
    assert_eq!(bytes.len(), text.chars().count());
    for (i, (byte, ch)) in bytes.iter().zip(text.chars()).enumerate() {
        assert_eq!(u32::from(*byte), u32::from(ch), "byte {i}");
    }
}

#[test]
fn each_invocation_calls_producer_again() {
    let host = RecordingHost::default();
    let mut count = 0;
    let mut action = make_csv_download_action(
        || {
            count += 1;
            Ok::<_, String>(format!("n\n{count}"))
        },
        "counter.csv",
    );

    action.invoke(&host, &()).unwrap();
    action.invoke(&host, &()).unwrap();

    let artifacts = host.artifacts();
    assert_eq!(artifacts.len(), 2);
    assert_eq!(artifacts[0].bytes, b"n\n1");
    assert_eq!(artifacts[1].bytes, b"n\n2");

    let created = host.created.borrow();
    assert_eq!(created.len(), 2);
    assert_ne!(created[0], created[1]);
}

#[test]
fn url_is_revoked_after_success() {
    let host = RecordingHost::default();
    let mut action = make_csv_download_action(ok("x"), "x.csv");

    action.invoke(&host, &()).unwrap();

    let created = host.created.borrow().clone();
    assert_eq!(created.len(), 1);
    assert!(!host.resolves(&created[0]));
    assert_eq!(*host.revoked.borrow(), created);
}

#[test]
fn url_is_revoked_when_click_fails() {
    let host = RecordingHost::default();
    host.fail_click.set(true);
    let mut action = make_csv_download_action(ok("x"), "x.csv");

    let err = action.invoke(&host, &()).unwrap_err();

    assert!(matches!(err, DownloadError::Browser(_)));
    assert!(host.artifacts().is_empty());
    let created = host.created.borrow().clone();
    assert_eq!(created.len(), 1);
    assert!(!host.resolves(&created[0]));
}

#[test]
fn producer_failure_creates_no_url() {
    let host = RecordingHost::default();
    let event = ClickEvent::default();
    let mut action = make_csv_download_action(
        || Err::<String, _>("table not loaded"),
        "data.csv",
    );

    let err = action.invoke(&host, &event).unwrap_err();

    assert!(event.prevented.get());
    assert_eq!(err.to_string(), "content producer failed: table not loaded");
    assert!(host.created.borrow().is_empty());
    assert!(host.artifacts().is_empty());
}

#[test]
fn out_of_range_spreadsheet_content_is_rejected() {
    let host = RecordingHost::default();
    let event = ClickEvent::default();
    let mut action = make_xlsx_download_action(ok("PK\u{3}\u{4}\u{2603}"), "bad.xlsx");

    let err = action.invoke(&host, &event).unwrap_err();

    assert!(event.prevented.get());
    assert!(matches!(err, DownloadError::Conversion(_)));
    assert!(host.created.borrow().is_empty());
    assert!(host.artifacts().is_empty());
}

#[test]
fn config_driven_action() {
    let config = DownloadConfig::from_json(r#"{"file_name": "report.xlsx", "format": "xlsx"}"#)
        .expect("valid config");
    let host = RecordingHost::default();
    let mut action = make_download_action(ok("\u{ff}"), config);

    assert_eq!(action.format(), DownloadFormat::Xlsx);
    action.invoke(&host, &()).unwrap();

    let artifact = &host.artifacts()[0];
    assert_eq!(artifact.file_name, "report.xlsx");
    assert_eq!(artifact.bytes, vec![0xff]);
}

#[test]
fn table_producer_exports_matrix() {
    let table = Table::new(
        vec!["1".into(), "2".into()],
        vec![vec!["5".into(), "0".into()], vec!["3".into(), "12".into()]],
    )
    .with_index("", vec!["A".into(), "B".into()]);
    let host = RecordingHost::default();
    let mut action: DownloadAction<_> =
        make_csv_download_action(|| Ok::<_, String>(to_csv(&table)), "well_counts.csv");

    action.invoke(&host, &()).unwrap();

    assert_eq!(host.artifacts()[0].bytes, b",1,2\nA,5,0\nB,3,12\n");
}

#[test]
fn host_by_reference_works() {
    let host = RecordingHost::default();
    let host_ref = &host;
    let mut action = make_csv_download_action(ok("r"), "r.csv");

    action.invoke(&host_ref, &()).unwrap();

    assert_eq!(host.artifacts().len(), 1);
}
