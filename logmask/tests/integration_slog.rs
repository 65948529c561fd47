//! Integration tests for the slog module.
//!
//! These tests verify that:
//! - `MaskingDrain` masks the formatted message of every record
//! - level and key-values pass through untouched
//! - `MaskedText` serializes as a plain string

#![cfg(feature = "slog")]

use std::{
    fmt::Arguments,
    sync::{Arc, Mutex},
};

use logmask::{slog::MaskingDrain, MaskingConfig, MaskingPipeline};
use slog::{info, o, warn, Drain, Key, Level, OwnedKVList, Record, Serializer, KV};

#[derive(Debug, Clone, PartialEq)]
struct Captured {
    level: Level,
    message: String,
    kv: Vec<(String, String)>,
}

// Collects key-values as strings
struct KvCollector(Vec<(String, String)>);

impl Serializer for KvCollector {
    fn emit_arguments(&mut self, key: Key, val: &Arguments<'_>) -> slog::Result {
        self.0.push((key.to_string(), val.to_string()));
        Ok(())
    }
}

#[derive(Clone, Default)]
struct CaptureDrain {
    records: Arc<Mutex<Vec<Captured>>>,
}

impl CaptureDrain {
    fn records(&self) -> Vec<Captured> {
        self.records.lock().unwrap().clone()
    }
}

impl Drain for CaptureDrain {
    type Ok = ();
    type Err = slog::Never;

    fn log(&self, record: &Record<'_>, _values: &OwnedKVList) -> Result<(), slog::Never> {
        let mut collector = KvCollector(Vec::new());
        record.kv().serialize(record, &mut collector).unwrap();
        self.records.lock().unwrap().push(Captured {
            level: record.level(),
            message: record.msg().to_string(),
            kv: collector.0,
        });
        Ok(())
    }
}

fn logger_with(capture: &CaptureDrain) -> slog::Logger {
    let pipeline = Arc::new(MaskingPipeline::new(MaskingConfig::default()).unwrap());
    let drain = MaskingDrain::new(capture.clone(), pipeline);
    slog::Logger::root(Mutex::new(drain).fuse(), o!())
}

#[test]
fn test_drain_masks_formatted_message() {
    let capture = CaptureDrain::default();
    let logger = logger_with(&capture);

    let url = "https://api.example.com/login?user=bren&password=hunter2";
    info!(logger, "calling {}", url; "attempt" => 2);
    warn!(logger, r#"rejected body {{"token": "abc"}}"#);

    let records = capture.records();
    assert_eq!(records.len(), 2);

    assert_eq!(records[0].level, Level::Info);
    assert_eq!(
        records[0].message,
        "calling https://api.example.com/login?user=bren&password=<MASKED>"
    );
    assert_eq!(records[0].kv, vec![("attempt".to_owned(), "2".to_owned())]);

    assert_eq!(records[1].level, Level::Warning);
    assert_eq!(records[1].message, r#"rejected body {"token": "<MASKED>"}"#);
}

#[test]
fn test_drain_leaves_clean_messages_alone() {
    let capture = CaptureDrain::default();
    let logger = logger_with(&capture);

    info!(logger, "service started"; "port" => 8080);

    let records = capture.records();
    assert_eq!(records[0].message, "service started");
    assert_eq!(records[0].kv, vec![("port".to_owned(), "8080".to_owned())]);
}

#[test]
fn test_masked_value_as_key_value() {
    let capture = CaptureDrain::default();
    let pipeline = MaskingPipeline::new(MaskingConfig::default()).unwrap();
    let logger = slog::Logger::root(Mutex::new(capture.clone()).fuse(), o!());

    let body = pipeline.masked_value("grant_type=password&client_secret=xyz");
    assert_eq!(body.as_str(), "grant_type=password&client_secret=<MASKED>");
    info!(logger, "token request"; "body" => body);

    let records = capture.records();
    assert_eq!(
        records[0].kv,
        vec![(
            "body".to_owned(),
            "grant_type=password&client_secret=<MASKED>".to_owned()
        )]
    );
}
