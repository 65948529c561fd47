//! Adapters for masking what is emitted through `slog`.
//!
//! This module connects [`MaskingPipeline`] to `slog` at the drain level:
//! - [`MaskingDrain`] re-emits every record with its formatted message replaced
//!   by the pipeline output, keeping level, tag, location and key-values.
//! - [`MaskedText`] is a `slog::Value` for key-value payloads (request bodies,
//!   URLs) that are masked before they are attached to a record.
//!
//! It does not configure `slog` or decide which drain is used downstream.

use std::{fmt, sync::Arc};

use slog::{Drain, Key, OwnedKVList, Record, RecordStatic, Result as SlogResult, Serializer};

use crate::pipeline::MaskingPipeline;

/// A drain that masks the message of every record before passing it on.
///
/// ```ignore
/// let pipeline = Arc::new(MaskingPipeline::new(MaskingConfig::default())?);
/// let drain = MaskingDrain::new(slog_term::FullFormat::new(decorator).build(), pipeline).fuse();
/// let logger = slog::Logger::root(drain, slog::o!());
/// ```
#[derive(Debug)]
pub struct MaskingDrain<D> {
    drain: D,
    pipeline: Arc<MaskingPipeline>,
}

impl<D> MaskingDrain<D> {
    pub fn new(drain: D, pipeline: Arc<MaskingPipeline>) -> Self {
        Self { drain, pipeline }
    }

    pub fn pipeline(&self) -> &MaskingPipeline {
        &self.pipeline
    }

    /// Returns the wrapped drain.
    pub fn into_inner(self) -> D {
        self.drain
    }
}

impl<D: Drain> Drain for MaskingDrain<D> {
    type Ok = D::Ok;
    type Err = D::Err;

    fn log(&self, record: &Record<'_>, values: &OwnedKVList) -> Result<Self::Ok, Self::Err> {
        let message = record.msg().to_string();
        let masked = self.pipeline.mask(&message);
        let record_static = RecordStatic {
            location: record.location(),
            tag: record.tag(),
            level: record.level(),
        };
        self.drain.log(
            &Record::new(&record_static, &format_args!("{masked}"), record.kv()),
            values,
        )
    }

    fn is_enabled(&self, level: slog::Level) -> bool {
        self.drain.is_enabled(level)
    }
}

/// Text that has already been through a [`MaskingPipeline`].
///
/// Created with [`MaskingPipeline::masked_value`]; serializes as a plain string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaskedText(String);

impl MaskedText {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MaskedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl slog::Value for MaskedText {
    fn serialize(
        &self,
        _record: &Record<'_>,
        key: Key,
        serializer: &mut dyn Serializer,
    ) -> SlogResult {
        serializer.emit_str(key, &self.0)
    }
}

impl MaskingPipeline {
    /// Masks `text` for use as a `slog` key-value.
    ///
    /// ```ignore
    /// info!(logger, "request"; "body" => pipeline.masked_value(&body));
    /// ```
    pub fn masked_value(&self, text: &str) -> MaskedText {
        MaskedText(self.mask(text).into_owned())
    }
}
