//! The masking pipeline.
//!
//! Stages run in a fixed order, each consuming the previous stage's output:
//!
//! 1. sensitive-tag masking
//! 2. oversized-blob masking
//! 3. URI field masking
//! 4. JSON field masking
//! 5. form field masking
//!
//! Failures are contained in two tiers. The tag and blob stages are guarded one
//! by one: a failing stage substitutes a short diagnostic for its output and the
//! pipeline carries on. The three field stages are guarded as a group: the first
//! failure aborts the remaining field stages and the whole call degrades to a
//! diagnostic naming the failure kind. Panics are caught at the same guards, so
//! the logging call site never observes a failure.

use std::{
    any::Any,
    borrow::Cow,
    collections::BTreeSet,
    fmt,
    panic::{self, AssertUnwindSafe},
};

use crate::config::MaskingConfig;
use crate::error::MaskError;
use crate::masking::{BodyMasker, BodyType, FieldMasker, OversizedBlobMasker, SensitiveTagMasker};

/// Prefix of every diagnostic text emitted instead of a masked message.
pub const DIAGNOSTIC_PREFIX: &str = "EXCEPTION IN LOGGER!";

/// A pipeline stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    /// `<SensitiveData>` payload masking.
    SensitiveTag,
    /// Oversized hex/base64 run masking.
    OversizedBlob,
    /// URI query field masking.
    Uri,
    /// JSON field masking.
    Json,
    /// Form field masking.
    Form,
}

impl Stage {
    /// Snake-case name used in diagnostic text.
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::SensitiveTag => "sensitive_tag",
            Stage::OversizedBlob => "oversized_blob",
            Stage::Uri => "uri",
            Stage::Json => "json",
            Stage::Form => "form",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<BodyType> for Stage {
    fn from(body_type: BodyType) -> Self {
        match body_type {
            BodyType::Uri => Stage::Uri,
            BodyType::Json => Stage::Json,
            BodyType::Form => Stage::Form,
        }
    }
}

/// Why a stage could not produce masked text.
#[derive(Debug)]
pub struct Degradation {
    stage: Stage,
    error: MaskError,
}

impl Degradation {
    /// Stage that failed.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// The failure, including caught panics.
    pub fn error(&self) -> &MaskError {
        &self.error
    }

    /// Diagnostic text emitted in place of the message.
    pub fn diagnostic(&self) -> String {
        format!("{DIAGNOSTIC_PREFIX}{}:{}", self.error.kind(), self.error)
    }

    fn stage_diagnostic(&self) -> String {
        format!(
            "{DIAGNOSTIC_PREFIX} {} masking failed: {}",
            self.stage,
            self.error.kind()
        )
    }
}

impl fmt::Display for Degradation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} stage failed: {}", self.stage, self.error)
    }
}

/// Result of one pipeline call.
#[derive(Debug)]
pub enum MaskOutcome<'a> {
    /// Every stage completed; borrowed when nothing changed.
    Masked(Cow<'a, str>),
    /// A field stage failed; the message must not be emitted as is.
    Degraded(Degradation),
}

impl<'a> MaskOutcome<'a> {
    /// Whether a field stage failed.
    pub fn is_degraded(&self) -> bool {
        matches!(self, MaskOutcome::Degraded(_))
    }

    /// Text to emit: the masked message or the diagnostic.
    pub fn into_text(self) -> Cow<'a, str> {
        match self {
            MaskOutcome::Masked(text) => text,
            MaskOutcome::Degraded(degradation) => Cow::Owned(degradation.diagnostic()),
        }
    }
}

/// Fixed-order composition of all maskers over one immutable configuration.
///
/// Shareable across threads; wrap it in an `Arc` and build a new one to
/// reconfigure.
#[derive(Clone, Debug)]
pub struct MaskingPipeline {
    config: MaskingConfig,
    tags: SensitiveTagMasker,
    blobs: OversizedBlobMasker,
    uri: FieldMasker,
    json: FieldMasker,
    form: FieldMasker,
}

impl MaskingPipeline {
    /// Validates `config` and compiles every pattern.
    ///
    /// All configuration errors surface here, never during a masking call.
    pub fn new(config: MaskingConfig) -> Result<Self, MaskError> {
        config.validate()?;
        let field_masker = |body_type: BodyType, fields: &BTreeSet<String>| {
            FieldMasker::new(body_type, fields).map(|masker| {
                masker
                    .with_masked_marker(config.masked_marker())
                    .with_empty_marker(config.empty_marker())
            })
        };

        Ok(Self {
            tags: SensitiveTagMasker::new()?,
            blobs: OversizedBlobMasker::new()?,
            uri: field_masker(BodyType::Uri, config.uri_fields())?,
            json: field_masker(BodyType::Json, config.json_fields())?,
            form: field_masker(BodyType::Form, config.form_fields())?,
            config,
        })
    }

    pub fn config(&self) -> &MaskingConfig {
        &self.config
    }

    /// Runs every stage and reports whether the field stages degraded.
    ///
    /// A disabled pipeline returns the message borrowed and unchanged.
    pub fn mask_outcome<'a>(&self, message: &'a str) -> MaskOutcome<'a> {
        if !self.config.enabled() {
            return MaskOutcome::Masked(Cow::Borrowed(message));
        }

        let text = structural_stage(Stage::SensitiveTag, Cow::Borrowed(message), |text| {
            self.tags.mask(text)
        });
        let text = structural_stage(Stage::OversizedBlob, text, |text| {
            self.blobs.mask(text, self.config.blob_threshold())
        });

        let field_stages: [&dyn BodyMasker; 3] = [&self.uri, &self.json, &self.form];
        match mask_fields(&field_stages, text) {
            Ok(text) => MaskOutcome::Masked(text),
            Err(degradation) => MaskOutcome::Degraded(degradation),
        }
    }

    /// Masks `message`. Never fails; degraded calls yield diagnostic text.
    pub fn mask<'a>(&self, message: &'a str) -> Cow<'a, str> {
        self.mask_outcome(message).into_text()
    }

    /// Like [`MaskingPipeline::mask`], mapping an absent message to the
    /// configured empty marker.
    pub fn mask_optional<'a>(&'a self, message: Option<&'a str>) -> Cow<'a, str> {
        match message {
            Some(message) => self.mask(message),
            None => Cow::Borrowed(self.config.empty_marker()),
        }
    }

    /// Appends the masked (or diagnostic) text of `message` to `out`.
    pub fn format(&self, message: &str, out: &mut String) {
        out.push_str(&self.mask(message));
    }

    /// Appends `message` to `out` without masking.
    pub fn format_unmasked(message: &str, out: &mut String) {
        out.push_str(message);
    }
}

/// Runs a tag or blob stage under its own guard.
fn structural_stage<'a>(
    stage: Stage,
    text: Cow<'a, str>,
    run: impl FnOnce(&str) -> Cow<'_, str>,
) -> Cow<'a, str> {
    match guard(stage, || Ok(changed(run(&text)))) {
        Ok(Some(masked)) => Cow::Owned(masked),
        Ok(None) => text,
        Err(degradation) => Cow::Owned(degradation.stage_diagnostic()),
    }
}

/// Runs the field stages in order, aborting on the first failure.
fn mask_fields<'a>(
    stages: &[&dyn BodyMasker],
    text: Cow<'a, str>,
) -> Result<Cow<'a, str>, Degradation> {
    stages.iter().try_fold(text, |text, masker| {
        let stage = Stage::from(masker.body_type());
        let masked = guard(stage, || masker.try_mask(&text).map(changed))?;
        Ok(masked.map_or(text, Cow::Owned))
    })
}

/// Owned output means the stage rewrote the text; borrowed output is the input.
fn changed(text: Cow<'_, str>) -> Option<String> {
    match text {
        Cow::Owned(text) => Some(text),
        Cow::Borrowed(_) => None,
    }
}

fn guard<T>(stage: Stage, run: impl FnOnce() -> Result<T, MaskError>) -> Result<T, Degradation> {
    let error = match panic::catch_unwind(AssertUnwindSafe(run)) {
        Ok(Ok(value)) => return Ok(value),
        Ok(Err(error)) => error,
        Err(payload) => MaskError::Panicked(panic_message(&*payload)),
    };
    Err(Degradation { stage, error })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_owned())
}
