//! Field-driven body maskers for URI, JSON and form text.
//!
//! The three grammars share one algorithm:
//!
//! - **collect**: run every pattern of every present field against the same
//!   immutable snapshot of the message
//! - **resolve**: drop contained ranges and order the rest right to left
//! - **substitute**: replace each value span with the masked marker

use std::borrow::Cow;

use super::pattern::{BodyType, FieldSpec, VALUE_GROUP};
use super::range::{resolve, substitute, MatchRange};
use crate::config::{DEFAULT_EMPTY_MARKER, DEFAULT_MASKED_MARKER};
use crate::error::MaskError;

/// A grammar-specific masker.
///
/// Implementations must be immutable after construction so one instance can be
/// shared by concurrent logging calls.
pub trait BodyMasker: Send + Sync {
    /// Grammar handled by this masker. Used for diagnostics and selection only.
    fn body_type(&self) -> BodyType;

    /// Marker returned for an absent message.
    fn empty_marker(&self) -> &str;

    /// Masks every configured field value in `message`.
    ///
    /// Returns the input borrowed when nothing matched. Failures are not
    /// recovered here; the pipeline contains them.
    fn try_mask<'a>(&self, message: &'a str) -> Result<Cow<'a, str>, MaskError>;

    /// Masks `message`, mapping an absent message to [`BodyMasker::empty_marker`].
    fn mask<'a>(&'a self, message: Option<&'a str>) -> Result<Cow<'a, str>, MaskError> {
        match message {
            Some(message) => self.try_mask(message),
            None => Ok(Cow::Borrowed(self.empty_marker())),
        }
    }
}

/// Regex-backed [`BodyMasker`] for one grammar and one set of field names.
#[derive(Clone, Debug)]
pub struct FieldMasker {
    body_type: BodyType,
    fields: Vec<FieldSpec>,
    masked_marker: String,
    empty_marker: String,
}

impl FieldMasker {
    /// Compiles `fields` for `body_type` using the default markers.
    ///
    /// Fails on the first invalid field name.
    pub fn new<I, S>(body_type: BodyType, fields: I) -> Result<Self, MaskError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let fields = fields
            .into_iter()
            .map(|name| FieldSpec::compile(name.as_ref(), body_type))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            body_type,
            fields,
            masked_marker: DEFAULT_MASKED_MARKER.to_owned(),
            empty_marker: DEFAULT_EMPTY_MARKER.to_owned(),
        })
    }

    /// Masker for URI query parameters.
    pub fn uri<I, S>(fields: I) -> Result<Self, MaskError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(BodyType::Uri, fields)
    }

    /// Masker for JSON members.
    pub fn json<I, S>(fields: I) -> Result<Self, MaskError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(BodyType::Json, fields)
    }

    /// Masker for form-encoded parameters.
    pub fn form<I, S>(fields: I) -> Result<Self, MaskError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(BodyType::Form, fields)
    }

    /// Uses a specific replacement for masked values.
    #[must_use]
    pub fn with_masked_marker(mut self, marker: impl Into<String>) -> Self {
        self.masked_marker = marker.into();
        self
    }

    /// Uses a specific result for absent messages.
    #[must_use]
    pub fn with_empty_marker(mut self, marker: impl Into<String>) -> Self {
        self.empty_marker = marker.into();
        self
    }

    /// Compiled field specs, in evaluation order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Collects value ranges of every present field from one snapshot.
    pub fn collect_ranges(&self, message: &str) -> Vec<MatchRange> {
        self.fields
            .iter()
            .filter(|field| field.is_present_in(message))
            .flat_map(FieldSpec::patterns)
            .flat_map(|pattern| pattern.captures_iter(message))
            .filter_map(|captures| captures.name(VALUE_GROUP))
            .filter_map(|value| MatchRange::from_span(value.start(), value.end()))
            .collect()
    }
}

impl BodyMasker for FieldMasker {
    fn body_type(&self) -> BodyType {
        self.body_type
    }

    fn empty_marker(&self) -> &str {
        &self.empty_marker
    }

    fn try_mask<'a>(&self, message: &'a str) -> Result<Cow<'a, str>, MaskError> {
        let plan = resolve(self.collect_ranges(message));
        substitute(message, &plan, &self.masked_marker)
    }
}
