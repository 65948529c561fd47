//! Masking configuration.
//!
//! A [`MaskingConfig`] is an immutable snapshot. Reconfiguring means building a
//! new config and a new [`crate::MaskingPipeline`] from it; nothing is mutated
//! while masking calls are in flight.

use std::collections::BTreeSet;

use crate::error::MaskError;
use crate::masking::validate_field_name;
use crate::MaskedFields;

/// Default replacement for masked values.
pub const DEFAULT_MASKED_MARKER: &str = "<MASKED>";

/// Default result for an absent message.
pub const DEFAULT_EMPTY_MARKER: &str = "";

/// Default minimum length of an oversized hex/base64 run.
pub const DEFAULT_BLOB_THRESHOLD: usize = 1000;

/// Field names masked in every grammar unless configured otherwise.
pub const DEFAULT_FIELDS: [&str; 7] = [
    "password",
    "token",
    "access_token",
    "client_secret",
    "authorization",
    "api_key",
    "secret",
];

fn default_fields() -> BTreeSet<String> {
    DEFAULT_FIELDS.iter().map(|&f| f.to_owned()).collect()
}

/// Process-wide masking settings.
///
/// Built from [`MaskingConfig::default`] and the `with_*` methods:
///
/// ```rust
/// use logmask::MaskingConfig;
///
/// let config = MaskingConfig::default()
///     .with_json_fields(["password", "card_number"])
///     .with_blob_threshold(4096);
/// assert!(config.json_fields().contains("card_number"));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct MaskingConfig {
    enabled: bool,
    uri_fields: BTreeSet<String>,
    json_fields: BTreeSet<String>,
    form_fields: BTreeSet<String>,
    masked_marker: String,
    empty_marker: String,
    blob_threshold: usize,
}

impl Default for MaskingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            uri_fields: default_fields(),
            json_fields: default_fields(),
            form_fields: default_fields(),
            masked_marker: DEFAULT_MASKED_MARKER.to_owned(),
            empty_marker: DEFAULT_EMPTY_MARKER.to_owned(),
            blob_threshold: DEFAULT_BLOB_THRESHOLD,
        }
    }
}

fn to_set<I, S>(fields: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    fields.into_iter().map(Into::into).collect()
}

fn validate_marker(marker: &str) -> Result<(), MaskError> {
    let reject = |reason| MaskError::InvalidMarker {
        marker: marker.to_owned(),
        reason,
    };

    if marker.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(reject("marker contains whitespace or a control character"));
    }
    if marker.contains(['&', '"']) {
        return Err(reject("marker contains a value delimiter (`&` or `\"`)"));
    }
    Ok(())
}

impl MaskingConfig {
    /// Uses the same field names for all three grammars.
    #[must_use]
    pub fn with_fields<I, S>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields = to_set(fields);
        Self {
            uri_fields: fields.clone(),
            json_fields: fields.clone(),
            form_fields: fields,
            ..self
        }
    }

    /// Replaces the URI query field names.
    #[must_use]
    pub fn with_uri_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.uri_fields = to_set(fields);
        self
    }

    /// Replaces the JSON field names.
    #[must_use]
    pub fn with_json_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.json_fields = to_set(fields);
        self
    }

    /// Replaces the form field names.
    #[must_use]
    pub fn with_form_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.form_fields = to_set(fields);
        self
    }

    /// Adds the field names declared by `T` to all three grammars.
    #[must_use]
    pub fn with_fields_of<T: MaskedFields>(mut self) -> Self {
        for &name in T::MASKED_FIELDS {
            self.uri_fields.insert(name.to_owned());
            self.json_fields.insert(name.to_owned());
            self.form_fields.insert(name.to_owned());
        }
        self
    }

    /// Turns the whole pipeline on or off.
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
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

    /// Sets the minimum length of a hex/base64 run collapsed by the blob stage.
    #[must_use]
    pub fn with_blob_threshold(mut self, threshold: usize) -> Self {
        self.blob_threshold = threshold;
        self
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn uri_fields(&self) -> &BTreeSet<String> {
        &self.uri_fields
    }

    pub fn json_fields(&self) -> &BTreeSet<String> {
        &self.json_fields
    }

    pub fn form_fields(&self) -> &BTreeSet<String> {
        &self.form_fields
    }

    pub fn masked_marker(&self) -> &str {
        &self.masked_marker
    }

    pub fn empty_marker(&self) -> &str {
        &self.empty_marker
    }

    pub fn blob_threshold(&self) -> usize {
        self.blob_threshold
    }

    /// Checks the threshold, the masked marker and every field name.
    ///
    /// The masked marker must not contain whitespace, `&` or `"`: the form
    /// stage re-reads what the URI stage wrote, and JSON values are written
    /// between quotes.
    ///
    /// Pattern compilation itself happens in [`crate::MaskingPipeline::new`],
    /// which calls this first.
    pub fn validate(&self) -> Result<(), MaskError> {
        if self.blob_threshold == 0 {
            return Err(MaskError::InvalidThreshold(self.blob_threshold));
        }
        validate_marker(&self.masked_marker)?;
        self.uri_fields
            .iter()
            .chain(&self.json_fields)
            .chain(&self.form_fields)
            .try_for_each(|name| validate_field_name(name))
    }
}
