//! Fixed, non-field-driven maskers.
//!
//! Both maskers hold an ordered list of patterns. The first pattern that finds
//! anything in a message is applied to all of its matches and the remaining
//! patterns are skipped for that message.

use std::borrow::Cow;

use regex::{Captures, Regex};

use crate::error::MaskError;

const TAG_PATTERNS: [&str; 3] = [
    // hex payload
    r"(?P<open><SensitiveData>)(?P<payload>[0-9a-fA-F]*)(?P<close></{1,2}SensitiveData>)",
    // tag names spelled as their own hex digits
    r"(?i)(?P<open>3c53656e736974697665446174613e)(?P<payload>[0-9a-f]*)(?P<close>3c2f53656e736974697665446174613e)",
    // base64 payload
    r"(?P<open><SensitiveData>)(?P<payload>[0-9a-zA-Z+/]*={0,3})(?P<close></{1,2}SensitiveData>)",
];

const BLOB_PATTERNS: [&str; 2] = [
    // hex run
    r"[0-9a-fA-F]+",
    // base64 run with optional padding
    r"[0-9a-zA-Z+/]+={0,3}",
];

fn compile_all(sources: &[&str]) -> Result<Vec<Regex>, MaskError> {
    sources
        .iter()
        .map(|source| Regex::new(source).map_err(MaskError::from))
        .collect()
}

/// Collapses the payload of `<SensitiveData>...</SensitiveData>` tags into
/// `LENGTH:<n>`, keeping the tags themselves.
#[derive(Clone, Debug)]
pub struct SensitiveTagMasker {
    patterns: Vec<Regex>,
}

impl SensitiveTagMasker {
    /// Compiles the fixed tag patterns.
    pub fn new() -> Result<Self, MaskError> {
        Ok(Self {
            patterns: compile_all(&TAG_PATTERNS)?,
        })
    }

    /// Masks tagged payloads using the first pattern that matches.
    pub fn mask<'a>(&self, message: &'a str) -> Cow<'a, str> {
        let Some(pattern) = self.patterns.iter().find(|p| p.is_match(message)) else {
            return Cow::Borrowed(message);
        };
        pattern.replace_all(message, |caps: &Captures<'_>| {
            let group = |name| caps.name(name).map_or("", |m| m.as_str());
            format!(
                "{}LENGTH:{}{}",
                group("open"),
                group("payload").len(),
                group("close")
            )
        })
    }
}

/// Replaces hex or base64 runs of at least `threshold` characters with
/// `<TOO BIG:<n>>`.
#[derive(Clone, Debug)]
pub struct OversizedBlobMasker {
    patterns: Vec<Regex>,
}

impl OversizedBlobMasker {
    /// Compiles the fixed blob patterns.
    pub fn new() -> Result<Self, MaskError> {
        Ok(Self {
            patterns: compile_all(&BLOB_PATTERNS)?,
        })
    }

    /// Masks oversized runs using the first pattern that has one.
    ///
    /// `threshold` counts alphabet characters; base64 padding is not counted
    /// but is included in the reported length. A threshold of zero is treated
    /// as one.
    pub fn mask<'a>(&self, message: &'a str, threshold: usize) -> Cow<'a, str> {
        let threshold = threshold.max(1);
        let oversized = |run: &str| run.trim_end_matches('=').len() >= threshold;

        let Some(pattern) = self
            .patterns
            .iter()
            .find(|p| p.find_iter(message).any(|m| oversized(m.as_str())))
        else {
            return Cow::Borrowed(message);
        };
        pattern.replace_all(message, |caps: &Captures<'_>| {
            let run = &caps[0];
            if oversized(run) {
                format!("<TOO BIG:{}>", run.len())
            } else {
                run.to_owned()
            }
        })
    }
}
