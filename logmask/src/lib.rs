//! Masking of credentials embedded in free-form log messages.
//!
//! This crate redacts the values of configured fields in query strings, form
//! bodies and JSON bodies found anywhere in a log message, without parsing those
//! grammars. It also collapses explicitly tagged sensitive payloads and very
//! long hex/base64 runs into length markers.
//!
//! The pieces:
//! - **Range model** ([`MatchRange`], [`resolve`]): value spans found in one
//!   snapshot of the message, with contained spans dropped and the rest ordered
//!   right to left for in-place substitution.
//! - **Body maskers** ([`FieldMasker`]): one masker per grammar (URI, JSON,
//!   FORM) sharing the same collect / resolve / substitute algorithm.
//! - **Structural maskers** ([`SensitiveTagMasker`], [`OversizedBlobMasker`]):
//!   fixed patterns that are not tied to field names.
//! - **Pipeline** ([`MaskingPipeline`]): fixed-order composition of all maskers
//!   with failure containment and a global on/off switch.
//!
//! All patterns run on the `regex` crate, whose matching time is linear in the
//! input length regardless of the pattern, so attacker-influenced log content
//! cannot trigger catastrophic backtracking.
//!
//! ```rust
//! use logmask::{MaskingConfig, MaskingPipeline};
//!
//! let pipeline = MaskingPipeline::new(MaskingConfig::default()).unwrap();
//! assert_eq!(
//!     pipeline.mask(r#"GET /login?password=hunter2 {"token": "abc"}"#),
//!     r#"GET /login?password=<MASKED> {"token": "<MASKED>"}"#
//! );
//! ```
//!
//! What this crate does not do:
//! - build a JSON or URL syntax tree
//! - provide reversible redaction
//! - mask values that span several log lines
//! - read its configuration from files or the environment
//!
//! Integrations live behind feature flags: `slog` provides a masking drain and
//! `serde` makes [`MaskingConfig`] (de)serializable.

// <https://doc.rust-lang.org/rustc/lints/listing/allowed-by-default.html>
#![warn(
    anonymous_parameters,
    bare_trait_objects,
    elided_lifetimes_in_paths,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unsafe_code,
    unused_extern_crates,
    unused_import_braces
)]
// <https://rust-lang.github.io/rust-clippy/stable>
#![warn(
    clippy::all,
    clippy::cargo,
    clippy::dbg_macro,
    clippy::float_cmp_const,
    clippy::get_unwrap,
    clippy::mem_forget,
    clippy::nursery,
    clippy::pedantic,
    clippy::todo,
    clippy::unwrap_used,
    clippy::uninlined_format_args
)]
// Allow some clippy lints
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::must_use_candidate,
    clippy::cargo_common_metadata,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::option_if_let_else
)]
// Allow some lints while testing
#![cfg_attr(test, allow(clippy::non_ascii_literal, clippy::unwrap_used))]

pub use logmask_derive::MaskedFields;

mod config;
mod error;
mod masking;
mod pipeline;
#[cfg(feature = "slog")]
pub mod slog;

pub use config::{
    MaskingConfig, DEFAULT_BLOB_THRESHOLD, DEFAULT_EMPTY_MARKER, DEFAULT_FIELDS,
    DEFAULT_MASKED_MARKER,
};
pub use error::MaskError;
pub use masking::{
    resolve, substitute, validate_field_name, BodyMasker, BodyType, FieldMasker, FieldSpec,
    MatchRange, OversizedBlobMasker, SensitiveTagMasker,
};
pub use pipeline::{Degradation, MaskOutcome, MaskingPipeline, Stage, DIAGNOSTIC_PREFIX};

/// Types that declare which of their fields must be masked in logs.
///
/// Usually derived:
///
/// ```rust,ignore
/// use logmask::{MaskedFields, MaskingConfig};
///
/// #[derive(MaskedFields)]
/// struct LoginRequest {
///     username: String,
///     #[masked]
///     password: String,
///     #[masked(name = "otp")]
///     one_time_code: String,
/// }
///
/// let config = MaskingConfig::default().with_fields_of::<LoginRequest>();
/// ```
pub trait MaskedFields {
    /// Field names as they appear in query strings, forms and JSON bodies.
    const MASKED_FIELDS: &'static [&'static str];
}
