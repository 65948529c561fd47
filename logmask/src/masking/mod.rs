//! Masking engine.
//!
//! - **`range`**: match ranges, the containment resolver and right-to-left substitution
//! - **`pattern`**: field-name validation and per-grammar pattern compilation
//! - **`body`**: the field-driven URI / JSON / form maskers
//! - **`structural`**: the fixed sensitive-tag and oversized-blob maskers
//!
//! The pipeline that composes these lives in `crate::pipeline`.

mod body;
mod pattern;
mod range;
mod structural;

pub use body::{BodyMasker, FieldMasker};
pub use pattern::{validate_field_name, BodyType, FieldSpec};
pub use range::{resolve, substitute, MatchRange};
pub use structural::{OversizedBlobMasker, SensitiveTagMasker};
