//! Integration tests for `#[derive(MaskedFields)]`.
//!
//! These tests verify that:
//! - only annotated fields are listed
//! - explicit names and serde renames decide the listed name
//! - derived names feed straight into a working pipeline

use logmask::{MaskedFields, MaskingConfig, MaskingPipeline};
use serde::Serialize;

#[derive(MaskedFields)]
#[allow(dead_code)]
struct LoginRequest {
    username: String,
    #[masked]
    password: String,
    #[masked(name = "otp")]
    one_time_code: String,
}

#[derive(MaskedFields, Serialize)]
#[allow(dead_code)]
struct ClientCredentials {
    #[serde(rename = "clientId")]
    client_id: String,
    #[serde(rename = "clientSecret")]
    #[masked]
    client_secret: String,
    #[masked]
    r#type: String,
}

#[derive(MaskedFields)]
#[allow(dead_code)]
struct Wrapper<T> {
    #[masked]
    pin: T,
    #[masked(name = "pin")]
    duplicate_pin: T,
}

#[derive(MaskedFields)]
#[allow(dead_code)]
struct NothingMasked {
    id: u64,
}

#[test]
fn test_lists_annotated_fields_in_declaration_order() {
    assert_eq!(LoginRequest::MASKED_FIELDS, &["password", "otp"]);
}

#[test]
fn test_serde_rename_and_raw_identifiers() {
    assert_eq!(ClientCredentials::MASKED_FIELDS, &["clientSecret", "type"]);
}

#[test]
fn test_generic_struct_and_duplicate_names() {
    assert_eq!(<Wrapper<String>>::MASKED_FIELDS, &["pin"]);
}

#[test]
fn test_struct_without_masked_fields() {
    assert!(NothingMasked::MASKED_FIELDS.is_empty());
}

#[test]
fn test_derived_names_configure_the_pipeline() {
    let config = MaskingConfig::default()
        .with_fields(Vec::<String>::new())
        .with_fields_of::<LoginRequest>()
        .with_fields_of::<ClientCredentials>();
    let pipeline = MaskingPipeline::new(config).unwrap();

    let request = ClientCredentials {
        client_id: "app".to_owned(),
        client_secret: "s3cr3t".to_owned(),
        r#type: "confidential".to_owned(),
    };
    let body = serde_json::to_string(&request).unwrap();
    assert_eq!(
        pipeline.mask(&format!("POST /oauth body={body}")),
        r#"POST /oauth body={"clientId":"app","clientSecret":"<MASKED>","type":"<MASKED>"}"#
    );

    assert_eq!(
        pipeline.mask("username=bren&password=pw&otp=123456"),
        "username=bren&password=<MASKED>&otp=<MASKED>"
    );
}
