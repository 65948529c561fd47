//! Parsing of `#[masked(...)]` field attributes.
//!
//! This module decides whether a field is listed and under which name, and
//! produces structured errors for invalid forms.

use syn::{
    punctuated::Punctuated, spanned::Spanned, Attribute, Expr, ExprLit, Field, Lit, LitStr, Meta,
    Result, Token,
};

/// How a field was annotated.
///
/// | Attribute | Option | Listed as |
/// |-----------|--------|-----------|
/// | None | `Skip` | not listed |
/// | `#[masked]` | `Masked` | serde rename, else the identifier |
/// | `#[masked(name = "x")]` | `Renamed("x")` | `x` |
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum FieldOption {
    Skip,
    Masked,
    Renamed(String),
}

pub(crate) fn parse_field_option(attrs: &[Attribute]) -> Result<FieldOption> {
    let mut option: Option<FieldOption> = None;
    for attr in attrs {
        if !attr.path().is_ident("masked") {
            continue;
        }
        if option.is_some() {
            return Err(syn::Error::new(
                attr.span(),
                "multiple #[masked] attributes specified on the same field",
            ));
        }

        match &attr.meta {
            Meta::Path(_) => option = Some(FieldOption::Masked),
            Meta::List(list) => {
                let mut name: Option<LitStr> = None;
                list.parse_nested_meta(|meta| {
                    if meta.path.is_ident("name") {
                        name = Some(meta.value()?.parse()?);
                        Ok(())
                    } else {
                        Err(meta.error(format!(
                            "unknown #[masked] option `{}`; expected `name`",
                            meta.path
                                .get_ident()
                                .map_or_else(|| "?".to_string(), ToString::to_string)
                        )))
                    }
                })?;
                let name = name.ok_or_else(|| {
                    syn::Error::new(list.span(), "expected `name = \"...\"` inside #[masked(...)]")
                })?;
                if name.value().is_empty() {
                    return Err(syn::Error::new(name.span(), "masked field name is empty"));
                }
                option = Some(FieldOption::Renamed(name.value()));
            }
            Meta::NameValue(_) => {
                return Err(syn::Error::new(
                    attr.span(),
                    "name-value syntax is not supported; use #[masked(name = \"...\")]",
                ));
            }
        }
    }

    Ok(option.unwrap_or(FieldOption::Skip))
}

/// Finds `#[serde(rename = "...")]` on a field.
///
/// Attributes that are not plain meta syntax are ignored here; serde reports
/// them itself.
pub(crate) fn serde_rename(attrs: &[Attribute]) -> Option<String> {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("serde"))
        .filter_map(|attr| {
            attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)
                .ok()
        })
        .flatten()
        .find_map(|meta| match meta {
            Meta::NameValue(nv) if nv.path.is_ident("rename") => match nv.value {
                Expr::Lit(ExprLit {
                    lit: Lit::Str(name),
                    ..
                }) => Some(name.value()),
                _ => None,
            },
            _ => None,
        })
}

/// Name under which `field` is listed, or `None` when it is not masked.
pub(crate) fn masked_field_name(field: &Field) -> Result<Option<String>> {
    let name = match parse_field_option(&field.attrs)? {
        FieldOption::Skip => return Ok(None),
        FieldOption::Renamed(name) => name,
        FieldOption::Masked => match serde_rename(&field.attrs) {
            Some(name) => name,
            None => {
                let ident = field
                    .ident
                    .as_ref()
                    .ok_or_else(|| syn::Error::new(field.span(), "expected a named field"))?;
                let ident = ident.to_string();
                ident.strip_prefix("r#").unwrap_or(&ident).to_owned()
            }
        },
    };
    Ok(Some(name))
}

#[cfg(test)]
mod tests {
    use quote::quote;
    use syn::{Data, DeriveInput, Fields};

    use super::*;

    fn parse_field(tokens: proc_macro2::TokenStream) -> Field {
        let input: DeriveInput = syn::parse2(quote! {
            struct Dummy {
                #tokens
            }
        })
        .expect("should parse as DeriveInput");
        match input.data {
            Data::Struct(data) => match data.fields {
                Fields::Named(fields) => fields.named.into_iter().next().unwrap(),
                _ => unreachable!(),
            },
            _ => unreachable!(),
        }
    }

    #[test]
    fn unannotated_field_is_skipped() {
        let field = parse_field(quote! { username: String });
        assert_eq!(masked_field_name(&field).unwrap(), None);
    }

    #[test]
    fn bare_masked_uses_the_identifier() {
        let field = parse_field(quote! { #[masked] password: String });
        assert_eq!(masked_field_name(&field).unwrap().as_deref(), Some("password"));
    }

    #[test]
    fn raw_identifier_prefix_is_stripped() {
        let field = parse_field(quote! { #[masked] r#type: String });
        assert_eq!(masked_field_name(&field).unwrap().as_deref(), Some("type"));
    }

    #[test]
    fn explicit_name_wins() {
        let field = parse_field(quote! {
            #[serde(rename = "apiKey")]
            #[masked(name = "api_key")]
            key: String
        });
        assert_eq!(masked_field_name(&field).unwrap().as_deref(), Some("api_key"));
    }

    #[test]
    fn serde_rename_is_honoured() {
        let field = parse_field(quote! {
            #[serde(default, rename = "clientSecret", skip_serializing_if = "Option::is_none")]
            #[masked]
            client_secret: Option<String>
        });
        assert_eq!(
            masked_field_name(&field).unwrap().as_deref(),
            Some("clientSecret")
        );
    }

    #[test]
    fn unknown_option_errors() {
        let field = parse_field(quote! { #[masked(hide)] password: String });
        let err = masked_field_name(&field).unwrap_err();
        assert!(err.to_string().contains("unknown #[masked] option `hide`"));
    }

    #[test]
    fn empty_name_errors() {
        let field = parse_field(quote! { #[masked(name = "")] password: String });
        let err = masked_field_name(&field).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn repeated_attribute_errors() {
        let field = parse_field(quote! { #[masked] #[masked] password: String });
        let err = masked_field_name(&field).unwrap_err();
        assert!(err.to_string().contains("multiple #[masked]"));
    }

    #[test]
    fn name_value_syntax_errors() {
        let field = parse_field(quote! { #[masked = "x"] password: String });
        assert!(parse_field_option(&field.attrs).is_err());
    }
}
