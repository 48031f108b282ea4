//! Attribute parsing for `#[configuration(...)]` annotations.
//!
//! This module extracts configuration attributes from the struct and its
//! fields during macro expansion.

use syn::{Attribute, Expr, Field, LitStr};

const ATTRIBUTE: &str = "configuration";

/// Parsed struct-level `#[configuration(...)]` attributes.
#[derive(Debug, Default)]
pub struct StructAttrs {
    /// Section key in the settings document.
    ///
    /// If `None`, the struct name is used.
    pub key: Option<String>,
}

impl StructAttrs {
    /// Extract and parse `#[configuration(...)]` attributes from a struct.
    pub fn from_attrs(attributes: &[Attribute]) -> syn::Result<Self> {
        let mut attrs = Self::default();

        for attr in attributes {
            if !attr.path().is_ident(ATTRIBUTE) {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                // key = "..."
                if meta.path.is_ident("key") {
                    let key: LitStr = meta.value()?.parse()?;
                    if key.value().is_empty() {
                        return Err(syn::Error::new_spanned(key, "section key must not be empty"));
                    }
                    attrs.key = Some(key.value());
                    return Ok(());
                }

                Err(meta.error("unsupported struct-level configuration attribute"))
            })?;
        }

        Ok(attrs)
    }
}

/// Parsed field-level `#[configuration(...)]` attributes.
#[derive(Debug, Default)]
pub struct FieldAttrs {
    /// Document key override.
    ///
    /// If `None`, the field name is matched against document keys.
    pub name: Option<String>,

    /// Explicit value used when the document has no entry.
    pub default: Option<Expr>,

    /// The bound value must be present and non-default.
    pub required: bool,

    /// Produce the value with a registered converter only.
    pub convert: bool,

    /// Bind the field as a nested configuration from its child section.
    pub nested: bool,

    /// Never bind the field.
    pub skip: bool,
}

impl FieldAttrs {
    /// Extract and parse `#[configuration(...)]` attributes from a struct field.
    ///
    /// Attributes of other macros are ignored; unknown `configuration` options are errors.
    pub fn from_field(field: &Field) -> syn::Result<Self> {
        let mut attrs = Self::default();

        for attr in &field.attrs {
            if !attr.path().is_ident(ATTRIBUTE) {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                // name = "..."
                if meta.path.is_ident("name") {
                    let name: LitStr = meta.value()?.parse()?;
                    attrs.name = Some(name.value());
                    return Ok(());
                }

                // default = value
                if meta.path.is_ident("default") {
                    let expr: Expr = meta.value()?.parse()?;
                    attrs.default = Some(expr);
                    return Ok(());
                }

                if meta.path.is_ident("required") {
                    attrs.required = true;
                    return Ok(());
                }

                if meta.path.is_ident("convert") {
                    attrs.convert = true;
                    return Ok(());
                }

                if meta.path.is_ident("nested") {
                    attrs.nested = true;
                    return Ok(());
                }

                if meta.path.is_ident("skip") {
                    attrs.skip = true;
                    return Ok(());
                }

                Err(meta.error("unsupported configuration attribute"))
            })?;
        }

        Ok(attrs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::{parse_quote, DeriveInput};

    #[test]
    fn test_parse_struct_key() {
        let input: DeriveInput = parse_quote! {
            #[configuration(key = "Server")]
            struct ServerSettings {}
        };

        let attrs = StructAttrs::from_attrs(&input.attrs).unwrap();
        assert_eq!(attrs.key, Some("Server".to_string()));
    }

    #[test]
    fn test_struct_without_key() {
        let input: DeriveInput = parse_quote! {
            #[derive(Debug)]
            struct ServerSettings {}
        };

        let attrs = StructAttrs::from_attrs(&input.attrs).unwrap();
        assert_eq!(attrs.key, None);
    }

    #[test]
    fn test_reject_empty_key() {
        let input: DeriveInput = parse_quote! {
            #[configuration(key = "")]
            struct ServerSettings {}
        };

        assert!(StructAttrs::from_attrs(&input.attrs).is_err());
    }

    #[test]
    fn test_reject_unknown_struct_attribute() {
        let input: DeriveInput = parse_quote! {
            #[configuration(prefix = "APP_")]
            struct ServerSettings {}
        };

        assert!(StructAttrs::from_attrs(&input.attrs).is_err());
    }

    #[test]
    fn test_parse_name_attribute() {
        let field: Field = parse_quote! {
            #[configuration(name = "ListenPort")]
            pub port: u16
        };

        let attrs = FieldAttrs::from_field(&field).unwrap();
        assert_eq!(attrs.name, Some("ListenPort".to_string()));
    }

    #[test]
    fn test_parse_default_number() {
        let field: Field = parse_quote! {
            #[configuration(default = 8080)]
            pub port: u16
        };

        let attrs = FieldAttrs::from_field(&field).unwrap();
        assert!(matches!(attrs.default, Some(Expr::Lit(_))));
    }

    #[test]
    fn test_parse_default_expression() {
        let field: Field = parse_quote! {
            #[configuration(default = "primary".to_string(), required)]
            pub name: String
        };

        let attrs = FieldAttrs::from_field(&field).unwrap();
        assert!(matches!(attrs.default, Some(Expr::MethodCall(_))));
        assert!(attrs.required);
    }

    #[test]
    fn test_parse_flags() {
        let field: Field = parse_quote! {
            #[configuration(required, convert)]
            pub host: Option<Endpoint>
        };

        let attrs = FieldAttrs::from_field(&field).unwrap();
        assert!(attrs.required);
        assert!(attrs.convert);
        assert!(!attrs.nested);
        assert!(!attrs.skip);
    }

    #[test]
    fn test_parse_multiple_attributes() {
        let field: Field = parse_quote! {
            #[configuration(nested)]
            #[configuration(name = "Upstream")]
            pub upstream: UpstreamSettings
        };

        let attrs = FieldAttrs::from_field(&field).unwrap();
        assert!(attrs.nested);
        assert_eq!(attrs.name, Some("Upstream".to_string()));
    }

    #[test]
    fn test_ignore_foreign_attributes() {
        let field: Field = parse_quote! {
            #[serde(rename = "x")]
            pub value: u32
        };

        let attrs = FieldAttrs::from_field(&field).unwrap();
        assert!(attrs.name.is_none());
        assert!(!attrs.required);
    }

    #[test]
    fn test_reject_unknown_field_attribute() {
        let field: Field = parse_quote! {
            #[configuration(from_file)]
            pub secret: String
        };

        assert!(FieldAttrs::from_field(&field).is_err());
    }
}
