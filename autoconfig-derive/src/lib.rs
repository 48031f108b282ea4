//! Derive macro implementation for autoconfig

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::{parse_macro_input, Data, DeriveInput, Field, Fields, Type};

mod attrs;

use attrs::{FieldAttrs, StructAttrs};

/// Extract inner type from Option<T>
fn extract_option_inner_type(ty: &Type) -> Option<&Type> {
    if let Type::Path(type_path) = ty {
        if let Some(seg) = type_path.path.segments.last() {
            if seg.ident != "Option" {
                return None;
            }
            if let syn::PathArguments::AngleBracketed(args) = &seg.arguments {
                if let Some(syn::GenericArgument::Type(inner)) = args.args.first() {
                    return Some(inner);
                }
            }
        }
    }
    None
}

/// `Configuration` derive macro
///
/// Implements `autoconfig::Configuration`, binding the struct from one section
/// of the settings document.
///
/// # Supported Attributes
///
/// **Struct-level**:
/// - `#[configuration(key = "Section")]`: Section key (defaults to the struct name)
///
/// **Field-level**:
/// - `#[configuration(name = "DocumentKey")]`: Custom document key
/// - `#[configuration(default = value)]`: Value used when the entry is absent
/// - `#[configuration(required)]`: Fail the load if the value is absent or default
/// - `#[configuration(convert)]`: Produce the value with a registered converter
/// - `#[configuration(nested)]`: Bind a nested `Configuration` from the child section
/// - `#[configuration(skip)]`: Never bind; use `Default::default()`
///
/// # Example
///
/// See the `autoconfig` crate documentation for usage examples.
#[proc_macro_derive(Configuration, attributes(configuration))]
pub fn derive_configuration(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    // Struct name
    let struct_name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Configuration does not support generic structs",
        ));
    }

    let struct_attrs = StructAttrs::from_attrs(&input.attrs)?;
    let key = struct_attrs
        .key
        .unwrap_or_else(|| struct_name.unraw().to_string());

    // Extract fields
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "Configuration only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "Configuration only supports structs",
            ));
        }
    };

    let mut field_initializers = Vec::with_capacity(fields.len());
    let mut required_checks = Vec::new();

    for field in fields {
        let attrs = FieldAttrs::from_field(field)?;
        check_combinations(field, &attrs)?;
        field_initializers.push(bind_expr(field, &attrs));
        if let Some(check) = required_check(field, &attrs) {
            required_checks.push(check);
        }
    }

    let required_body = if required_checks.is_empty() {
        quote!(::std::vec::Vec::new())
    } else {
        quote! {
            let mut fields = ::std::vec::Vec::new();
            #(#required_checks)*
            fields
        }
    };

    Ok(quote! {
        impl ::autoconfig::Configuration for #struct_name {
            const KEY: &'static str = #key;

            #[allow(unused_variables)]
            fn bind(
                section: &::autoconfig::Section<'_>,
                converters: &::autoconfig::ConverterRegistry,
            ) -> ::std::result::Result<Self, ::autoconfig::BindError> {
                ::std::result::Result::Ok(Self {
                    #(#field_initializers),*
                })
            }

            fn required_fields(&self) -> ::std::vec::Vec<::autoconfig::RequiredField> {
                #required_body
            }
        }
    })
}

/// Reject attribute combinations that have no sensible meaning.
fn check_combinations(field: &Field, attrs: &FieldAttrs) -> syn::Result<()> {
    let ident = field.ident.as_ref().expect("named field");
    let is_option = extract_option_inner_type(&field.ty).is_some();

    let decorated = attrs.required
        || attrs.convert
        || attrs.nested
        || attrs.name.is_some()
        || attrs.default.is_some();

    let message = if attrs.skip && decorated {
        Some("skipped fields cannot carry other configuration attributes")
    } else if attrs.required && attrs.default.is_some() {
        Some("required fields cannot declare a default value")
    } else if is_option && attrs.default.is_some() {
        Some(
            "Option<T> fields cannot have default attribute (they default to None automatically)",
        )
    } else if attrs.nested && attrs.convert {
        Some("nested and convert cannot be combined")
    } else if attrs.nested && is_option {
        Some("nested fields cannot be Option<T>; absent sections already bind to defaults")
    } else if attrs.nested && attrs.default.is_some() {
        Some("nested fields cannot declare a default value")
    } else {
        None
    };

    match message {
        Some(message) => Err(syn::Error::new_spanned(ident, message)),
        None => Ok(()),
    }
}

/// Document key matched for a field: the `name` override or the field name.
fn document_name(field: &Field, attrs: &FieldAttrs) -> String {
    attrs.name.clone().unwrap_or_else(|| {
        field
            .ident
            .as_ref()
            .expect("named field")
            .unraw()
            .to_string()
    })
}

/// Generate the initializer for one field.
fn bind_expr(field: &Field, attrs: &FieldAttrs) -> TokenStream2 {
    let field_name = field.ident.as_ref().expect("named field");
    let field_type = &field.ty;
    let name = document_name(field, attrs);

    if attrs.skip {
        return quote! {
            #field_name: ::std::default::Default::default()
        };
    }

    if attrs.nested {
        return quote! {
            #field_name: ::autoconfig::bind::nested::<#field_type>(section, #name, converters)?
        };
    }

    let helper = if attrs.convert {
        quote!(::autoconfig::bind::converted)
    } else {
        quote!(::autoconfig::bind::value)
    };

    let bind_expr = if let Some(inner_type) = extract_option_inner_type(field_type) {
        // Option<T>: absent entries stay None
        quote! {
            #helper::<#inner_type>(section, #name, converters)?
        }
    } else {
        let fallback = match &attrs.default {
            Some(default_value) => quote! {
                .unwrap_or_else(|| #default_value)
            },
            None => quote! {
                .unwrap_or_default()
            },
        };
        quote! {
            #helper::<#field_type>(section, #name, converters)?#fallback
        }
    };

    quote! {
        #field_name: #bind_expr
    }
}

/// Generate the required-field record for one field, if it is required or nested.
fn required_check(field: &Field, attrs: &FieldAttrs) -> Option<TokenStream2> {
    let field_name = field.ident.as_ref().expect("named field");
    let label = field_name.unraw().to_string();

    if attrs.nested {
        let own = attrs.required.then(|| {
            quote! {
                fields.push(::autoconfig::RequiredField::new(
                    #label,
                    ::autoconfig::validate::is_set(&self.#field_name),
                ));
            }
        });
        return Some(quote! {
            #own
            fields.extend(::autoconfig::validate::nested(
                #label,
                ::autoconfig::Configuration::required_fields(&self.#field_name),
            ));
        });
    }

    if !attrs.required {
        return None;
    }

    let satisfied = if extract_option_inner_type(&field.ty).is_some() {
        quote!(self.#field_name.is_some())
    } else {
        quote!(::autoconfig::validate::is_set(&self.#field_name))
    };

    Some(quote! {
        fields.push(::autoconfig::RequiredField::new(#label, #satisfied));
    })
}
