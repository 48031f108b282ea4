//! Section-to-struct binding

use crate::convert::ConverterRegistry;
use crate::document::Section;
use crate::error::BindError;
use crate::validate::RequiredField;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::any::type_name;

/// A struct bound from one section of the settings document.
///
/// Normally implemented with `#[derive(Configuration)]`:
///
/// ```rust
/// use autoconfig::Configuration;
/// use std::net::IpAddr;
///
/// #[derive(Debug, Configuration)]
/// #[configuration(key = "Server")]
/// struct ServerSettings {
///     #[configuration(default = 8080)]
///     port: u16,
///
///     #[configuration(required)]
///     host: Option<IpAddr>,
/// }
/// ```
pub trait Configuration: Sized + Send + Sync + 'static {
    /// Section key in the settings document.
    ///
    /// `:` separates nested section names.
    const KEY: &'static str;

    /// Build an instance from `section`.
    ///
    /// A missing section or entry must produce the field's default value,
    /// not an error; absent required values are caught by validation.
    fn bind(section: &Section<'_>, converters: &ConverterRegistry) -> Result<Self, BindError>;

    /// The `required` fields of this instance and whether each holds a value.
    fn required_fields(&self) -> Vec<RequiredField>;
}

/// Bind an entry through its converter, or deserialize it when no converter targets `T`.
///
/// Returns `None` if the entry is absent. Used by the derive macro for plain fields.
#[doc(hidden)]
pub fn value<T>(
    section: &Section<'_>,
    field: &str,
    converters: &ConverterRegistry,
) -> Result<Option<T>, BindError>
where
    T: DeserializeOwned + 'static,
{
    let Some(raw) = section.get(field) else {
        return Ok(None);
    };

    let result = match converters.convert::<T>(raw) {
        Some(converted) => converted,
        None => deserialize::<T>(raw),
    };
    result.map(Some).map_err(|message| BindError::new(field, message))
}

/// Bind an entry that can only be produced by a registered converter.
///
/// Used by the derive macro for `#[configuration(convert)]` fields.
#[doc(hidden)]
pub fn converted<T: 'static>(
    section: &Section<'_>,
    field: &str,
    converters: &ConverterRegistry,
) -> Result<Option<T>, BindError> {
    let Some(raw) = section.get(field) else {
        return Ok(None);
    };

    match converters.convert::<T>(raw) {
        Some(result) => result.map(Some).map_err(|message| BindError::new(field, message)),
        None => Err(BindError::new(
            field,
            format!("no converter is registered for '{}'", type_name::<T>()),
        )),
    }
}

/// Bind a nested configuration from the child section named `field`.
///
/// Used by the derive macro for `#[configuration(nested)]` fields.
#[doc(hidden)]
pub fn nested<T: Configuration>(
    section: &Section<'_>,
    field: &str,
    converters: &ConverterRegistry,
) -> Result<T, BindError> {
    let child = section.child(field);
    T::bind(&child, converters).map_err(|e| e.within(field))
}

/// Deserialize a raw entry, coercing scalars between text and typed forms.
///
/// Settings files often quote every value, so `"8080"` binds to integers and
/// `"True"` to booleans. In the other direction numbers and booleans bind to
/// string fields as their JSON text.
fn deserialize<T: DeserializeOwned>(raw: &Value) -> Result<T, String> {
    let err = match T::deserialize(raw) {
        Ok(value) => return Ok(value),
        Err(err) => err,
    };

    let coerced = match raw {
        Value::String(text) => serde_json::from_str::<T>(text)
            .ok()
            .or_else(|| parse_bool(text).and_then(|b| T::deserialize(&Value::Bool(b)).ok())),
        Value::Number(n) => T::deserialize(&Value::String(n.to_string())).ok(),
        Value::Bool(b) => T::deserialize(&Value::String(b.to_string())).ok(),
        _ => None,
    };
    coerced.ok_or_else(|| format!("expected {}: {}", type_name::<T>(), err))
}

fn parse_bool(text: &str) -> Option<bool> {
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::Converter;
    use crate::document::SettingsDocument;
    use serde::Deserialize;
    use serde_json::json;
    use std::net::{IpAddr, Ipv4Addr};

    struct Loopback;

    impl Converter for Loopback {
        type Target = IpAddr;

        fn convert(text: &str) -> anyhow::Result<IpAddr> {
            if text == "localhost" {
                return Ok(IpAddr::V4(Ipv4Addr::LOCALHOST));
            }
            Ok(text.parse()?)
        }
    }

    #[derive(Debug, PartialEq)]
    struct Endpoint {
        host: String,
        port: u16,
    }

    struct EndpointConverter;

    impl Converter for EndpointConverter {
        type Target = Endpoint;

        fn convert(text: &str) -> anyhow::Result<Endpoint> {
            let (host, port) = text
                .rsplit_once(':')
                .ok_or_else(|| anyhow::anyhow!("missing port in '{}'", text))?;
            Ok(Endpoint {
                host: host.to_string(),
                port: port.parse()?,
            })
        }
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Retry {
        attempts: u32,
    }

    fn document() -> SettingsDocument {
        SettingsDocument::from_value(json!({
            "Server": {
                "Port": 8080,
                "QuotedPort": "9090",
                "Debug": "true",
                "Enabled": "False",
                "Version": 2,
                "Secure": true,
                "Name": "edge",
                "Host": "localhost",
                "Upstream": "backend:7000",
                "Retry": { "attempts": 3 },
                "Tags": ["a", "b"]
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_value_deserializes_primitives() {
        let doc = document();
        let section = doc.section("Server");
        let converters = ConverterRegistry::new();

        let port: Option<u16> = value(&section, "port", &converters).unwrap();
        let name: Option<String> = value(&section, "name", &converters).unwrap();
        let tags: Option<Vec<String>> = value(&section, "tags", &converters).unwrap();
        let retry: Option<Retry> = value(&section, "retry", &converters).unwrap();

        assert_eq!(port, Some(8080));
        assert_eq!(name.as_deref(), Some("edge"));
        assert_eq!(tags, Some(vec!["a".to_string(), "b".to_string()]));
        assert_eq!(retry, Some(Retry { attempts: 3 }));
    }

    #[test]
    fn test_value_coerces_quoted_scalars() {
        let doc = document();
        let section = doc.section("Server");
        let converters = ConverterRegistry::new();

        let port: Option<u16> = value(&section, "quoted_port", &converters).unwrap();
        let debug: Option<bool> = value(&section, "debug", &converters).unwrap();

        assert_eq!(port, Some(9090));
        assert_eq!(debug, Some(true));
    }

    #[test]
    fn test_value_bool_text_ignores_case() {
        let doc = document();
        let section = doc.section("Server");
        let converters = ConverterRegistry::new();

        let enabled: Option<bool> = value(&section, "enabled", &converters).unwrap();
        assert_eq!(enabled, Some(false));
    }

    #[test]
    fn test_value_scalars_bind_to_strings() {
        let doc = document();
        let section = doc.section("Server");
        let converters = ConverterRegistry::new();

        let version: Option<String> = value(&section, "version", &converters).unwrap();
        let secure: Option<String> = value(&section, "secure", &converters).unwrap();
        assert_eq!(version.as_deref(), Some("2"));
        assert_eq!(secure.as_deref(), Some("true"));

        // Structured values are never flattened into text
        assert!(value::<String>(&section, "retry", &converters).is_err());
    }

    #[test]
    fn test_value_missing_entry_is_none() {
        let doc = document();
        let section = doc.section("Server");
        let converters = ConverterRegistry::new();

        let missing: Option<u32> = value(&section, "timeout", &converters).unwrap();
        assert_eq!(missing, None);

        let absent = Section::missing("Database");
        let missing: Option<u32> = value(&absent, "port", &converters).unwrap();
        assert_eq!(missing, None);
    }

    #[test]
    fn test_value_type_mismatch_names_field() {
        let doc = document();
        let section = doc.section("Server");
        let converters = ConverterRegistry::new();

        let err = value::<u16>(&section, "name", &converters).unwrap_err();
        assert_eq!(err.field, "name");
        assert!(err.message.contains("u16"));
    }

    #[test]
    fn test_value_prefers_registered_converter() {
        let doc = document();
        let section = doc.section("Server");
        let mut converters = ConverterRegistry::new();

        // IpAddr deserializes from strings, but not from "localhost"
        assert!(value::<IpAddr>(&section, "host", &converters).is_err());

        converters.register::<Loopback>();
        let host: Option<IpAddr> = value(&section, "host", &converters).unwrap();
        assert_eq!(host, Some(IpAddr::V4(Ipv4Addr::LOCALHOST)));
    }

    #[test]
    fn test_converted_requires_converter() {
        let doc = document();
        let section = doc.section("Server");
        let mut converters = ConverterRegistry::new();

        let err = converted::<Endpoint>(&section, "upstream", &converters).unwrap_err();
        assert!(err.message.contains("no converter is registered"));

        converters.register::<EndpointConverter>();
        let upstream: Option<Endpoint> = converted(&section, "upstream", &converters).unwrap();
        assert_eq!(
            upstream,
            Some(Endpoint {
                host: "backend".to_string(),
                port: 7000
            })
        );
    }

    #[test]
    fn test_converted_missing_entry_is_none_without_converter() {
        let doc = document();
        let section = doc.section("Server");
        let converters = ConverterRegistry::new();

        let missing: Option<Endpoint> = converted(&section, "fallback", &converters).unwrap();
        assert_eq!(missing, None);
    }
}
