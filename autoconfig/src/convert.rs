//! Custom value converters
//!
//! A converter turns the textual form of a settings value into a typed value
//! when plain deserialization is not what the application wants, e.g. parsing
//! `"localhost"` into an [`IpAddr`](std::net::IpAddr).

use serde_json::Value;
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;

/// Custom parsing logic for a target type.
///
/// Implementing this trait is what tags a type as a converter; pass it to the
/// loader with [`CandidateType::converter`](crate::CandidateType::converter).
/// Once registered, every configuration field whose declared type is
/// [`Converter::Target`] (or `Option<Target>`) is produced by [`Converter::convert`].
///
/// # Example
///
/// ```rust
/// use autoconfig::Converter;
/// use std::net::{IpAddr, Ipv4Addr};
///
/// struct LoopbackAware;
///
/// impl Converter for LoopbackAware {
///     type Target = IpAddr;
///
///     fn convert(text: &str) -> autoconfig::anyhow::Result<IpAddr> {
///         if text.eq_ignore_ascii_case("localhost") {
///             return Ok(IpAddr::V4(Ipv4Addr::LOCALHOST));
///         }
///         Ok(text.parse()?)
///     }
/// }
/// ```
pub trait Converter: 'static {
    /// The type this converter produces.
    type Target: 'static;

    /// Parse the textual form of a settings value.
    ///
    /// Strings are passed as-is; numbers and booleans as their JSON text.
    fn convert(text: &str) -> anyhow::Result<Self::Target>;
}

pub(crate) type ErasedConvert = fn(&str) -> anyhow::Result<Box<dyn Any>>;

pub(crate) fn convert_erased<C: Converter>(text: &str) -> anyhow::Result<Box<dyn Any>> {
    C::convert(text).map(|value| Box::new(value) as Box<dyn Any>)
}

#[derive(Clone, Copy)]
struct Registration {
    converter: &'static str,
    convert: ErasedConvert,
}

/// Converters keyed by the type they produce.
///
/// Filled during discovery and only read while binding.
#[derive(Clone, Default)]
pub struct ConverterRegistry {
    converters: HashMap<TypeId, Registration>,
}

impl ConverterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `C` for its target type, replacing any earlier converter.
    ///
    /// Returns the type name of the replaced converter, if any.
    pub fn register<C: Converter>(&mut self) -> Option<&'static str> {
        self.insert(
            TypeId::of::<C::Target>(),
            type_name::<C>(),
            convert_erased::<C>,
        )
    }

    pub(crate) fn insert(
        &mut self,
        target: TypeId,
        converter: &'static str,
        convert: ErasedConvert,
    ) -> Option<&'static str> {
        self.converters
            .insert(target, Registration { converter, convert })
            .map(|previous| previous.converter)
    }

    /// Whether a converter produces `T`.
    pub fn has<T: 'static>(&self) -> bool {
        self.converters.contains_key(&TypeId::of::<T>())
    }

    /// Number of registered converters.
    pub fn len(&self) -> usize {
        self.converters.len()
    }

    /// Whether no converter is registered.
    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    /// Run the converter registered for `T` on a raw settings value.
    ///
    /// Returns `None` when no converter targets `T`.
    pub fn convert<T: 'static>(&self, raw: &Value) -> Option<Result<T, String>> {
        let registration = self.converters.get(&TypeId::of::<T>())?;
        Some(run(registration, raw))
    }
}

fn run<T: 'static>(registration: &Registration, raw: &Value) -> Result<T, String> {
    let text = scalar_text(raw)?;
    let value = (registration.convert)(&text)
        .map_err(|e| format!("converter '{}' failed: {:#}", registration.converter, e))?;
    value.downcast::<T>().map(|boxed| *boxed).map_err(|_| {
        format!(
            "converter '{}' did not produce a '{}'",
            registration.converter,
            type_name::<T>()
        )
    })
}

/// Textual form of a scalar settings value.
fn scalar_text(raw: &Value) -> Result<String, String> {
    match raw {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        Value::Array(_) | Value::Object(_) => {
            Err("expected a scalar value for a converted field".to_string())
        }
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.converters.values().map(|r| r.converter))
            .finish()
    }
}
