//! Candidate type descriptors and tag-based discovery

use crate::bind::Configuration;
use crate::convert::{convert_erased, Converter, ConverterRegistry, ErasedConvert};
use crate::document::SettingsDocument;
use crate::error::LoadError;
use crate::validate::RequiredField;
use std::any::{type_name, Any, TypeId};
use std::collections::HashSet;
use std::fmt;

pub(crate) type Instance = Box<dyn Any + Send + Sync>;

/// Binds one configuration type from a document into a type-erased instance.
type BindFn = fn(&SettingsDocument, &ConverterRegistry) -> Result<Instance, LoadError>;

/// Lists the required fields of a type-erased instance.
type RequiredFn = fn(&(dyn Any + Send + Sync)) -> Vec<RequiredField>;

/// The "bind to section" tag of a candidate.
#[derive(Clone, Copy)]
pub struct ConfigurationTag {
    pub(crate) type_id: TypeId,
    pub(crate) type_name: &'static str,
    pub(crate) key: &'static str,
    pub(crate) bind: BindFn,
    pub(crate) required: RequiredFn,
}

impl ConfigurationTag {
    fn of<T: Configuration>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            key: T::KEY,
            bind: bind_erased::<T>,
            required: required_erased::<T>,
        }
    }

    /// Section key in the settings document.
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Fully qualified name of the configuration type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

/// The "custom conversion for type Y" tag of a candidate.
#[derive(Clone, Copy)]
pub struct ConverterTag {
    pub(crate) target: TypeId,
    pub(crate) target_name: &'static str,
    pub(crate) converter_name: &'static str,
    pub(crate) convert: ErasedConvert,
}

impl ConverterTag {
    fn of<C: Converter>() -> Self {
        Self {
            target: TypeId::of::<C::Target>(),
            target_name: type_name::<C::Target>(),
            converter_name: type_name::<C>(),
            convert: convert_erased::<C>,
        }
    }

    /// Fully qualified name of the type the converter produces.
    pub fn target_name(&self) -> &'static str {
        self.target_name
    }
}

/// A type offered to the loader for discovery.
///
/// Carries zero or one configuration tag and zero or one converter tag.
/// Untagged candidates are accepted and ignored.
///
/// ```rust
/// use autoconfig::{CandidateType, Configuration};
///
/// #[derive(Debug, Default, Configuration)]
/// #[configuration(key = "Server")]
/// struct ServerSettings {
///     port: u16,
/// }
///
/// let candidates = [
///     CandidateType::configuration::<ServerSettings>(),
///     CandidateType::untagged::<String>(),
/// ];
/// assert!(candidates[0].configuration_tag().is_some());
/// assert!(candidates[1].configuration_tag().is_none());
/// ```
#[derive(Clone, Copy)]
pub struct CandidateType {
    name: &'static str,
    configuration: Option<ConfigurationTag>,
    converter: Option<ConverterTag>,
}

impl CandidateType {
    /// A candidate carrying no tag.
    pub fn untagged<T: ?Sized + 'static>() -> Self {
        Self {
            name: type_name::<T>(),
            configuration: None,
            converter: None,
        }
    }

    /// A configuration type, bound to the section named by `T::KEY`.
    pub fn configuration<T: Configuration>() -> Self {
        Self {
            configuration: Some(ConfigurationTag::of::<T>()),
            ..Self::untagged::<T>()
        }
    }

    /// A converter type, registered for `C::Target`.
    pub fn converter<C: Converter>() -> Self {
        Self {
            converter: Some(ConverterTag::of::<C>()),
            ..Self::untagged::<C>()
        }
    }

    /// A type that is both a configuration type and a converter.
    pub fn both<T: Configuration + Converter>() -> Self {
        Self {
            converter: Some(ConverterTag::of::<T>()),
            ..Self::configuration::<T>()
        }
    }

    /// Fully qualified name of the candidate type.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The configuration tag, if any.
    pub fn configuration_tag(&self) -> Option<&ConfigurationTag> {
        self.configuration.as_ref()
    }

    /// The converter tag, if any.
    pub fn converter_tag(&self) -> Option<&ConverterTag> {
        self.converter.as_ref()
    }
}

impl fmt::Debug for CandidateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CandidateType")
            .field("name", &self.name)
            .field("key", &self.configuration.map(|tag| tag.key))
            .field("converts", &self.converter.map(|tag| tag.target_name))
            .finish()
    }
}

/// Candidates partitioned by tag, in the order they were supplied.
#[derive(Default)]
pub(crate) struct Discovery {
    pub(crate) configurations: Vec<ConfigurationTag>,
    pub(crate) converters: Vec<ConverterTag>,
}

impl Discovery {
    pub(crate) fn scan(candidates: &[CandidateType]) -> Self {
        let mut discovery = Self::default();
        let mut seen = HashSet::new();

        for candidate in candidates {
            if let Some(tag) = candidate.configuration {
                if seen.insert(tag.type_id) {
                    tracing::debug!(
                        config_type = tag.type_name,
                        key = tag.key,
                        "discovered configuration type"
                    );
                    discovery.configurations.push(tag);
                } else {
                    tracing::debug!(
                        config_type = tag.type_name,
                        "skipping duplicate configuration type"
                    );
                }
            }
            if let Some(tag) = candidate.converter {
                tracing::debug!(
                    converter = tag.converter_name,
                    target_type = tag.target_name,
                    "discovered converter type"
                );
                discovery.converters.push(tag);
            }
        }

        discovery
    }

    /// Build the converter table. Must run before any binding.
    pub(crate) fn register_converters(&self) -> ConverterRegistry {
        let mut registry = ConverterRegistry::new();
        for tag in &self.converters {
            if let Some(previous) = registry.insert(tag.target, tag.converter_name, tag.convert) {
                tracing::warn!(
                    target_type = tag.target_name,
                    replaced = previous,
                    converter = tag.converter_name,
                    "converter replaced an earlier registration"
                );
            }
        }
        registry
    }
}

fn bind_erased<T: Configuration>(
    document: &SettingsDocument,
    converters: &ConverterRegistry,
) -> Result<Instance, LoadError> {
    let section = document.section(T::KEY);
    if !section.exists() {
        tracing::warn!(
            config_type = type_name::<T>(),
            key = T::KEY,
            "section not found in settings document, binding defaults"
        );
    } else if section.is_scalar() {
        tracing::warn!(
            config_type = type_name::<T>(),
            key = T::KEY,
            "section is not an object, binding defaults"
        );
    }

    let instance =
        T::bind(&section, converters).map_err(|e| e.into_load_error(type_name::<T>()))?;
    tracing::debug!(
        config_type = type_name::<T>(),
        key = T::KEY,
        "bound configuration section"
    );
    Ok(Box::new(instance))
}

fn required_erased<T: Configuration>(instance: &(dyn Any + Send + Sync)) -> Vec<RequiredField> {
    instance
        .downcast_ref::<T>()
        .map(T::required_fields)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bind::Configuration;
    use crate::document::Section;
    use crate::error::BindError;
    use std::net::IpAddr;

    #[derive(Debug, Default)]
    struct Server;

    impl Configuration for Server {
        const KEY: &'static str = "Server";

        fn bind(_: &Section<'_>, _: &ConverterRegistry) -> Result<Self, BindError> {
            Ok(Self)
        }

        fn required_fields(&self) -> Vec<RequiredField> {
            Vec::new()
        }
    }

    #[derive(Debug, Default)]
    struct Database;

    impl Configuration for Database {
        const KEY: &'static str = "Database";

        fn bind(_: &Section<'_>, _: &ConverterRegistry) -> Result<Self, BindError> {
            Ok(Self)
        }

        fn required_fields(&self) -> Vec<RequiredField> {
            Vec::new()
        }
    }

    struct AddressConverter;

    impl Converter for AddressConverter {
        type Target = IpAddr;

        fn convert(text: &str) -> anyhow::Result<IpAddr> {
            Ok(text.parse()?)
        }
    }

    struct OtherAddressConverter;

    impl Converter for OtherAddressConverter {
        type Target = IpAddr;

        fn convert(text: &str) -> anyhow::Result<IpAddr> {
            Ok(text.parse()?)
        }
    }

    #[test]
    fn test_scan_partitions_by_tag() {
        let discovery = Discovery::scan(&[
            CandidateType::untagged::<String>(),
            CandidateType::configuration::<Server>(),
            CandidateType::converter::<AddressConverter>(),
            CandidateType::configuration::<Database>(),
        ]);

        let keys: Vec<_> = discovery.configurations.iter().map(|tag| tag.key).collect();
        assert_eq!(keys, vec!["Server", "Database"]);
        assert_eq!(discovery.converters.len(), 1);
        assert_eq!(discovery.converters[0].target_name(), type_name::<IpAddr>());
    }

    #[test]
    fn test_scan_skips_duplicate_configuration_types() {
        let discovery = Discovery::scan(&[
            CandidateType::configuration::<Server>(),
            CandidateType::configuration::<Server>(),
        ]);
        assert_eq!(discovery.configurations.len(), 1);
    }

    #[test]
    fn test_register_converters_keeps_last_registration() {
        let discovery = Discovery::scan(&[
            CandidateType::converter::<AddressConverter>(),
            CandidateType::converter::<OtherAddressConverter>(),
        ]);

        let registry = discovery.register_converters();
        assert_eq!(registry.len(), 1);
        assert!(registry.has::<IpAddr>());
        assert!(format!("{registry:?}").contains("OtherAddressConverter"));
    }

    #[test]
    fn test_untagged_candidate_is_ignored() {
        let discovery = Discovery::scan(&[CandidateType::untagged::<u32>()]);
        assert!(discovery.configurations.is_empty());
        assert!(discovery.converters.is_empty());
    }

    #[test]
    fn test_candidate_debug_shows_tags() {
        let debug = format!("{:?}", CandidateType::configuration::<Server>());
        assert!(debug.contains("Some(\"Server\")"));
    }
}
