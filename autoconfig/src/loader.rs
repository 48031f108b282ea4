//! One-shot load lifecycle and typed lookup

use crate::bind::Configuration;
use crate::convert::ConverterRegistry;
use crate::discovery::{CandidateType, Discovery, Instance};
use crate::document::{resolve_path, SettingsDocument};
use crate::error::LoadError;
use crate::validate::check_required;
use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Bound and validated configuration instances, keyed by type.
///
/// Immutable once built, so it can be shared freely across threads.
pub struct Configurations {
    instances: HashMap<TypeId, Instance>,
    type_names: Vec<&'static str>,
}

impl Configurations {
    /// Discover, bind and validate every configuration type in `candidates`
    /// against the document at `path`.
    ///
    /// # Errors
    ///
    /// - The document is missing, unreadable or malformed
    /// - A value cannot be deserialized or converted
    /// - A `required` field is absent or default after binding
    pub fn load(path: impl AsRef<Path>, candidates: &[CandidateType]) -> Result<Self, LoadError> {
        let path = path.as_ref();
        tracing::info!(
            path = %path.display(),
            candidates = candidates.len(),
            "loading configuration"
        );

        // Converters must be registered before any binding.
        let discovery = Discovery::scan(candidates);
        let converters = discovery.register_converters();
        let document = SettingsDocument::from_path(path)?;

        Self::bind_all(&discovery, &document, &converters)
    }

    /// Same as [`Configurations::load`] for an already parsed document.
    pub fn from_document(
        document: &SettingsDocument,
        candidates: &[CandidateType],
    ) -> Result<Self, LoadError> {
        tracing::info!(
            origin = document.origin(),
            candidates = candidates.len(),
            "loading configuration"
        );
        let discovery = Discovery::scan(candidates);
        let converters = discovery.register_converters();
        Self::bind_all(&discovery, document, &converters)
    }

    fn bind_all(
        discovery: &Discovery,
        document: &SettingsDocument,
        converters: &ConverterRegistry,
    ) -> Result<Self, LoadError> {
        let mut bound = Vec::with_capacity(discovery.configurations.len());
        for tag in &discovery.configurations {
            let instance = (tag.bind)(document, converters)?;
            bound.push((*tag, instance));
        }

        check_required(&bound)?;

        let type_names = bound.iter().map(|(tag, _)| tag.type_name).collect();
        let instances = bound
            .into_iter()
            .map(|(tag, instance)| (tag.type_id, instance))
            .collect::<HashMap<_, _>>();
        tracing::info!(
            configurations = instances.len(),
            converters = converters.len(),
            "configuration loaded"
        );

        Ok(Self {
            instances,
            type_names,
        })
    }

    /// The instance bound for `T`, or `None` if `T` was not a discovered configuration type.
    pub fn get<T: Configuration>(&self) -> Option<&T> {
        self.instances
            .get(&TypeId::of::<T>())
            .and_then(|instance| instance.downcast_ref::<T>())
    }

    /// Whether `T` was bound.
    pub fn contains<T: Configuration>(&self) -> bool {
        self.instances.contains_key(&TypeId::of::<T>())
    }

    /// Number of bound configuration types.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Whether no configuration type was bound.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Names of the bound configuration types, in discovery order.
    pub fn type_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.type_names.iter().copied()
    }
}

impl fmt::Debug for Configurations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configurations")
            .field("types", &self.type_names)
            .finish()
    }
}

/// Loads configuration exactly once and serves typed lookups afterwards.
///
/// ```rust
/// use autoconfig::{CandidateType, Configuration, ConfigurationLoader, SettingsDocument};
///
/// #[derive(Debug, Configuration)]
/// #[configuration(key = "Server")]
/// struct ServerSettings {
///     #[configuration(required)]
///     port: u16,
/// }
///
/// # fn main() -> Result<(), autoconfig::LoadError> {
/// let document: SettingsDocument = r#"{"Server": {"Port": 8080}}"#.parse()?;
///
/// let mut loader = ConfigurationLoader::new();
/// loader.load_document(&document, &[CandidateType::configuration::<ServerSettings>()])?;
///
/// let server = loader.get::<ServerSettings>()?.expect("bound");
/// assert_eq!(server.port, 8080);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ConfigurationLoader {
    base_path: Option<PathBuf>,
    loaded: Option<Configurations>,
}

impl ConfigurationLoader {
    /// Create an unloaded loader resolving relative paths against the current directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative document paths against `base_path`.
    pub fn with_base_path(mut self, base_path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(base_path.into());
        self
    }

    /// Load the document at `path` and bind every configuration type in `candidates`.
    ///
    /// # Errors
    ///
    /// [`LoadError::AlreadyLoaded`] if a previous load succeeded (the loaded
    /// configuration is kept), or any error from [`Configurations::load`], in
    /// which case the loader stays unloaded.
    pub fn load(
        &mut self,
        path: impl AsRef<Path>,
        candidates: &[CandidateType],
    ) -> Result<&Configurations, LoadError> {
        if self.loaded.is_some() {
            return Err(LoadError::AlreadyLoaded);
        }
        let path = resolve_path(self.base_path.as_deref(), path.as_ref());
        let configurations = Configurations::load(path, candidates)?;
        Ok(&*self.loaded.insert(configurations))
    }

    /// Load from an already parsed document.
    pub fn load_document(
        &mut self,
        document: &SettingsDocument,
        candidates: &[CandidateType],
    ) -> Result<&Configurations, LoadError> {
        if self.loaded.is_some() {
            return Err(LoadError::AlreadyLoaded);
        }
        let configurations = Configurations::from_document(document, candidates)?;
        Ok(&*self.loaded.insert(configurations))
    }

    /// Whether a load has succeeded.
    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    /// All loaded configuration.
    pub fn configurations(&self) -> Result<&Configurations, LoadError> {
        self.loaded.as_ref().ok_or(LoadError::NotLoaded)
    }

    /// The instance bound for `T`.
    ///
    /// # Errors
    ///
    /// [`LoadError::NotLoaded`] before a successful load. `Ok(None)` means
    /// `T` was not among the discovered configuration types.
    pub fn get<T: Configuration>(&self) -> Result<Option<&T>, LoadError> {
        self.configurations().map(Configurations::get::<T>)
    }

    /// Consume the loader, keeping only the loaded configuration.
    pub fn into_configurations(self) -> Result<Configurations, LoadError> {
        self.loaded.ok_or(LoadError::NotLoaded)
    }
}
