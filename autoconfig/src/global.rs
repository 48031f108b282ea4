//! Process-wide load-once facade
//!
//! For applications that would rather not thread a [`ConfigurationLoader`]
//! through their code. The first successful [`load`] fixes the configuration
//! for the rest of the process; there is no way to reset it.
//!
//! Two threads racing on the first `load` both do the work, and the loser
//! gets [`LoadError::AlreadyLoaded`]. Serialize startup if that matters.
//!
//! [`ConfigurationLoader`]: crate::ConfigurationLoader

use crate::bind::Configuration;
use crate::discovery::CandidateType;
use crate::error::LoadError;
use crate::loader::Configurations;
use std::path::Path;
use std::sync::OnceLock;

static CONFIGURATIONS: OnceLock<Configurations> = OnceLock::new();

/// Load the process-wide configuration from the document at `path`.
///
/// # Errors
///
/// [`LoadError::AlreadyLoaded`] if configuration was loaded before, or any
/// error from [`Configurations::load`]. A failed load can be retried.
pub fn load(path: impl AsRef<Path>, candidates: &[CandidateType]) -> Result<(), LoadError> {
    if CONFIGURATIONS.get().is_some() {
        return Err(LoadError::AlreadyLoaded);
    }
    let configurations = Configurations::load(path, candidates)?;
    CONFIGURATIONS
        .set(configurations)
        .map_err(|_| LoadError::AlreadyLoaded)
}

/// Whether the process-wide configuration has been loaded.
pub fn is_loaded() -> bool {
    CONFIGURATIONS.get().is_some()
}

/// The process-wide instance bound for `T`.
///
/// # Errors
///
/// [`LoadError::NotLoaded`] before a successful [`load`]. `Ok(None)` means
/// `T` was not among the discovered configuration types.
pub fn get_configuration<T: Configuration>() -> Result<Option<&'static T>, LoadError> {
    configurations().map(Configurations::get::<T>)
}

/// All process-wide configuration.
pub fn configurations() -> Result<&'static Configurations, LoadError> {
    CONFIGURATIONS.get().ok_or(LoadError::NotLoaded)
}
