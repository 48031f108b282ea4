//! Error types for loading and binding configuration

use std::path::PathBuf;

/// Errors that can occur while loading configuration or looking it up.
///
/// Every variant is fatal to the call that produced it. A failed load never
/// leaves a partially populated cache behind.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// A load was attempted after configuration had already been loaded.
    ///
    /// The previously loaded configuration is left untouched.
    #[error("Configuration has already been loaded")]
    AlreadyLoaded,

    /// A lookup was attempted before any successful load.
    #[error(
        "Configuration has not been loaded. Call `load` with a valid settings path before retrieving configuration"
    )]
    NotLoaded,

    /// The settings document does not exist.
    #[error("Settings document '{}' was not found", path.display())]
    DocumentNotFound {
        /// Resolved path of the missing document
        path: PathBuf,
    },

    /// The settings document exists but could not be read.
    #[error("Failed to read settings document '{}': {source}", path.display())]
    DocumentRead {
        /// Resolved path of the document
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The settings document is not valid JSON, or its root is not an object.
    #[error("Settings document '{origin}' is malformed: {message}")]
    MalformedDocument {
        /// Path of the document, or `<inline>` for in-memory documents
        origin: String,
        /// Parser or shape error message
        message: String,
    },

    /// A section value could not be converted into the field's type.
    #[error("Failed to bind '{field}' of configuration '{type_name}': {message}")]
    Bind {
        /// Fully qualified name of the configuration type
        type_name: &'static str,
        /// Field path within the section (`outer.inner` for nested fields)
        field: String,
        /// Error message from deserialization or the converter
        message: String,
    },

    /// A field marked `required` is absent or holds its default value.
    #[error("Configuration '{type_name}' is missing a required valid '{field}' property")]
    MissingRequiredField {
        /// Fully qualified name of the configuration type
        type_name: &'static str,
        /// Field path within the section (`outer.inner` for nested fields)
        field: String,
    },
}

impl LoadError {
    pub(crate) fn malformed(origin: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::MalformedDocument {
            origin: origin.into(),
            message: message.to_string(),
        }
    }
}

/// A field-level binding failure, produced by [`Configuration::bind`].
///
/// The loader attaches the configuration type name and turns this into
/// [`LoadError::Bind`].
///
/// [`Configuration::bind`]: crate::Configuration::bind
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{field}': {message}")]
pub struct BindError {
    /// Field path within the section
    pub field: String,
    /// What went wrong
    pub message: String,
}

impl BindError {
    /// Create a binding error for `field` (used by macro-generated code)
    pub fn new(field: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self {
            field: field.into(),
            message: message.to_string(),
        }
    }

    /// Prefix the field path with the name of the enclosing field.
    pub fn within(self, parent: &str) -> Self {
        Self {
            field: format!("{}.{}", parent, self.field),
            message: self.message,
        }
    }

    pub(crate) fn into_load_error(self, type_name: &'static str) -> LoadError {
        LoadError::Bind {
            type_name,
            field: self.field,
            message: self.message,
        }
    }
}
