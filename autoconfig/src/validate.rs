//! Post-bind validation of `required` fields

use crate::discovery::{ConfigurationTag, Instance};
use crate::error::LoadError;

/// A `required` field and whether its bound value is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredField {
    /// Field path (`outer.inner` for fields of nested configurations)
    pub field: String,
    /// `false` if the value is absent or equal to the type's default
    pub satisfied: bool,
}

impl RequiredField {
    /// Record a required field (used by macro-generated code)
    pub fn new(field: impl Into<String>, satisfied: bool) -> Self {
        Self {
            field: field.into(),
            satisfied,
        }
    }
}

/// Whether a non-`Option` value differs from its type's default.
#[doc(hidden)]
pub fn is_set<T: Default + PartialEq>(value: &T) -> bool {
    *value != T::default()
}

/// Prefix the required fields of a nested configuration with the parent field name.
#[doc(hidden)]
pub fn nested(parent: &str, fields: Vec<RequiredField>) -> Vec<RequiredField> {
    fields
        .into_iter()
        .map(|f| RequiredField::new(format!("{}.{}", parent, f.field), f.satisfied))
        .collect()
}

/// Check every required field of every bound instance.
///
/// Types are visited in discovery order and fields in declaration order;
/// the first unsatisfied field fails the load.
pub(crate) fn check_required(bound: &[(ConfigurationTag, Instance)]) -> Result<(), LoadError> {
    for (tag, instance) in bound {
        let fields = (tag.required)(&**instance);
        if let Some(missing) = fields.into_iter().find(|f| !f.satisfied) {
            tracing::debug!(
                config_type = tag.type_name,
                field = %missing.field,
                "required field is missing"
            );
            return Err(LoadError::MissingRequiredField {
                type_name: tag.type_name,
                field: missing.field,
            });
        }
    }
    Ok(())
}
