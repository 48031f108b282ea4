//! Typed configuration bound from JSON settings sections
//!
//! `autoconfig` turns sections of a JSON settings document into strongly typed,
//! validated structs. Configuration types declare the section they bind to with
//! `#[derive(Configuration)]`; converter types provide custom parsing for
//! values that need more than plain deserialization. The application hands the
//! loader a list of candidate types, and the loader discovers, binds and
//! validates them in one all-or-nothing step.
//!
//! # Features
//!
//! - **Declarative**: `#[derive(Configuration)]` with `#[configuration(key = "Section")]`
//! - **Forgiving matching**: section and field names match case-insensitively,
//!   `max_connections` matches `MaxConnections`
//! - **Custom converters**: implement [`Converter`] to parse e.g. network addresses
//! - **Required fields**: `#[configuration(required)]` fails the load when a value
//!   is absent or default
//! - **Load once**: a second load is rejected; lookups before loading are errors
//!
//! # Example
//!
//! ```rust
//! use autoconfig::{CandidateType, Configuration, ConfigurationLoader, Converter};
//! use std::io::Write;
//! use std::net::{IpAddr, Ipv4Addr};
//!
//! #[derive(Debug, Configuration)]
//! #[configuration(key = "Server")]
//! struct ServerSettings {
//!     pub port: u16,
//!
//!     #[configuration(required)]
//!     pub host: Option<IpAddr>,
//! }
//!
//! struct AddressConverter;
//!
//! impl Converter for AddressConverter {
//!     type Target = IpAddr;
//!
//!     fn convert(text: &str) -> autoconfig::anyhow::Result<IpAddr> {
//!         match text {
//!             "localhost" => Ok(IpAddr::V4(Ipv4Addr::LOCALHOST)),
//!             other => Ok(other.parse()?),
//!         }
//!     }
//! }
//!
//! # fn main() -> anyhow::Result<()> {
//! # let mut file = tempfile::NamedTempFile::new()?;
//! # write!(file, r#"{{"Server": {{"Port": 8080, "Host": "localhost"}}}}"#)?;
//! # let path = file.path();
//! let mut loader = ConfigurationLoader::new();
//! loader.load(
//!     path,
//!     &[
//!         CandidateType::configuration::<ServerSettings>(),
//!         CandidateType::converter::<AddressConverter>(),
//!     ],
//! )?;
//!
//! let server = loader.get::<ServerSettings>()?.expect("ServerSettings is a configuration type");
//! assert_eq!(server.port, 8080);
//! assert_eq!(server.host, Some(IpAddr::V4(Ipv4Addr::LOCALHOST)));
//! # Ok(())
//! # }
//! ```
//!
//! # Attributes
//!
//! ## `#[configuration(key = "Section")]`
//!
//! Struct-level. The section of the settings document to bind. `:` separates
//! nested section names (`"Logging:LogLevel"`). Each name matches like a field
//! name, so `"logging:log_level"` finds the same section. Defaults to the
//! struct name.
//!
//! ## `#[configuration(required)]`
//!
//! The field must hold a value after binding: `Some(_)` for `Option<T>`,
//! anything but `T::default()` otherwise.
//!
//! ## `#[configuration(default = value)]`
//!
//! Value used when the document has no entry for the field. Without it,
//! absent fields take `Default::default()`.
//!
//! ```rust
//! # use autoconfig::Configuration;
//! #[derive(Configuration)]
//! #[configuration(key = "Pool")]
//! struct PoolSettings {
//!     #[configuration(default = 10)]
//!     pub max_connections: u32,
//!
//!     #[configuration(default = "primary".to_string())]
//!     pub name: String,
//! }
//! ```
//!
//! ## `#[configuration(name = "DocumentKey")]`
//!
//! Match a document key different from the field name.
//!
//! ## `#[configuration(convert)]`
//!
//! The field type has no `Deserialize` impl and must be produced by a
//! registered [`Converter`].
//!
//! ## `#[configuration(nested)]`
//!
//! The field type is itself a [`Configuration`], bound from the child section
//! with the same rules. Its required fields are validated too.
//!
//! ## `#[configuration(skip)]`
//!
//! Never bound; always `Default::default()`.

#[doc(hidden)]
pub mod bind;

mod convert;
mod discovery;
mod document;
mod error;
pub mod global;
mod loader;

#[doc(hidden)]
pub mod validate;

pub use autoconfig_derive::Configuration;
pub use bind::Configuration;
pub use convert::{Converter, ConverterRegistry};
pub use discovery::{CandidateType, ConfigurationTag, ConverterTag};
pub use document::{field_names_match, Section, SettingsDocument, KEY_DELIMITER};
pub use error::{BindError, LoadError};
pub use global::{get_configuration, load};
pub use loader::{ConfigurationLoader, Configurations};
pub use validate::RequiredField;

// Re-export for converter implementations
pub use anyhow;
