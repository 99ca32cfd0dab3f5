//! Configuration of the HTTP scope propagation.
//!
//! Loaded from the `scoped` section of a layered [`Figment`]:
//! defaults, then an optional YAML file, then `SCOPED__*` environment variables.

use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use http::HeaderName;
use serde::{Deserialize, Serialize};

/// Header carrying the scope when nothing else is configured.
pub const DEFAULT_SCOPE_HEADER: &str = "x-scope";

/// Configuration section name.
pub const SECTION: &str = "scoped";

/// Configuration error for the `scoped` section.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("invalid scoped configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),
    #[error("'{0}' is not a valid HTTP header name")]
    InvalidHeader(String),
    #[error("default_scope must not be empty")]
    EmptyDefaultScope,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScopedConfig {
    /// Request header the scope is read from.
    pub scope_header: String,
    /// Scope applied when the request does not carry one.
    pub default_scope: Option<String>,
}

impl Default for ScopedConfig {
    fn default() -> Self {
        Self {
            scope_header: DEFAULT_SCOPE_HEADER.to_owned(),
            default_scope: None,
        }
    }
}

impl ScopedConfig {
    /// Extract and validate the `scoped` section of `figment`.
    /// A missing section yields the defaults.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the section is malformed or fails validation.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = if figment.contains(SECTION) {
            figment.extract_inner(SECTION).map_err(Box::new)?
        } else {
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Layered load: defaults, then `path` (YAML) if given, then `SCOPED__*` env vars.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if any layer is malformed or the result fails validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment(path))
    }

    /// The layered figment [`load`](Self::load) reads from, for embedding in a larger config.
    #[must_use]
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::default(SECTION, Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment.merge(Env::prefixed("SCOPED__").split("__").map(|key| {
            format!("{SECTION}.{}", key.as_str()).into()
        }))
    }

    /// Check the header name and the default scope.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidHeader`] or [`ConfigError::EmptyDefaultScope`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.header_name()?;
        if self.default_scope.as_deref().is_some_and(str::is_empty) {
            return Err(ConfigError::EmptyDefaultScope);
        }
        Ok(())
    }

    /// Parsed [`scope_header`](Self::scope_header).
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidHeader`] if it is not a valid header name.
    pub fn header_name(&self) -> Result<HeaderName, ConfigError> {
        HeaderName::try_from(self.scope_header.as_str())
            .map_err(|_| ConfigError::InvalidHeader(self.scope_header.clone()))
    }
}
