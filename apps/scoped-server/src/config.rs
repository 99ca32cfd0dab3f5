use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use scoped::ScopedConfig;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 8087;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
        }
    }
}

/// Effective server configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub scoped: ScopedConfig,
}

impl AppConfig {
    /// Layered config: defaults, then YAML (if provided), then env (`APP__*`).
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        let figment = figment.merge(Env::prefixed("APP__").split("__"));

        let config: Self = figment.extract()?;
        config.scoped.validate()?;
        Ok(config)
    }

    pub fn apply_port_override(&mut self, port: Option<u16>) {
        if let Some(port) = port {
            self.server.bind.set_port(port);
        }
    }

    pub fn to_pretty_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn yaml_sections_are_merged_over_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "server:\n  bind: 0.0.0.0:9000\nscoped:\n  default_scope: guest"
        )
        .unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.server.bind.port(), 9000);
        assert_eq!(config.scoped.default_scope.as_deref(), Some("guest"));
        assert_eq!(config.scoped.scope_header, "x-scope");
    }

    #[test]
    fn port_override_keeps_host() {
        let mut config = AppConfig::default();
        config.apply_port_override(Some(1234));
        assert_eq!(config.server.bind.to_string(), "127.0.0.1:1234");
    }

    #[test]
    fn invalid_scope_header_fails_to_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "scoped:\n  scope_header: \"bad header\"").unwrap();
        assert!(AppConfig::load(Some(file.path())).is_err());
    }
}
