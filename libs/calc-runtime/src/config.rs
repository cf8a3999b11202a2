//! Layered configuration loading.
//!
//! Sources are merged in this order, later ones winning:
//! 1. `T::default()`
//! 2. YAML file (if a path is given)
//! 3. environment variables prefixed with [`ENV_PREFIX`], `__` separating nested keys
//!
//! CLI overrides are applied by the caller on the extracted value.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Prefix for environment overrides, e.g. `CALC__FRONTEND__REQUEST_TIMEOUT_MS=2000`.
pub const ENV_PREFIX: &str = "CALC__";

/// Configuration error for layered config loading.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("config file does not exist: {}", path.display())]
    MissingFile { path: PathBuf },
    #[error("invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),
    #[error("failed to render configuration: {0}")]
    Render(String),
}

/// Load a typed configuration from defaults, an optional YAML file and the environment.
///
/// # Errors
/// Returns `ConfigError::MissingFile` if `path` is given but is not a file, and
/// `ConfigError::Invalid` if the merged sources cannot be deserialized into `T`.
pub fn load_layered<T>(path: Option<&Path>) -> Result<T, ConfigError>
where
    T: Serialize + DeserializeOwned + Default,
{
    let mut figment = Figment::from(Serialized::defaults(T::default()));

    if let Some(path) = path {
        if !path.is_file() {
            return Err(ConfigError::MissingFile {
                path: path.to_path_buf(),
            });
        }
        figment = figment.merge(Yaml::file(path));
    }

    figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

    figment.extract().map_err(|e| ConfigError::Invalid(Box::new(e)))
}

/// Render a configuration value as YAML.
///
/// # Errors
/// Returns `ConfigError::Render` if the value cannot be serialized.
pub fn to_yaml<T: Serialize>(value: &T) -> Result<String, ConfigError> {
    serde_saphyr::to_string(value).map_err(|e| ConfigError::Render(e.to_string()))
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Write;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    struct Sample {
        name: String,
        port: u16,
        nested: Nested,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    struct Nested {
        timeout_ms: u64,
    }

    impl Default for Sample {
        fn default() -> Self {
            Self {
                name: "sample".to_owned(),
                port: 5000,
                nested: Nested::default(),
            }
        }
    }

    impl Default for Nested {
        fn default() -> Self {
            Self { timeout_ms: 5000 }
        }
    }

    #[test]
    fn defaults_when_no_sources() {
        temp_env::with_vars_unset(["CALC__PORT", "CALC__NAME"], || {
            let cfg: Sample = load_layered(None).unwrap();
            assert_eq!(cfg, Sample::default());
        });
    }

    #[test]
    fn yaml_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port: 6000\nnested:\n  timeout_ms: 100").unwrap();

        temp_env::with_vars_unset(["CALC__PORT", "CALC__NESTED__TIMEOUT_MS"], || {
            let cfg: Sample = load_layered(Some(file.path())).unwrap();
            assert_eq!(cfg.port, 6000);
            assert_eq!(cfg.nested.timeout_ms, 100);
            assert_eq!(cfg.name, "sample");
        });
    }

    #[test]
    fn env_overrides_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port: 6000").unwrap();

        temp_env::with_vars(
            [
                ("CALC__PORT", Some("7000")),
                ("CALC__NESTED__TIMEOUT_MS", Some("250")),
            ],
            || {
                let cfg: Sample = load_layered(Some(file.path())).unwrap();
                assert_eq!(cfg.port, 7000);
                assert_eq!(cfg.nested.timeout_ms, 250);
            },
        );
    }

    #[test]
    fn missing_file_is_reported() {
        let err = load_layered::<Sample>(Some(Path::new("/definitely/not/here.yaml")))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingFile { .. }));
    }

    #[test]
    fn yaml_rendering_contains_fields() {
        let yaml = to_yaml(&Sample::default()).unwrap();
        assert!(yaml.contains("port: 5000"));
        assert!(yaml.contains("timeout_ms: 5000"));
    }
}
