use log::warn;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

use std::{
    fs, io,
    path::{Path, PathBuf},
};

pub mod logging;
pub mod wasm;

pub use logging::LoggingConfig;
pub use wasm::WasmConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("couldn't read configuration file at {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("couldn't parse configuration file at {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Settings for the glue around the codec: logging and module loading.
#[derive(Deserialize, Serialize, Default, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct BbergConfiguration {
    pub logging: LoggingConfig,
    pub wasm: WasmConfig,
}

pub trait LoadTomlConfiguration {
    fn load() -> Result<Self, ConfigError>
    where
        Self: Sized + Default + Serialize + DeserializeOwned,
    {
        Self::load_from(Self::get_path())
    }

    /// Reads the configuration at `path`, or writes the defaults there when
    /// nothing exists yet.
    fn load_from(path: &Path) -> Result<Self, ConfigError>
    where
        Self: Sized + Default + Serialize + DeserializeOwned,
    {
        let config = if path.exists() {
            let file_content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

            toml::from_str(&file_content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            let content = Self::default();

            match toml::to_string(&content) {
                Ok(serialized) => {
                    if let Err(err) = fs::write(path, serialized) {
                        warn!(
                            "Couldn't write default config to {:?}. Reason: {}",
                            path, err
                        );
                    }
                }
                Err(err) => warn!("Couldn't serialize default config. Reason: {}", err),
            }

            content
        };

        config.validate()?;
        Ok(config)
    }

    fn get_path() -> &'static Path;

    fn validate(&self) -> Result<(), ConfigError>;
}

impl LoadTomlConfiguration for BbergConfiguration {
    fn get_path() -> &'static Path {
        Path::new("bberg.toml")
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.wasm.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logging::LevelFilter;

    #[test]
    fn missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bberg.toml");

        let config = BbergConfiguration::load_from(&path).unwrap();
        assert_eq!(config, BbergConfiguration::default());
        assert!(path.exists());

        // and the written file reads back to the same thing
        assert_eq!(BbergConfiguration::load_from(&path).unwrap(), config);
    }

    #[test]
    fn partial_files_keep_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bberg.toml");
        fs::write(
            &path,
            "[logging]\nlevel = \"Debug\"\ndebug_workers = true\n\n[wasm]\nthreads = 4\n",
        )
        .unwrap();

        let config = BbergConfiguration::load_from(&path).unwrap();
        assert_eq!(config.logging.level, LevelFilter::Debug);
        assert!(config.logging.debug_workers);
        assert!(config.logging.enabled);
        assert_eq!(config.wasm.threads, Some(4));
        assert_eq!(config.wasm.single_threaded_module, "barretenberg.wasm");
    }

    #[test]
    fn zero_threads_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bberg.toml");
        fs::write(&path, "[wasm]\nthreads = 0\n").unwrap();

        assert!(matches!(
            BbergConfiguration::load_from(&path),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn malformed_toml_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bberg.toml");
        fs::write(&path, "[logging\nlevel = ").unwrap();

        assert!(matches!(
            BbergConfiguration::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn module_path_follows_threading() {
        let config = WasmConfig {
            module_dir: PathBuf::from("modules"),
            ..Default::default()
        };
        assert_eq!(
            config.module_path(true),
            Path::new("modules").join("barretenberg-threads.wasm")
        );
        assert_eq!(
            config.module_path(false),
            Path::new("modules").join("barretenberg.wasm")
        );
    }

    #[test]
    fn level_filter_maps_onto_log() {
        assert_eq!(
            log::LevelFilter::from(LevelFilter::Trace),
            log::LevelFilter::Trace
        );
        assert_eq!(log::LevelFilter::from(LevelFilter::Off), log::LevelFilter::Off);
    }
}
