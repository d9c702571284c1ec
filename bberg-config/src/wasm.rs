use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Where the compiled modules live and how many threads they may use.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct WasmConfig {
    pub module_dir: PathBuf,
    /// File name of the module built without thread support
    pub single_threaded_module: String,
    /// File name of the module built with shared memory and threads
    pub multi_threaded_module: String,
    /// Overrides the detected CPU count when set
    pub threads: Option<usize>,
}

impl Default for WasmConfig {
    fn default() -> Self {
        Self {
            module_dir: PathBuf::from("."),
            single_threaded_module: "barretenberg.wasm".to_string(),
            multi_threaded_module: "barretenberg-threads.wasm".to_string(),
            threads: None,
        }
    }
}

impl WasmConfig {
    pub fn module_path(&self, multithreading: bool) -> PathBuf {
        let name = if multithreading {
            &self.multi_threaded_module
        } else {
            &self.single_threaded_module
        };
        self.module_dir.join(name)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.single_threaded_module.is_empty() || self.multi_threaded_module.is_empty() {
            return Err(ConfigError::Invalid(
                "module file names must not be empty".to_string(),
            ));
        }
        if self.threads == Some(0) {
            return Err(ConfigError::Invalid(
                "threads must be at least 1 when set".to_string(),
            ));
        }
        Ok(())
    }
}
