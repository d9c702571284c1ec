use std::{io, path::PathBuf};

use bberg_config::WasmConfig;
use bytes::Bytes;
use thiserror::Error;

/// Every wasm binary starts with `\0asm`.
const WASM_MAGIC: [u8; 4] = *b"\0asm";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("couldn't read module at {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{0:?} is not a wasm module")]
    NotWasm(PathBuf),
}

/// Loads the compiled module, picking the threaded build when `multithreading` is set.
pub async fn fetch_code(config: &WasmConfig, multithreading: bool) -> Result<Bytes, FetchError> {
    let path = config.module_path(multithreading);
    log::debug!("Loading module from {:?}", path);

    let code = tokio::fs::read(&path)
        .await
        .map_err(|source| FetchError::Read {
            path: path.clone(),
            source,
        })?;
    if !code.starts_with(&WASM_MAGIC) {
        return Err(FetchError::NotWasm(path));
    }

    log::debug!("Loaded {} bytes from {:?}", code.len(), path);
    Ok(Bytes::from(code))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_in(dir: &tempfile::TempDir) -> WasmConfig {
        WasmConfig {
            module_dir: dir.path().to_path_buf(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn picks_the_module_for_the_threading_mode() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("barretenberg.wasm"), b"\0asm\x01single").unwrap();
        std::fs::write(dir.path().join("barretenberg-threads.wasm"), b"\0asm\x01threads").unwrap();
        let config = config_in(&dir);

        let single = fetch_code(&config, false).await.unwrap();
        assert!(single.ends_with(b"single"));
        let threads = fetch_code(&config, true).await.unwrap();
        assert!(threads.ends_with(b"threads"));
    }

    #[tokio::test]
    async fn missing_module_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = fetch_code(&config_in(&dir), true).await.unwrap_err();
        assert!(matches!(err, FetchError::Read { .. }));
    }

    #[tokio::test]
    async fn non_wasm_files_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("barretenberg.wasm"), b"#!/bin/sh").unwrap();
        let err = fetch_code(&config_in(&dir), false).await.unwrap_err();
        assert!(matches!(err, FetchError::NotWasm(_)));
    }
}
