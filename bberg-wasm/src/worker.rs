use std::{num::NonZeroUsize, thread};

use bberg_config::{BbergConfiguration, WasmConfig};
use bberg_serialize::ser::{self, DeserializerError, SerializerError};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::logging::{thread_logger, ThreadLogger};

/// Number of worker threads to run: the configured override, or whatever the
/// host reports. Never zero.
pub fn get_num_cpu(config: &WasmConfig) -> usize {
    config
        .threads
        .unwrap_or_else(|| {
            thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1)
        })
        .max(1)
}

/// First message posted to a freshly started worker.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct WorkerBootstrap {
    pub threads: usize,
    pub logger: ThreadLogger,
}

impl WorkerBootstrap {
    pub fn new(config: &BbergConfiguration) -> Self {
        Self {
            threads: get_num_cpu(&config.wasm),
            logger: thread_logger(&config.logging),
        }
    }

    /// Bootstrap for the `index`th worker, logging under its own target.
    pub fn for_worker(&self, index: usize) -> Self {
        Self {
            threads: self.threads,
            logger: self.logger.for_worker(index),
        }
    }

    pub fn to_message(&self) -> Result<Bytes, SerializerError> {
        ser::to_bytes(self)
    }

    pub fn from_message(message: &[u8]) -> Result<Self, DeserializerError> {
        ser::from_bytes(message)
    }
}
