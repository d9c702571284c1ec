//! Host side glue for running the compiled proving backend: finding and
//! loading the module, sizing the worker pool and bootstrapping workers.
//! Spawning the workers themselves is left to the embedder.

pub mod fetch;
pub mod logging;
pub mod worker;

pub use fetch::{fetch_code, FetchError};
pub use logging::{init_logger, thread_logger, ThreadLogger};
pub use worker::{get_num_cpu, WorkerBootstrap};
