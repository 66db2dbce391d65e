//! Startup initialization: HTTP clients and logging.

mod client;
mod logger;

pub use client::{init_client, init_probe_client};
pub use logger::init_logger_with;
