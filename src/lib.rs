pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::server::ServerConfig;

pub use crate::config::DispatchConfig;
pub use crate::core::{dispatcher::Dispatcher, http::ReqwestFetcher, runner::BatchRunner};
pub use crate::server::TargetServer;
pub use crate::utils::error::{CurlError, Result};
