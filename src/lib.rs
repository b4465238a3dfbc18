pub mod advisor;
pub mod args;
pub mod backup;
pub mod commands;
mod config;
pub mod engine;
mod error;
mod fs;
pub mod household;
pub mod model;
pub mod storage;
mod utils;

#[cfg(test)]
mod test;

pub use config::{AdvisorSettings, Config};
pub use error::{error_type, Error, ErrorType, Result};
