//! Core domain models
//!
//! This module defines the workflow records the pipeline operates on,
//! repository references and the tool configuration.

pub mod config;
pub mod repo;
pub mod workflow;

pub use config::{ActionlintConfig, AppConfig};
pub use repo::RepoRef;
pub use workflow::*;
