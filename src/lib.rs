pub mod analyzer;
pub mod calculator;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod label;
pub mod resolver;
pub mod strategies;
pub mod ui;
pub mod warning;

pub use calculator::{VersionCalculator, VersionResult};
pub use error::{GitVersionError, Result};
