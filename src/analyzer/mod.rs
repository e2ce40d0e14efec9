//! Increment decisions from commit messages

pub mod version_analyzer;

pub use version_analyzer::VersionAnalyzer;
