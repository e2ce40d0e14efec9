//! User interface module - terminal output.
//!
//! - `formatter` - Rendering and printing of results, warnings and errors

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{display_error, display_result, display_variable, display_warning};
