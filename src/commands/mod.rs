//! Command implementations

pub mod completions;
pub mod run;
pub mod version;
