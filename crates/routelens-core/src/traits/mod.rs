//! Capability traits implemented across the workspace.

pub mod file_source;

pub use file_source::FileSource;
