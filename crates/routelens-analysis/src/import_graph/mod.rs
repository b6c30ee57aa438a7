//! Static-import graph over the project's source files.

pub mod builder;
pub mod extract;
pub mod resolver;

pub use builder::ImportGraphBuilder;
pub use extract::import_specifiers;
pub use resolver::ImportResolver;
