//! Fast hash collections keyed by project-relative paths.

pub use rustc_hash::{FxHashMap, FxHashSet};
