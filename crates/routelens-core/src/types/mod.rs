//! Data model shared by every routelens component.

pub mod collections;
pub mod detection;
pub mod import_graph;
pub mod route;

pub use detection::{Confidence, FrameworkDetectionResult, RouterType};
pub use import_graph::ImportGraph;
pub use route::Route;
