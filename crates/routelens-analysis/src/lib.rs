//! # routelens-analysis
//!
//! Change-impact engine for file-based web routers.
//! Contains the framework adapters and their registry/detector, the
//! static-import graph builder, the change-impact mapper, the login-page
//! locator and the end-to-end pipeline.

#![allow(clippy::module_inception)]

pub mod frameworks;
pub mod impact;
pub mod import_graph;
pub mod login;
pub mod pipeline;

pub use frameworks::{Adapter, AdapterContext, FrameworkAdapter, FrameworkDetector, FrameworkRegistry};
pub use impact::{ChangeImpactMapper, ImpactMap, ImpactReason};
pub use import_graph::ImportGraphBuilder;
pub use pipeline::{ImpactPipeline, ImpactReport};
