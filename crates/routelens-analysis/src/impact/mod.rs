//! Change-impact mapping: changed files → affected routes with evidence.

pub mod mapper;
pub mod types;

pub use mapper::ChangeImpactMapper;
pub use types::{AffectedRoute, Evidence, ImpactMap, ImpactReason};
