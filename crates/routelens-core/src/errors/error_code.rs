//! Stable error codes shared by all routelens error enums.

pub const PATH_TRAVERSAL: &str = "PATH_TRAVERSAL";
pub const PATH_ABSOLUTE: &str = "PATH_ABSOLUTE";
pub const SOURCE_NOT_FOUND: &str = "SOURCE_NOT_FOUND";
pub const SOURCE_IO: &str = "SOURCE_IO";
pub const SOURCE_HTTP: &str = "SOURCE_HTTP";
pub const SOURCE_DECODE: &str = "SOURCE_DECODE";
pub const FRAMEWORK_NOT_FOUND: &str = "FRAMEWORK_NOT_FOUND";
pub const DETECTION_FAILED: &str = "DETECTION_FAILED";

/// Maps an error value to a stable, upper-snake error code.
pub trait RouteLensErrorCode {
    fn error_code(&self) -> &'static str;
}
