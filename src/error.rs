use thiserror::Error;

/// Reasons a path pattern can be rejected at registration time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidPatternError {
	#[error("route path is empty")]
	Empty,

	#[error("route path {0:?} must start with '/'")]
	MissingLeadingSlash(String),

	#[error("route path {0:?} contains a parameter without a name")]
	UnnamedParameter(String),

	/// A wildcard may only appear as the last segment.
	#[error("route path {0:?} has a wildcard before its final segment")]
	MisplacedWildcard(String),

	#[error("route path {path:?} binds parameter {name:?} more than once")]
	DuplicateParameter { path: String, name: String },
}
