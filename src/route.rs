use crate::error::InvalidPatternError;
use anyhow::Result;
pub use hyper::{Body, Method, StatusCode};
use std::{
	fmt::{self, Debug, Formatter},
	future::Future,
	pin::Pin,
};

pub type Request = hyper::Request<Body>;
pub type Response = Pin<Box<dyn Future<Output = Result<hyper::Response<Body>>> + Send>>;

/// A route handler. Path parameters are read from the request with [`param`](crate::param).
pub type Handler = fn(Request) -> Response;

/// Name bound by a bare `*` wildcard.
pub const WILDCARD_NAME: &str = "*";

const PARAM_MARKER: char = ':';
const WILDCARD_MARKER: char = '*';

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum PathSegment {
	Literal(String),
	Param(String),
	Wildcard(String),
}

/// Parameters captured while matching a request path, in pattern order.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Params(Vec<(String, String)>);

impl Params {
	pub fn get(&self, name: &str) -> Option<&str> {
		self.0
			.iter()
			.find(|(key, _)| key == name)
			.map(|(_, value)| value.as_str())
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	fn push(&mut self, name: &str, value: String) {
		self.0.push((name.to_owned(), value));
	}
}

/// Percent-decodes a captured value, keeping it raw when it does not decode to UTF-8.
fn decode(value: &str) -> String {
	urlencoding::decode(value)
		.map(|decoded| decoded.into_owned())
		.unwrap_or_else(|_| value.to_owned())
}

/// Splits a path into its `/`-separated segments, ignoring the leading slash.
pub(crate) fn segments(path: &str) -> impl Iterator<Item = &str> {
	path.strip_prefix('/').unwrap_or(path).split('/')
}

/// Parses a raw route path into pattern segments.
pub fn parse_pattern(path: &str) -> Result<Vec<PathSegment>, InvalidPatternError> {
	if path.is_empty() {
		return Err(InvalidPatternError::Empty);
	}
	if !path.starts_with('/') {
		return Err(InvalidPatternError::MissingLeadingSlash(path.to_owned()));
	}

	let raw: Vec<&str> = segments(path).collect();
	let mut pattern = Vec::with_capacity(raw.len());

	for (i, segment) in raw.iter().enumerate() {
		let parsed = if let Some(name) = segment.strip_prefix(PARAM_MARKER) {
			if name.is_empty() {
				return Err(InvalidPatternError::UnnamedParameter(path.to_owned()));
			}
			PathSegment::Param(name.to_owned())
		} else if let Some(name) = segment.strip_prefix(WILDCARD_MARKER) {
			if i + 1 != raw.len() {
				return Err(InvalidPatternError::MisplacedWildcard(path.to_owned()));
			}
			let name = if name.is_empty() { WILDCARD_NAME } else { name };
			PathSegment::Wildcard(name.to_owned())
		} else {
			PathSegment::Literal((*segment).to_owned())
		};

		if let PathSegment::Param(name) | PathSegment::Wildcard(name) = &parsed {
			let taken = pattern.iter().any(|seg| match seg {
				PathSegment::Param(other) | PathSegment::Wildcard(other) => other == name,
				PathSegment::Literal(_) => false,
			});
			if taken {
				return Err(InvalidPatternError::DuplicateParameter {
					path: path.to_owned(),
					name: name.clone(),
				});
			}
		}

		pattern.push(parsed);
	}

	Ok(pattern)
}

/// A registered route. The pattern is derived once from `path` and never changes.
pub struct Route {
	method: Option<Method>,
	path: String,
	pattern: Vec<PathSegment>,
	handler: Handler,
	is_static: bool,
}

impl Route {
	/// Builds a route bound to one method, or to every method when `method` is `None`.
	pub fn new(method: Option<Method>, path: &str, handler: Handler) -> Result<Self, InvalidPatternError> {
		Ok(Self {
			method,
			path: path.to_owned(),
			pattern: parse_pattern(path)?,
			handler,
			is_static: false,
		})
	}

	/// Builds a prefix route serving every method.
	pub fn new_static(path: &str, handler: Handler) -> Result<Self, InvalidPatternError> {
		let mut route = Self::new(None, path, handler)?;
		route.is_static = true;
		Ok(route)
	}

	pub fn method(&self) -> Option<&Method> {
		self.method.as_ref()
	}

	pub fn path(&self) -> &str {
		&self.path
	}

	pub fn pattern(&self) -> &[PathSegment] {
		&self.pattern
	}

	pub fn handler(&self) -> Handler {
		self.handler
	}

	pub fn is_static(&self) -> bool {
		self.is_static
	}

	/// Whether the pattern contains any parameter or wildcard segment.
	pub fn has_pattern(&self) -> bool {
		self.pattern
			.iter()
			.any(|seg| !matches!(seg, PathSegment::Literal(_)))
	}

	/// Whether `path` starts with this route's raw path.
	pub fn matches_prefix(&self, path: &str) -> bool {
		path.as_bytes().starts_with(self.path.as_bytes())
	}

	/// Matches a concrete path against the pattern segment by segment.
	pub fn matches(&self, path: &str) -> Option<Params> {
		let mut params = Params::default();
		let mut parts = segments(path);

		for segment in &self.pattern {
			match segment {
				PathSegment::Wildcard(name) => {
					let rest: Vec<&str> = parts.by_ref().collect();
					params.push(name, decode(&rest.join("/")));
					return Some(params);
				}
				PathSegment::Literal(expected) => {
					if parts.next()? != expected {
						return None;
					}
				}
				PathSegment::Param(name) => {
					let value = parts.next()?;
					if value.is_empty() {
						return None;
					}
					params.push(name, decode(value));
				}
			}
		}

		match parts.next() {
			Some(_) => None,
			None => Some(params),
		}
	}
}

impl Debug for Route {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Route")
			.field("method", &self.method)
			.field("path", &self.path)
			.field("pattern", &self.pattern)
			.field("is_static", &self.is_static)
			.finish()
	}
}

#[cfg(test)]
mod test {
	use super::{parse_pattern, PathSegment, Request, Response, Route, WILDCARD_NAME};
	use crate::error::InvalidPatternError;
	use hyper::{Body, Method};

	fn test_route(_req: Request) -> Response {
		Box::pin(async { Ok(hyper::Response::new(Body::empty())) })
	}

	fn route(path: &str) -> Route {
		Route::new(Some(Method::GET), path, test_route).unwrap()
	}

	#[test]
	fn parses_segments() {
		assert_eq!(
			parse_pattern("/users/:id/files/*rest").unwrap(),
			vec![
				PathSegment::Literal("users".into()),
				PathSegment::Param("id".into()),
				PathSegment::Literal("files".into()),
				PathSegment::Wildcard("rest".into()),
			]
		);
		assert_eq!(
			parse_pattern("/static/*").unwrap().last(),
			Some(&PathSegment::Wildcard(WILDCARD_NAME.into()))
		);
		assert_eq!(parse_pattern("/").unwrap(), vec![PathSegment::Literal("".into())]);
	}

	#[test]
	fn rejects_malformed_patterns() {
		assert_eq!(parse_pattern(""), Err(InvalidPatternError::Empty));
		assert_eq!(
			parse_pattern("users"),
			Err(InvalidPatternError::MissingLeadingSlash("users".into()))
		);
		assert_eq!(
			parse_pattern("/users/:"),
			Err(InvalidPatternError::UnnamedParameter("/users/:".into()))
		);
		assert_eq!(
			parse_pattern("/files/*rest/more"),
			Err(InvalidPatternError::MisplacedWildcard("/files/*rest/more".into()))
		);
		assert_eq!(
			parse_pattern("/:id/:id"),
			Err(InvalidPatternError::DuplicateParameter {
				path: "/:id/:id".into(),
				name: "id".into(),
			})
		);
	}

	#[test]
	fn matches_params() {
		let r = route("/users/:id");
		assert!(r.has_pattern());

		let params = r.matches("/users/42").unwrap();
		assert_eq!(params.get("id"), Some("42"));
		assert_eq!(params.len(), 1);

		assert_eq!(r.matches("/users/"), None);
		assert_eq!(r.matches("/users"), None);
		assert_eq!(r.matches("/users/42/posts"), None);
		assert_eq!(r.matches("/people/42"), None);
	}

	#[test]
	fn decodes_captured_values() {
		let r = route("/users/:id/*rest");
		let params = r.matches("/users/a%20b/c%2Fd/e").unwrap();
		assert_eq!(params.get("id"), Some("a b"));
		assert_eq!(params.get("rest"), Some("c/d/e"));

		assert_eq!(r.matches("/users/%FF/x").unwrap().get("id"), Some("%FF"));
	}

	#[test]
	fn keeps_method_and_pattern() {
		let r = route("/users/:id");
		assert_eq!(r.method(), Some(&Method::GET));
		assert_eq!(
			r.pattern(),
			&[PathSegment::Literal("users".into()), PathSegment::Param("id".into())][..]
		);
		assert!(!r.is_static());

		let any = Route::new(None, "/health", test_route).unwrap();
		assert_eq!(any.method(), None);
	}

	#[test]
	fn matches_wildcards() {
		let r = route("/files/*rest");
		assert_eq!(r.matches("/files/a/b/c").unwrap().get("rest"), Some("a/b/c"));
		assert_eq!(r.matches("/files/").unwrap().get("rest"), Some(""));
		assert_eq!(r.matches("/files").unwrap().get("rest"), Some(""));
		assert_eq!(r.matches("/other/a"), None);

		let bare = route("/assets/*");
		assert_eq!(bare.matches("/assets/x.css").unwrap().get(WILDCARD_NAME), Some("x.css"));
	}

	#[test]
	fn matching_is_repeatable() {
		let r = route("/a/:b/*c");
		let first = r.matches("/a/1/2/3");
		assert_eq!(first, r.matches("/a/1/2/3"));
		assert_eq!(
			first.unwrap().iter().collect::<Vec<_>>(),
			vec![("b", "1"), ("c", "2/3")]
		);
	}

	#[test]
	fn literal_routes_have_no_pattern() {
		let r = route("/about");
		assert!(!r.has_pattern());
		assert!(r.matches("/about").unwrap().is_empty());
	}

	#[test]
	fn matches_prefixes() {
		let r = Route::new_static("/assets/", test_route).unwrap();
		assert!(r.is_static());
		assert!(r.matches_prefix("/assets/app.js"));
		assert!(r.matches_prefix("/assets/"));
		assert!(!r.matches_prefix("/assets"));
		assert!(!r.matches_prefix("/other/app.js"));
	}
}
