use crate::{
	error::InvalidPatternError,
	route::{Handler, Params, Route},
	specificity::{insert_by_length, insert_by_prefix},
};
use anyhow::Error;
use hyper::{body::Body, http::response::Builder, Method, Request, Response};
use std::{collections::HashMap, sync::Arc};
use tracing::{debug, trace};

/// Methods a route registered without an explicit method is bound to.
pub const METHODS: [Method; 7] = [
	Method::GET,
	Method::POST,
	Method::PUT,
	Method::DELETE,
	Method::HEAD,
	Method::PATCH,
	Method::OPTIONS,
];

pub(crate) struct RouteTable {
	pub(crate) by_method: HashMap<Method, Vec<Arc<Route>>>,
	pub(crate) statics: Vec<Arc<Route>>,
}

pub type InternalErrorHandler = fn(e: Error) -> Response<Body>;
fn default_error_handler(e: Error) -> Response<Body> {
	let mut res = Response::new(Body::from(e.to_string()));
	*res.status_mut() = hyper::StatusCode::INTERNAL_SERVER_ERROR;
	res
}

pub type NotFoundHandler = fn(req: Request<Body>) -> Response<Body>;
fn default_not_found_handler(_req: Request<Body>) -> Response<Body> {
	Builder::default()
		.status(hyper::StatusCode::NOT_FOUND)
		.body(Body::empty())
		.unwrap_or_default()
}

/// Paths ending in `/` (other than the root) are served by prefix.
fn is_static_path(path: &str) -> bool {
	path.len() > 1 && path.ends_with('/')
}

/// Collects routes during setup. Call [`build`](RouterBuilder::build) to get a servable [`Router`].
pub struct RouterBuilder {
	routes: HashMap<Method, Vec<Arc<Route>>>,
	statics: Vec<Arc<Route>>,
	internal_error_handler: Option<InternalErrorHandler>,
	not_found_handler: Option<NotFoundHandler>,
	redirect_trailing_slash: bool,
}

impl Default for RouterBuilder {
	fn default() -> Self {
		Self {
			routes: HashMap::default(),
			statics: Vec::default(),
			internal_error_handler: None,
			not_found_handler: None,
			redirect_trailing_slash: true,
		}
	}
}

impl RouterBuilder {
	/// Registers `handler` for every supported method.
	///
	/// A path ending in `/` becomes a static prefix route matched after all method routes.
	pub fn handle(&mut self, path: &str, handler: Handler) -> Result<&mut Self, InvalidPatternError> {
		if is_static_path(path) {
			let route = Arc::new(Route::new_static(path, handler)?);
			trace!(path, "registered static route");
			insert_by_prefix(&mut self.statics, route);
			return Ok(self);
		}

		let route = Arc::new(Route::new(None, path, handler)?);
		for method in METHODS.iter() {
			insert_by_length(self.routes.entry(method.clone()).or_default(), Arc::clone(&route));
		}
		trace!(path, "registered route for all methods");
		Ok(self)
	}

	pub fn register(
		&mut self,
		method: Method,
		path: &str,
		handler: Handler,
	) -> Result<&mut Self, InvalidPatternError> {
		let route = Arc::new(Route::new(Some(method.clone()), path, handler)?);
		trace!(%method, path, "registered route");
		insert_by_length(self.routes.entry(method).or_default(), route);
		Ok(self)
	}

	pub fn get(&mut self, path: &str, handler: Handler) -> Result<&mut Self, InvalidPatternError> {
		self.register(Method::GET, path, handler)
	}

	pub fn post(&mut self, path: &str, handler: Handler) -> Result<&mut Self, InvalidPatternError> {
		self.register(Method::POST, path, handler)
	}

	pub fn put(&mut self, path: &str, handler: Handler) -> Result<&mut Self, InvalidPatternError> {
		self.register(Method::PUT, path, handler)
	}

	pub fn delete(&mut self, path: &str, handler: Handler) -> Result<&mut Self, InvalidPatternError> {
		self.register(Method::DELETE, path, handler)
	}

	pub fn head(&mut self, path: &str, handler: Handler) -> Result<&mut Self, InvalidPatternError> {
		self.register(Method::HEAD, path, handler)
	}

	pub fn patch(&mut self, path: &str, handler: Handler) -> Result<&mut Self, InvalidPatternError> {
		self.register(Method::PATCH, path, handler)
	}

	pub fn options(&mut self, path: &str, handler: Handler) -> Result<&mut Self, InvalidPatternError> {
		self.register(Method::OPTIONS, path, handler)
	}

	/// Replaces the handler used when nothing matches.
	pub fn not_found(&mut self, handler: NotFoundHandler) -> &mut Self {
		self.not_found_handler = Some(handler);
		self
	}

	pub fn internal_error(&mut self, handler: InternalErrorHandler) -> &mut Self {
		self.internal_error_handler = Some(handler);
		self
	}

	pub fn redirect_trailing_slash(&mut self, enabled: bool) -> &mut Self {
		self.redirect_trailing_slash = enabled;
		self
	}

	pub fn build(&mut self) -> Router {
		let table = RouteTable {
			by_method: std::mem::take(&mut self.routes),
			statics: std::mem::take(&mut self.statics),
		};

		Router {
			table: Arc::new(table),
			internal_error: self.internal_error_handler.unwrap_or(default_error_handler),
			not_found: self.not_found_handler.unwrap_or(default_not_found_handler),
			redirect_trailing_slash: self.redirect_trailing_slash,
		}
	}
}

/// The outcome of routing one request.
#[derive(Debug)]
pub enum Dispatch<'a> {
	/// The path is not canonical; redirect permanently to this path.
	Redirect(String),
	Matched { route: &'a Route, params: Params },
	Static(&'a Route),
	NotFound,
}

/// A frozen route table. Cloning is cheap and every clone shares the same routes.
#[derive(Clone)]
pub struct Router {
	pub(crate) table: Arc<RouteTable>,
	pub(crate) internal_error: InternalErrorHandler,
	pub(crate) not_found: NotFoundHandler,
	pub(crate) redirect_trailing_slash: bool,
}

impl Router {
	pub fn builder() -> RouterBuilder {
		RouterBuilder::default()
	}

	/// Routes registered for `method`, most specific first.
	pub fn routes(&self, method: &Method) -> &[Arc<Route>] {
		self.table
			.by_method
			.get(method)
			.map(Vec::as_slice)
			.unwrap_or_default()
	}

	pub fn static_routes(&self) -> &[Arc<Route>] {
		&self.table.statics
	}

	/// Decides how a request for `method` and `path` is handled without invoking anything.
	pub fn find(&self, method: &Method, path: &str) -> Dispatch<'_> {
		let routes = self.routes(method);

		let registered = routes.iter().chain(self.table.statics.iter()).any(|r| r.path() == path);
		if self.redirect_trailing_slash && is_static_path(path) && !registered {
			let canonical = path.trim_end_matches('/');
			let canonical = if canonical.is_empty() { "/" } else { canonical };
			debug!(%method, path, location = canonical, "redirecting to canonical path");
			return Dispatch::Redirect(canonical.to_owned());
		}

		if let Some(route) = routes.iter().find(|r| r.path() == path) {
			debug!(%method, path, route = route.path(), "exact route match");
			return Dispatch::Matched {
				route,
				params: Params::default(),
			};
		}

		for route in routes.iter().filter(|r| r.has_pattern()) {
			if let Some(params) = route.matches(path) {
				debug!(%method, path, route = route.path(), params = params.len(), "pattern route match");
				return Dispatch::Matched { route, params };
			}
		}

		if let Some(route) = self.table.statics.iter().find(|r| r.matches_prefix(path)) {
			debug!(%method, path, prefix = route.path(), "static route match");
			return Dispatch::Static(route);
		}

		debug!(%method, path, "no route matched");
		Dispatch::NotFound
	}
}
