//! Orderings that decide which route is tried first.
//!
//! Method routes are ordered by the length of their raw path, shortest first, with ties kept in
//! registration order. Static routes are ordered longest prefix first so the most precise prefix
//! wins.

use crate::route::Route;
use std::sync::Arc;

/// Inserts `route` after every route whose path is no longer than its own.
///
/// Equivalent to appending and then stable-sorting by path length.
pub fn insert_by_length(routes: &mut Vec<Arc<Route>>, route: Arc<Route>) {
	let len = route.path().len();
	let at = routes.partition_point(|r| r.path().len() <= len);
	routes.insert(at, route);
}

/// Inserts a static route longest-prefix-first, replacing any route with the same prefix.
pub fn insert_by_prefix(routes: &mut Vec<Arc<Route>>, route: Arc<Route>) {
	if let Some(existing) = routes.iter_mut().find(|r| r.path() == route.path()) {
		*existing = route;
		return;
	}

	let len = route.path().len();
	let at = routes.partition_point(|r| r.path().len() >= len);
	routes.insert(at, route);
}

#[cfg(test)]
mod test {
	use super::{insert_by_length, insert_by_prefix};
	use crate::route::{Request, Response, Route};
	use hyper::{Body, Method};
	use std::sync::Arc;

	fn first(_req: Request) -> Response {
		Box::pin(async { Ok(hyper::Response::new(Body::from("first"))) })
	}

	fn second(_req: Request) -> Response {
		Box::pin(async { Ok(hyper::Response::new(Body::from("second"))) })
	}

	fn paths(routes: &[Arc<Route>]) -> Vec<&str> {
		routes.iter().map(|r| r.path()).collect()
	}

	fn dynamic(path: &str) -> Arc<Route> {
		Arc::new(Route::new(Some(Method::GET), path, first).unwrap())
	}

	#[test]
	fn shorter_paths_sort_first() {
		let mut routes = vec![];
		insert_by_length(&mut routes, dynamic("/a/b"));
		insert_by_length(&mut routes, dynamic("/a"));
		assert_eq!(paths(&routes), vec!["/a", "/a/b"]);

		let mut routes = vec![];
		insert_by_length(&mut routes, dynamic("/a"));
		insert_by_length(&mut routes, dynamic("/a/b"));
		assert_eq!(paths(&routes), vec!["/a", "/a/b"]);
	}

	#[test]
	fn ties_keep_registration_order() {
		let mut routes = vec![];
		insert_by_length(&mut routes, dynamic("/users/:id"));
		insert_by_length(&mut routes, dynamic("/x"));
		insert_by_length(&mut routes, dynamic("/users/new"));
		insert_by_length(&mut routes, dynamic("/y"));
		assert_eq!(paths(&routes), vec!["/x", "/y", "/users/:id", "/users/new"]);
	}

	#[test]
	fn static_prefixes_sort_longest_first() {
		let mut routes = vec![];
		insert_by_prefix(&mut routes, Arc::new(Route::new_static("/assets/", first).unwrap()));
		insert_by_prefix(&mut routes, Arc::new(Route::new_static("/assets/img/", first).unwrap()));
		insert_by_prefix(&mut routes, Arc::new(Route::new_static("/pub/", first).unwrap()));
		assert_eq!(paths(&routes), vec!["/assets/img/", "/assets/", "/pub/"]);
	}

	#[test]
	fn static_prefixes_replace_duplicates() {
		let mut routes = vec![];
		insert_by_prefix(&mut routes, Arc::new(Route::new_static("/assets/", first).unwrap()));
		insert_by_prefix(&mut routes, Arc::new(Route::new_static("/assets/", second).unwrap()));
		assert_eq!(routes.len(), 1);
		assert!(routes[0].handler() as usize == second as usize);
	}
}
