//! A small HTTP request router built on hyper.
//!
//! ```no_run
//! use bone::{hyper::Server, param, Body, Request, Response, Router};
//!
//! fn user(req: Request) -> Response {
//! 	let id = param(&req, "id").unwrap_or_default().to_owned();
//! 	Box::pin(async move { Ok(bone::hyper::Response::new(Body::from(id))) })
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! 	let addr = ([127, 0, 0, 1], 3000).into();
//! 	let router = Router::builder()
//! 		.get("/users/:id", user)?
//! 		.handle("/assets/", user)?
//! 		.build();
//!
//! 	Server::bind(&addr).serve(router).await?;
//! 	Ok(())
//! }
//! ```
//!
//! Segments starting with `:` capture exactly one non-empty path segment. A final segment
//! starting with `*` captures the rest of the path, bound to the given name or to `"*"` when
//! bare. Captured values are percent-decoded, stored on the request and read with [`param`].
//!
//! For each request the router redirects non-canonical paths (a redundant trailing slash), then
//! tries an exact match, then the method's patterns in order of path length, then static prefix
//! routes (paths registered through [`RouterBuilder::handle`] ending in `/`), and finally the
//! not-found handler.

mod error;
mod http;
mod specificity;

/// Routes, path patterns and captured parameters.
pub mod route;

/// The route table and the per-request routing decision.
///
/// Use the RouterBuilder to create a Router: pass the router to hyper as the service.
pub mod router;

pub use error::InvalidPatternError;
pub use http::*;
pub use route::*;
pub use router::*;
