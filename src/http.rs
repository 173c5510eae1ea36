use crate::{
	route::{Params, Request},
	router::{Dispatch, Router},
};
use hyper::{
	body::Body,
	header::LOCATION,
	http::response::Builder,
	service::Service,
	StatusCode,
};
use std::{
	convert::Infallible,
	future::{ready, Future, Ready},
	pin::Pin,
	task::{Context, Poll},
};
use tracing::warn;

pub use hyper;

pub use hyper::http::response::Builder as ResponseBuilder;

pub type ResponseFuture = Pin<Box<dyn Future<Output = hyper::Response<Body>> + Send>>;

/// Reads a path parameter captured for this request.
pub fn param<'r>(req: &'r Request, name: &str) -> Option<&'r str> {
	params(req)?.get(name)
}

/// All path parameters captured for this request, if it was routed.
pub fn params(req: &Request) -> Option<&Params> {
	req.extensions().get::<Params>()
}

fn redirect(req: &Request, location: String) -> hyper::Response<Body> {
	let location = match req.uri().query() {
		Some(query) => format!("{}?{}", location, query),
		None => location,
	};

	Builder::default()
		.status(StatusCode::MOVED_PERMANENTLY)
		.header(LOCATION, location)
		.body(Body::empty())
		.unwrap_or_else(|e| {
			warn!(error = %e, "invalid redirect location");
			let mut res = hyper::Response::new(Body::empty());
			*res.status_mut() = StatusCode::BAD_REQUEST;
			res
		})
}

impl Router {
	/// Routes a request and runs the selected handler, or the appropriate fallback.
	pub fn serve(&self, mut req: Request) -> ResponseFuture {
		let method = req.method().clone();
		let path = req.uri().path().to_owned();

		let handler = match self.find(&method, &path) {
			Dispatch::Redirect(location) => {
				let res = redirect(&req, location);
				return Box::pin(ready(res));
			}
			Dispatch::Matched { route, params } => {
				req.extensions_mut().insert(params);
				route.handler()
			}
			Dispatch::Static(route) => {
				req.extensions_mut().insert(Params::default());
				route.handler()
			}
			Dispatch::NotFound => {
				let res = (self.not_found)(req);
				return Box::pin(ready(res));
			}
		};

		let fut = handler(req);
		let err = self.internal_error;
		Box::pin(async move { fut.await.unwrap_or_else(err) })
	}
}

impl<T> Service<T> for Router {
	type Response = RouteHandler;
	type Error = Infallible;
	type Future = Ready<Result<Self::Response, Self::Error>>;

	fn poll_ready(&mut self, _: &mut Context) -> Poll<Result<(), Self::Error>> {
		Poll::Ready(Ok(()))
	}

	fn call(&mut self, _: T) -> Self::Future {
		ready(Ok(RouteHandler {
			router: self.clone(),
		}))
	}
}

/// Responsible for handling the actual HTTP requests from hyper.
pub struct RouteHandler {
	router: Router,
}

impl Service<Request> for RouteHandler {
	type Response = hyper::Response<Body>;
	type Error = Infallible;
	type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

	fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
		Poll::Ready(Ok(()))
	}

	fn call(&mut self, req: Request) -> Self::Future {
		let fut = self.router.serve(req);
		Box::pin(async move { Ok(fut.await) })
	}
}
