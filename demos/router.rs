use bone::{
	hyper::{self, header::CONTENT_TYPE, Body, Server},
	param, Request, Response, ResponseBuilder, Router,
};
use tracing_subscriber::EnvFilter;

async fn text(body: String) -> anyhow::Result<hyper::Response<Body>> {
	Ok(ResponseBuilder::default()
		.header(CONTENT_TYPE, "text/plain")
		.body(Body::from(body))?)
}

fn index(_req: Request) -> Response {
	Box::pin(text("index".to_owned()))
}

fn user(req: Request) -> Response {
	let id = param(&req, "id").unwrap_or_default();
	Box::pin(text(format!("{} user {}", req.method(), id)))
}

fn file(req: Request) -> Response {
	let path = param(&req, "path").unwrap_or_default();
	Box::pin(text(format!("file {:?}", path)))
}

fn assets(req: Request) -> Response {
	Box::pin(text(format!("asset {}", req.uri().path())))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bone=debug")))
		.init();

	let addr = ([127, 0, 0, 1], 3000).into();

	let router = Router::builder()
		.get("/", index)?
		.get("/users/:id", user)?
		.post("/users/:id", user)?
		.get("/files/*path", file)?
		.handle("/assets/", assets)?
		.build();

	let server = Server::bind(&addr).serve(router);
	println!("Listening on http://{}", addr);

	server.await?;
	Ok(())
}
