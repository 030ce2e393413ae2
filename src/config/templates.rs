//! Page templates, compiled into the binary

use multiform_core::Result;
use multiform_http::Response;
use tera::{Context, Tera};

const MULTI_HTML: &str = include_str!("../../templates/users/multi.html");

/// Load every template of the project
pub fn templates() -> Result<Tera> {
	let mut tera = Tera::default();
	tera.add_raw_template("users/multi.html", MULTI_HTML)?;
	tera.autoescape_on(vec![".html"]);
	Ok(tera)
}

/// Render `name` into a `200 OK` HTML response
pub fn render(tera: &Tera, name: &str, context: &Context) -> Result<Response> {
	let html = tera.render(name, context)?;
	Ok(Response::ok().with_html(html))
}
