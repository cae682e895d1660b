use bytes::Bytes;
use http_body_util::Full;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Response, StatusCode};
use std::sync::Arc;

use crate::api::ResponseBody;
use crate::context::ServiceContext;

/// `GET /`. Serves `index.html` from the configured static directory when it
/// exists on disk, otherwise a generated page listing the API endpoints.
/// The fallback is served with status 404.
pub async fn index(ctx: &Arc<ServiceContext>) -> Response<ResponseBody> {
    if let Some(dir) = &ctx.static_dir {
        let path = dir.join("index.html");
        match tokio::fs::read(&path).await {
            Ok(data) => {
                return html_response(StatusCode::OK, Bytes::from(data));
            }
            Err(e) => {
                log::warn!("failed to read {}: {}", path.display(), e);
            }
        }
    }
    html_response(StatusCode::NOT_FOUND, Bytes::from(fallback_page()))
}

fn html_response(status: StatusCode, body: Bytes) -> Response<ResponseBody> {
    Response::builder()
        .status(status)
        .header(
            CONTENT_TYPE,
            HeaderValue::from_static("text/html; charset=utf-8"),
        )
        .body(Full::new(body))
        .unwrap()
}

fn fallback_page() -> String {
    r#"<!DOCTYPE html>
<html>
<head><title>SQL Generator API</title></head>
<body>
<h1>SQL Generator API</h1>
<p>No front-end is installed. The API is available at:</p>
<ul>
<li><code>POST /nl-to-sql</code> &mdash; {"text": "..."} &rarr; {"sql": "..."}</li>
<li><code>POST /update-schema</code> &mdash; {"schema": [{"table": "...", "columns": ["..."]}]}</li>
<li><code>GET /get-schema</code></li>
</ul>
</body>
</html>
"#
    .to_string()
}
