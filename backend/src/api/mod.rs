mod schema;
mod sql;

use bytes::Bytes;
use http_body_util::{BodyExt, Full, Limited};
use hyper::body::Body;
use hyper::header::{self, HeaderValue, CONTENT_TYPE};
use hyper::{Method, Request, Response, StatusCode};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

use crate::context::ServiceContext;
use crate::error::ApiError;
use crate::page;

const SECURE_MAX_SIZE: usize = 64 * 1024;

pub type ResponseBody = Full<Bytes>;

/// Routes one request and always produces a response. Handler errors become
/// JSON `{"error": …}` bodies with a matching status, and every response
/// carries the open CORS policy.
pub async fn route<B>(ctx: &Arc<ServiceContext>, req: Request<B>) -> Response<ResponseBody>
where
    B: Body,
    B::Error: std::error::Error + Send + Sync + 'static,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let rsp = dispatch(ctx, req).await.unwrap_or_else(|e| {
        log::warn!("{} {} failed: {}", method, path, e);
        error_response(e)
    });
    with_cors(rsp)
}

async fn dispatch<B>(
    ctx: &Arc<ServiceContext>,
    req: Request<B>,
) -> Result<Response<ResponseBody>, ApiError>
where
    B: Body,
    B::Error: std::error::Error + Send + Sync + 'static,
{
    let (parts, body) = req.into_parts();
    let path = parts.uri.path().to_string();
    let path_segments: Vec<&str> = path.split('/').skip(1).collect();

    match (&parts.method, path_segments.as_slice()) {
        (&Method::OPTIONS, _) => Ok(preflight()),
        (&Method::POST, ["nl-to-sql"]) => {
            let data = read_body(body).await?;
            sql::nl_to_sql(ctx, &data).await
        }
        (&Method::POST, ["update-schema"]) => {
            let data = read_body(body).await?;
            schema::update_schema(ctx, &data)
        }
        (&Method::GET, ["get-schema"]) => schema::get_schema(ctx),
        (&Method::GET, [""]) => Ok(page::index(ctx).await),
        _ => Ok(not_found()),
    }
}

async fn read_body<B>(body: B) -> Result<Bytes, ApiError>
where
    B: Body,
    B::Error: std::error::Error + Send + Sync + 'static,
{
    Limited::new(body, SECURE_MAX_SIZE)
        .collect()
        .await
        .map(|collected| collected.to_bytes())
        .map_err(|e| ApiError::Body(e.to_string()))
}

pub(crate) fn json_response<T: Serialize>(
    status: StatusCode,
    value: &T,
) -> Result<Response<ResponseBody>, ApiError> {
    let data = serde_json::to_vec(value)?;
    Ok(Response::builder()
        .status(status)
        .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
        .body(Full::new(Bytes::from(data)))
        .unwrap())
}

fn error_response(e: ApiError) -> Response<ResponseBody> {
    let body = serde_json::to_vec(&json!({ "error": e.to_string() })).unwrap_or_default();
    Response::builder()
        .status(e.status())
        .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
        .body(Full::new(Bytes::from(body)))
        .unwrap()
}

fn not_found() -> Response<ResponseBody> {
    let body = serde_json::to_vec(&json!({ "error": "not found" })).unwrap_or_default();
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
        .body(Full::new(Bytes::from(body)))
        .unwrap()
}

fn preflight() -> Response<ResponseBody> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .body(Full::new(Bytes::new()))
        .unwrap()
}

fn with_cors(mut rsp: Response<ResponseBody>) -> Response<ResponseBody> {
    let headers = rsp.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
    rsp
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlgen_core::error::ProviderError;
    use sqlgen_core::gateway::CompletionGateway;
    use sqlgen_core::prompt::UNANSWERABLE;
    use sqlgen_core::provider::Provider;

    struct StaticProvider {
        name: &'static str,
        reply: Option<&'static str>,
    }

    #[async_trait::async_trait]
    impl Provider for StaticProvider {
        fn type_name(&self) -> &'static str {
            self.name
        }

        async fn generate(&self, _prompt: &str) -> Result<String, ProviderError> {
            match self.reply {
                Some(text) => Ok(text.to_string()),
                None => Err(ProviderError::EmptyCompletion),
            }
        }
    }

    fn test_ctx(providers: Vec<Box<dyn Provider>>) -> Arc<ServiceContext> {
        Arc::new(ServiceContext::new(CompletionGateway::new(providers), None))
    }

    fn request(method: Method, uri: &str, body: &str) -> Request<Full<Bytes>> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Full::new(Bytes::from(body.to_string())))
            .unwrap()
    }

    async fn body_json(rsp: Response<ResponseBody>) -> serde_json::Value {
        let data = rsp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&data).unwrap()
    }

    #[tokio::test]
    async fn test_update_then_get_returns_submitted_schema() {
        let ctx = test_ctx(vec![]);
        let submitted = serde_json::json!({
            "schema": [
                { "table": "b", "columns": ["z", "a"] },
                { "table": "a", "columns": ["x"] }
            ]
        });

        let rsp = route(
            &ctx,
            request(Method::POST, "/update-schema", &submitted.to_string()),
        )
        .await;
        assert_eq!(rsp.status(), StatusCode::OK);
        let body = body_json(rsp).await;
        assert_eq!(body["message"], "Schema updated successfully");
        assert_eq!(body["schema"], submitted["schema"]);

        let rsp = route(&ctx, request(Method::GET, "/get-schema", "")).await;
        assert_eq!(rsp.status(), StatusCode::OK);
        assert_eq!(body_json(rsp).await["schema"], submitted["schema"]);
    }

    #[tokio::test]
    async fn test_sentinel_returned_verbatim_under_sql_key() {
        let ctx = test_ctx(vec![Box::new(StaticProvider {
            name: "primary",
            reply: Some(UNANSWERABLE),
        })]);

        let rsp = route(
            &ctx,
            request(Method::POST, "/nl-to-sql", r#"{"text":"impossible"}"#),
        )
        .await;
        assert_eq!(rsp.status(), StatusCode::OK);
        assert_eq!(body_json(rsp).await["sql"], UNANSWERABLE);
    }

    #[tokio::test]
    async fn test_all_providers_failing_is_server_error() {
        let ctx = test_ctx(vec![
            Box::new(StaticProvider {
                name: "primary",
                reply: None,
            }),
            Box::new(StaticProvider {
                name: "secondary",
                reply: None,
            }),
        ]);

        let rsp = route(
            &ctx,
            request(Method::POST, "/nl-to-sql", r#"{"text":"list users"}"#),
        )
        .await;
        assert_eq!(rsp.status(), StatusCode::BAD_GATEWAY);
        assert!(body_json(rsp).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let ctx = test_ctx(vec![]);
        let rsp = route(&ctx, request(Method::POST, "/nl-to-sql", "not json")).await;
        assert_eq!(rsp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found_with_cors() {
        let ctx = test_ctx(vec![]);
        let rsp = route(&ctx, request(Method::GET, "/nope", "")).await;
        assert_eq!(rsp.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            rsp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            HeaderValue::from_static("*")
        );
        assert_eq!(
            rsp.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS],
            HeaderValue::from_static("true")
        );
    }

    #[tokio::test]
    async fn test_preflight_is_no_content() {
        let ctx = test_ctx(vec![]);
        let rsp = route(&ctx, request(Method::OPTIONS, "/nl-to-sql", "")).await;
        assert_eq!(rsp.status(), StatusCode::NO_CONTENT);
        assert_eq!(
            rsp.headers()[header::ACCESS_CONTROL_ALLOW_METHODS],
            HeaderValue::from_static("*")
        );
    }

    #[tokio::test]
    async fn test_root_serves_fallback_page_as_404() {
        let ctx = test_ctx(vec![]);
        let rsp = route(&ctx, request(Method::GET, "/", "")).await;
        assert_eq!(rsp.status(), StatusCode::NOT_FOUND);
        let data = rsp.into_body().collect().await.unwrap().to_bytes();
        let html = String::from_utf8(data.to_vec()).unwrap();
        assert!(html.contains("/nl-to-sql"));
        assert!(html.contains("/update-schema"));
        assert!(html.contains("/get-schema"));
    }
}
