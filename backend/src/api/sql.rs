use hyper::{Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use sqlgen_core::prompt;

use super::{json_response, ResponseBody};
use crate::context::ServiceContext;
use crate::error::ApiError;

#[derive(Deserialize)]
struct QueryRequest {
    text: String,
}

#[derive(Serialize)]
struct QueryResponse {
    sql: String,
}

/// `POST /nl-to-sql`. The `sql` value is whatever the gateway returned,
/// including the unanswerable sentinel, never rewrapped.
pub async fn nl_to_sql(
    ctx: &Arc<ServiceContext>,
    data: &[u8],
) -> Result<Response<ResponseBody>, ApiError> {
    let req: QueryRequest = serde_json::from_slice(data)?;
    let prompt = prompt::build_prompt(&ctx.schema.render(), &req.text);
    let sql = ctx.gateway.generate(&prompt).await?;
    json_response(StatusCode::OK, &QueryResponse { sql })
}
