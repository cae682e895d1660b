use hyper::{Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use sqlgen_core::schema::TableDef;

use super::{json_response, ResponseBody};
use crate::context::ServiceContext;
use crate::error::ApiError;

#[derive(Deserialize)]
struct SchemaUpdateRequest {
    schema: Vec<TableDef>,
}

#[derive(Serialize)]
struct SchemaUpdateResponse {
    message: &'static str,
    schema: Vec<TableDef>,
}

#[derive(Serialize)]
struct SchemaResponse {
    schema: Vec<TableDef>,
}

/// `POST /update-schema`. Wholesale replacement, submitted value echoed back.
pub fn update_schema(
    ctx: &Arc<ServiceContext>,
    data: &[u8],
) -> Result<Response<ResponseBody>, ApiError> {
    let req: SchemaUpdateRequest = serde_json::from_slice(data)?;
    let schema = ctx.schema.replace(req.schema);
    json_response(
        StatusCode::OK,
        &SchemaUpdateResponse {
            message: "Schema updated successfully",
            schema,
        },
    )
}

/// `GET /get-schema`.
pub fn get_schema(ctx: &Arc<ServiceContext>) -> Result<Response<ResponseBody>, ApiError> {
    json_response(
        StatusCode::OK,
        &SchemaResponse {
            schema: ctx.schema.get(),
        },
    )
}
