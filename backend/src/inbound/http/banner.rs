//! Root banner endpoint.

use actix_web::{get, HttpResponse};
use serde_json::json;

/// Service banner at the API root.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service banner")),
    tags = ["meta"],
    operation_id = "banner"
)]
#[get("/")]
pub async fn banner() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "message": "API de Contactos" }))
}
