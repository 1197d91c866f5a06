//! End-to-end tests for the usuario endpoints against the in-memory store.

use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, App};
use serde_json::{json, Value};

use contactos_backend::server;
use contactos_backend::{HttpState, Sanitize};

const TEST_BCRYPT_COST: u32 = 4;

async fn spawn_app() -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>
{
    test::init_service(
        App::new()
            .wrap(Sanitize)
            .configure(server::configure(HttpState::in_memory(TEST_BCRYPT_COST))),
    )
    .await
}

async fn post_json<S>(app: &S, path: &str, body: Value) -> ServiceResponse
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = test::TestRequest::post()
        .uri(path)
        .set_json(body)
        .to_request();
    test::call_service(app, req).await
}

fn usuario_valido() -> Value {
    json!({
        "nombre": "Ana",
        "apellido": "García",
        "email": "ana@example.com",
        "password": "secreta123"
    })
}

#[actix_rt::test]
async fn crear_usuario_returns_profile_without_password() {
    let app = spawn_app().await;

    let res = post_json(&app, "/api/usuarios/crearUsuario", usuario_valido()).await;
    assert_eq!(res.status(), 201);

    let body: Value = test::read_body_json(res).await;
    assert!(!body["id"].as_str().unwrap_or_default().is_empty());
    assert_eq!(body["nombre"], "Ana");
    assert_eq!(body["apellido"], "García");
    assert_eq!(body["email"], "ana@example.com");
    assert!(body.get("password").is_none());
}

#[actix_rt::test]
async fn crear_usuario_normalizes_email_case() {
    let app = spawn_app().await;

    let mut payload = usuario_valido();
    payload["email"] = json!("  Ana@Example.COM ");
    let res = post_json(&app, "/api/usuarios/crearUsuario", payload).await;
    assert_eq!(res.status(), 201);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["email"], "ana@example.com");
}

#[actix_rt::test]
async fn crear_usuario_rejects_duplicate_email() {
    let app = spawn_app().await;

    let first = post_json(&app, "/api/usuarios/crearUsuario", usuario_valido()).await;
    assert_eq!(first.status(), 201);

    let second = post_json(&app, "/api/usuarios/crearUsuario", usuario_valido()).await;
    assert_eq!(second.status(), 409);
    let body: Value = test::read_body_json(second).await;
    assert_eq!(body["message"], "El email ya está registrado");
}

#[actix_rt::test]
async fn crear_usuario_collects_every_field_error() {
    let app = spawn_app().await;

    let res = post_json(
        &app,
        "/api/usuarios/crearUsuario",
        json!({ "email": "no-es-email", "password": "corta" }),
    )
    .await;
    assert_eq!(res.status(), 400);

    let body: Value = test::read_body_json(res).await;
    let errors = body["errors"].as_array().expect("errors array");
    let fields: Vec<&str> = errors
        .iter()
        .filter_map(|e| e["field"].as_str())
        .collect();
    assert!(fields.contains(&"nombre"));
    assert!(fields.contains(&"apellido"));
    assert!(fields.contains(&"email"));
    assert!(fields.contains(&"password"));
}

#[actix_rt::test]
async fn malformed_json_body_gets_spanish_message() {
    let app = spawn_app().await;

    let req = test::TestRequest::post()
        .uri("/api/usuarios/crearUsuario")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), 400);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "JSON inválido");
}

#[actix_rt::test]
async fn login_returns_profile_for_valid_credentials() {
    let app = spawn_app().await;
    post_json(&app, "/api/usuarios/crearUsuario", usuario_valido()).await;

    let res = post_json(
        &app,
        "/api/usuarios/login",
        json!({ "email": "ana@example.com", "password": "secreta123" }),
    )
    .await;
    assert_eq!(res.status(), 200);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["email"], "ana@example.com");
    assert!(body.get("password").is_none());
}

#[actix_rt::test]
async fn login_failures_are_indistinguishable() {
    let app = spawn_app().await;
    post_json(&app, "/api/usuarios/crearUsuario", usuario_valido()).await;

    let wrong_password = post_json(
        &app,
        "/api/usuarios/login",
        json!({ "email": "ana@example.com", "password": "incorrecta" }),
    )
    .await;
    assert_eq!(wrong_password.status(), 401);
    let wrong_password_body: Value = test::read_body_json(wrong_password).await;

    let unknown_email = post_json(
        &app,
        "/api/usuarios/login",
        json!({ "email": "nadie@example.com", "password": "secreta123" }),
    )
    .await;
    assert_eq!(unknown_email.status(), 401);
    let unknown_email_body: Value = test::read_body_json(unknown_email).await;

    assert_eq!(wrong_password_body, unknown_email_body);
    assert_eq!(wrong_password_body["message"], "Credenciales inválidas");
}

#[actix_rt::test]
async fn login_validates_presence_before_touching_the_store() {
    let app = spawn_app().await;

    let res = post_json(&app, "/api/usuarios/login", json!({})).await;
    assert_eq!(res.status(), 400);

    let body: Value = test::read_body_json(res).await;
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .expect("errors array")
        .iter()
        .filter_map(|e| e["field"].as_str())
        .collect();
    assert!(fields.contains(&"email"));
    assert!(fields.contains(&"password"));
}

#[actix_rt::test]
async fn banner_identifies_the_service() {
    let app = spawn_app().await;

    let req = test::TestRequest::get().uri("/").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), 200);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "API de Contactos");
}

#[actix_rt::test]
async fn request_body_is_sanitized_before_validation() {
    let app = spawn_app().await;

    let mut payload = usuario_valido();
    payload["nombre"] = json!("Ana<script>alert(1)</script>");
    payload["email"] = json!("ana2@example.com");
    let res = post_json(&app, "/api/usuarios/crearUsuario", payload).await;
    assert_eq!(res.status(), 201);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["nombre"], "Ana");
}
