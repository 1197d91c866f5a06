//! Request sanitization middleware.
//!
//! Cleans untrusted input before any handler or validator observes it:
//! script-tag blocks are stripped and HTML metacharacters escaped in every
//! string, and mapping keys that look like document-store operators (`$`
//! prefix or embedded `.`) are dropped. JSON bodies are rewritten in place;
//! the URI query string is re-encoded through the same functions. Path
//! parameters are resolved after app middleware runs, so the id-parsing
//! helpers in `inbound::http` push them through [`sanitize_str`] instead.
//!
//! Sanitization is a hardening layer, not the authorization mechanism: any
//! fault here logs a warning and lets the request continue unmodified.

use std::rc::Rc;
use std::sync::OnceLock;
use std::task::{Context, Poll};

use actix_http::h1;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{self, HeaderValue};
use actix_web::http::uri::{PathAndQuery, Uri};
use actix_web::web::Bytes;
use actix_web::Error;
use futures_util::future::{ready, LocalBoxFuture, Ready};
use regex::Regex;
use serde_json::{Map, Value};
use tracing::warn;

/// Recursion limit for nested request payloads. Anything nested deeper is
/// replaced by an empty object.
pub const MAX_DEPTH: usize = 10;

static SCRIPT_RE: OnceLock<Regex> = OnceLock::new();

fn script_regex() -> &'static Regex {
    SCRIPT_RE.get_or_init(|| {
        // Non-greedy, case-insensitive, across newlines.
        let pattern = r"(?is)<script.*?>.*?</script>";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("script regex failed to compile: {error}"))
    })
}

/// Escape the five HTML metacharacters to their entity forms.
#[must_use]
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Strip script-tag blocks, then entity-escape what remains.
#[must_use]
pub fn sanitize_str(input: &str) -> String {
    let without_scripts = script_regex().replace_all(input, "");
    escape_html(&without_scripts)
}

fn operator_key(key: &str) -> bool {
    key.starts_with('$') || key.contains('.')
}

/// Recursively sanitize a JSON value.
///
/// # Examples
/// ```
/// use contactos_backend::middleware::sanitize::sanitize_value;
/// use serde_json::json;
///
/// let clean = sanitize_value(json!({"$where": "1", "nombre": "<b>Ana</b>"}), 0);
/// assert_eq!(clean, json!({"nombre": "&lt;b&gt;Ana&lt;/b&gt;"}));
/// ```
#[must_use]
pub fn sanitize_value(value: Value, depth: usize) -> Value {
    if depth > MAX_DEPTH {
        return Value::Object(Map::new());
    }
    match value {
        Value::String(s) => Value::String(sanitize_str(&s)),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| sanitize_value(item, depth + 1))
                .collect(),
        ),
        Value::Object(entries) => {
            let mut clean = Map::with_capacity(entries.len());
            for (key, entry) in entries {
                if operator_key(&key) {
                    continue;
                }
                clean.insert(escape_html(&key), sanitize_value(entry, depth + 1));
            }
            Value::Object(clean)
        }
        other => other,
    }
}

/// Middleware applying [`sanitize_value`] to JSON request bodies and the
/// query string before dispatch.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use contactos_backend::middleware::Sanitize;
///
/// let app = App::new().wrap(Sanitize);
/// ```
#[derive(Clone)]
pub struct Sanitize;

impl<S, B> Transform<S, ServiceRequest> for Sanitize
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SanitizeMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SanitizeMiddleware {
            service: Rc::new(service),
        }))
    }
}

/// Service wrapper produced by [`Sanitize`].
pub struct SanitizeMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for SanitizeMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        Box::pin(async move {
            sanitize_query(&mut req);
            sanitize_json_body(&mut req).await;
            service.call(req).await
        })
    }
}

/// Rewrite the query string with sanitized keys and values. Keeps the
/// original URI on any re-encoding failure.
fn sanitize_query(req: &mut ServiceRequest) {
    let query = req.query_string();
    if query.is_empty() {
        return;
    }

    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        if operator_key(&key) {
            continue;
        }
        serializer.append_pair(&sanitize_str(&key), &sanitize_str(&value));
    }
    let sanitized = serializer.finish();
    if sanitized == query {
        return;
    }

    let path = req.path().to_owned();
    let rewritten = if sanitized.is_empty() {
        path
    } else {
        format!("{path}?{sanitized}")
    };
    let Ok(path_and_query) = rewritten.parse::<PathAndQuery>() else {
        warn!(query, "sanitized query failed to re-encode; keeping original");
        return;
    };

    let mut parts = req.head().uri.clone().into_parts();
    parts.path_and_query = Some(path_and_query);
    match Uri::from_parts(parts) {
        Ok(uri) => req.head_mut().uri = uri,
        Err(error) => {
            warn!(%error, "sanitized URI failed to rebuild; keeping original");
        }
    }
}

/// Buffer a JSON body, sanitize it, and re-inject the cleaned bytes.
/// Malformed JSON passes through untouched so the extractor reports its
/// own 400.
async fn sanitize_json_body(req: &mut ServiceRequest) {
    let is_json = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.trim_start().starts_with("application/json"));
    if !is_json {
        return;
    }

    let body = match req.extract::<Bytes>().await {
        Ok(body) => body,
        Err(error) => {
            warn!(%error, "failed to buffer request body for sanitization");
            return;
        }
    };

    let replacement = match serde_json::from_slice::<Value>(&body) {
        Ok(value) => match serde_json::to_vec(&sanitize_value(value, 0)) {
            Ok(clean) => Bytes::from(clean),
            Err(error) => {
                warn!(%error, "failed to serialise sanitized body; passing original");
                body.clone()
            }
        },
        Err(_) => body.clone(),
    };

    if let Ok(length) = HeaderValue::from_str(&replacement.len().to_string()) {
        req.headers_mut().insert(header::CONTENT_LENGTH, length);
    }
    let (_, mut payload) = h1::Payload::create(true);
    payload.unread_data(replacement);
    req.set_payload(actix_web::dev::Payload::from(payload));
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test as actix_test, web, App, HttpRequest, HttpResponse};
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("hola", "hola")]
    #[case("<script>alert(1)</script>", "")]
    #[case("a<SCRIPT src='x'>evil()</SCRIPT>b", "ab")]
    #[case("<script>a</script><script>b</script>", "")]
    fn strips_script_blocks(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(sanitize_str(input), expected);
    }

    #[rstest]
    fn escapes_all_five_metacharacters() {
        assert_eq!(
            sanitize_str(r#"&<>"'"#),
            "&amp;&lt;&gt;&quot;&#39;"
        );
    }

    #[rstest]
    #[case(json!(null), json!(null))]
    #[case(json!(42), json!(42))]
    #[case(json!(true), json!(true))]
    fn primitives_pass_through(#[case] input: Value, #[case] expected: Value) {
        assert_eq!(sanitize_value(input, 0), expected);
    }

    #[rstest]
    fn arrays_preserve_order_and_length() {
        let clean = sanitize_value(json!(["<b>", 1, null]), 0);
        assert_eq!(clean, json!(["&lt;b&gt;", 1, null]));
    }

    #[rstest]
    #[case("$where")]
    #[case("$gt")]
    #[case("a.b")]
    fn operator_keys_are_dropped(#[case] key: &str) {
        let clean = sanitize_value(json!({ key: "x", "nombre": "Ana" }), 0);
        assert_eq!(clean, json!({ "nombre": "Ana" }));
    }

    #[rstest]
    fn key_names_are_escaped() {
        let clean = sanitize_value(json!({ "<k>": "v" }), 0);
        assert_eq!(clean, json!({ "&lt;k&gt;": "v" }));
    }

    #[rstest]
    fn deep_nesting_truncates_to_empty_object() {
        let mut value = json!("leaf");
        for _ in 0..15 {
            value = json!({ "nested": value });
        }
        let mut clean = sanitize_value(value, 0);
        // Walk to the truncation point: levels 0..=10 survive, level 11
        // collapses to an empty object.
        for _ in 0..MAX_DEPTH {
            clean = clean
                .get("nested")
                .cloned()
                .expect("level within the depth bound survives");
        }
        assert_eq!(clean, json!({ "nested": {} }));
    }

    async fn echo_body(body: Bytes) -> HttpResponse {
        HttpResponse::Ok().body(body)
    }

    #[actix_web::test]
    async fn middleware_rewrites_json_bodies() {
        let app = actix_test::init_service(
            App::new()
                .wrap(Sanitize)
                .route("/", web::post().to(echo_body)),
        )
        .await;
        let req = actix_test::TestRequest::post()
            .uri("/")
            .set_json(json!({ "$gt": "", "nombre": "<script>x</script>Ana" }))
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({ "nombre": "Ana" }));
    }

    #[actix_web::test]
    async fn middleware_passes_malformed_json_through() {
        let app = actix_test::init_service(
            App::new()
                .wrap(Sanitize)
                .route("/", web::post().to(echo_body)),
        )
        .await;
        let req = actix_test::TestRequest::post()
            .uri("/")
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload("{not json")
            .to_request();
        let body = actix_test::call_and_read_body(&app, req).await;
        assert_eq!(body, Bytes::from_static(b"{not json"));
    }

    #[actix_web::test]
    async fn middleware_sanitizes_query_strings() {
        async fn echo_query(req: HttpRequest) -> HttpResponse {
            HttpResponse::Ok().body(req.query_string().to_owned())
        }
        let app = actix_test::init_service(
            App::new()
                .wrap(Sanitize)
                .route("/", web::get().to(echo_query)),
        )
        .await;
        let req = actix_test::TestRequest::get()
            .uri("/?usuarioId=abc&$where=1")
            .to_request();
        let body = actix_test::call_and_read_body(&app, req).await;
        assert_eq!(body, Bytes::from_static(b"usuarioId=abc"));
    }

    #[actix_web::test]
    async fn middleware_leaves_non_json_bodies_alone() {
        let app = actix_test::init_service(
            App::new()
                .wrap(Sanitize)
                .route("/", web::post().to(echo_body)),
        )
        .await;
        let req = actix_test::TestRequest::post()
            .uri("/")
            .insert_header((header::CONTENT_TYPE, "text/plain"))
            .set_payload("<script>x</script>")
            .to_request();
        let body = actix_test::call_and_read_body(&app, req).await;
        assert_eq!(body, Bytes::from_static(b"<script>x</script>"));
    }
}
