use std::collections::HashMap;

use http::{header, HeaderMap, HeaderName, HeaderValue, Method, Request, Response, StatusCode};
use serde::Serialize;
use tracing::{debug, error, warn};
use url::form_urlencoded;

use crate::handler::HandlerService;

/// Per-request state, exclusively owned by the task handling that request.
///
/// Carries the decoded request (method, path, query, form, extracted route
/// parameters), the response under construction, and the resolved handler
/// chain with its execution cursor. Created by the engine at request arrival
/// and discarded once the response is built.
pub struct Context {
    method: Method,
    path: String,
    headers: HeaderMap,
    query: HashMap<String, String>,
    form: HashMap<String, String>,
    pub(crate) params: HashMap<String, String>,
    pub(crate) handlers: Vec<HandlerService>,
    cursor: isize,
    status: Option<StatusCode>,
    response_headers: HeaderMap,
    body: Option<Vec<u8>>,
}

impl Context {
    pub(crate) fn new(request: Request<Vec<u8>>) -> Self {
        let (parts, body) = request.into_parts();
        let query = parts
            .uri
            .query()
            .map(|query| parse_pairs(query.as_bytes()))
            .unwrap_or_default();
        let form = if is_form_urlencoded(&parts.headers) {
            parse_pairs(&body)
        } else {
            HashMap::new()
        };
        Self {
            method: parts.method,
            path: parts.uri.path().to_string(),
            headers: parts.headers,
            query,
            form,
            params: HashMap::new(),
            handlers: Vec::new(),
            cursor: -1,
            status: None,
            response_headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Value bound to a named route parameter (`:name` or `*name`).
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// First value of a query string key.
    pub fn query(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    /// First value of a key from an `application/x-www-form-urlencoded` body.
    pub fn post_form(&self, name: &str) -> Option<&str> {
        self.form.get(name).map(String::as_str)
    }

    /// A request header value, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// Passes control to the next handler in the chain and waits for it
    /// (and everything it triggers) to complete. A handler that returns
    /// without calling `next` cancels the rest of the chain; calling `next`
    /// more than once per invocation is a contract violation and is not
    /// guarded against.
    pub async fn next(&mut self) {
        self.cursor += 1;
        let index = self.cursor;
        let Some(handler) = self.handlers.get(index as usize).cloned() else {
            return;
        };
        debug!(handler = handler.name(), index, "-->");
        handler.handle(self).await;
        debug!(handler = handler.name(), index, "<--");
    }

    /// Sets the response status without writing a body.
    pub fn status(&mut self, code: StatusCode) {
        self.status = Some(code);
    }

    /// Status set so far, if any handler produced one.
    pub fn response_status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Sets a response header, replacing any previous value for the key.
    pub fn set_header(&mut self, key: &str, value: &str) {
        match (HeaderName::try_from(key), HeaderValue::try_from(value)) {
            (Ok(key), Ok(value)) => {
                self.response_headers.insert(key, value);
            }
            _ => warn!(key, value, "invalid response header, ignored"),
        }
    }

    /// Responds with plain text.
    pub fn string(&mut self, code: StatusCode, body: &str) {
        self.write(code, "text/plain; charset=utf-8", body.as_bytes().to_vec());
    }

    /// Responds with an HTML document.
    pub fn html(&mut self, code: StatusCode, body: &str) {
        self.write(code, "text/html; charset=utf-8", body.as_bytes().to_vec());
    }

    /// Responds with raw bytes.
    pub fn data(&mut self, code: StatusCode, body: Vec<u8>) {
        self.write(code, "application/octet-stream", body);
    }

    /// Serializes `value` as JSON and responds with it. A serialization
    /// failure turns into a 500 instead of a half-written response.
    pub fn json<T: Serialize>(&mut self, code: StatusCode, value: &T) {
        match serde_json::to_vec(value) {
            Ok(body) => self.write(code, "application/json", body),
            Err(source) => {
                error!(path = self.path, error = %source, "failed to encode json response");
                self.write(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "text/plain; charset=utf-8",
                    b"failed to encode response".to_vec(),
                );
            }
        }
    }

    /// The body is written at most once; a second write is a caller error
    /// and is ignored.
    fn write(&mut self, code: StatusCode, content_type: &'static str, body: Vec<u8>) {
        if self.body.is_some() {
            warn!(path = self.path, "response body already written, second write ignored");
            return;
        }
        self.status = Some(code);
        self.response_headers
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        self.body = Some(body);
    }

    pub(crate) fn into_response(self) -> Response<Vec<u8>> {
        let mut response = Response::new(self.body.unwrap_or_default());
        *response.status_mut() = self.status.unwrap_or(StatusCode::OK);
        *response.headers_mut() = self.response_headers;
        response
    }
}

fn is_form_urlencoded(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false)
}

/// Decodes urlencoded pairs, keeping the first value of a repeated key.
fn parse_pairs(input: &[u8]) -> HashMap<String, String> {
    let mut pairs = HashMap::new();
    for (key, value) in form_urlencoded::parse(input) {
        pairs.entry(key.into_owned()).or_insert_with(|| value.into_owned());
    }
    pairs
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn context(uri: &str) -> Context {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Vec::new())
            .unwrap();
        Context::new(request)
    }

    #[test]
    fn parses_the_query_string() {
        let ctx = context("/search?q=gopher&lang=go&q=ignored");

        assert_eq!(ctx.query("q"), Some("gopher"));
        assert_eq!(ctx.query("lang"), Some("go"));
        assert_eq!(ctx.query("missing"), None);
    }

    #[test]
    fn parses_urlencoded_form_bodies() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/login")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(b"username=ferris&password=s3cret".to_vec())
            .unwrap();
        let ctx = Context::new(request);

        assert_eq!(ctx.post_form("username"), Some("ferris"));
        assert_eq!(ctx.post_form("password"), Some("s3cret"));
    }

    #[test]
    fn ignores_the_body_when_not_a_form() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/upload")
            .body(b"username=ferris".to_vec())
            .unwrap();
        let ctx = Context::new(request);

        assert_eq!(ctx.post_form("username"), None);
    }

    #[test]
    fn defaults_to_200_when_no_status_is_set() {
        let ctx = context("/");
        let response = ctx.into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.body().is_empty());
    }

    #[test]
    fn first_body_write_wins() {
        let mut ctx = context("/");
        ctx.string(StatusCode::OK, "first");
        ctx.string(StatusCode::IM_A_TEAPOT, "second");

        let response = ctx.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.body().as_slice(), b"first");
    }

    #[test]
    fn json_sets_content_type_and_body() {
        #[derive(serde::Serialize)]
        struct Payload {
            name: &'static str,
        }

        let mut ctx = context("/");
        ctx.json(StatusCode::OK, &Payload { name: "trellis" });

        let response = ctx.into_response();
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(response.body().as_slice(), br#"{"name":"trellis"}"#);
    }

    #[test]
    fn invalid_response_headers_are_ignored() {
        let mut ctx = context("/");
        ctx.set_header("X-Ok", "yes");
        ctx.set_header("bad header", "value");

        let response = ctx.into_response();
        assert_eq!(response.headers().get("X-Ok").unwrap(), "yes");
        assert_eq!(response.headers().len(), 1);
    }
}
