#![allow(clippy::new_without_default)]

use app::{App, AppError, AppResult, Route};
use contracts::{Outcome, Status};
use hyper::{header::HOST, Body, Method, Request, Response};
use serde_json::Value as JsonValue;
use std::sync::Arc;

pub mod app;
pub mod auth;
pub mod controller;
pub mod ids;

#[macro_use]
extern crate log;

#[derive(Clone, Debug)]
pub struct Settings {
    pub port: u16,
    /// Host used in list links, the request's `Host` header is used when unset
    pub advertised_host: Option<String>,
    pub api_username: String,
    pub api_password: String,
}

const PING_URI: &str = "/ping";
const LISTS_URI: &str = "/lists";
const LIST_URI_PREFIX: &str = "/lists/";

pub async fn entry_point(
    webserver: Arc<Webserver>,
    request: Request<Body>,
) -> Result<Response<Body>, hyper::Error> {
    Ok(webserver.handle_request(request).await)
}

pub struct Webserver {
    app: Arc<App>,
    settings: Settings,
}

impl Webserver {
    pub fn new(app: Arc<App>, settings: Settings) -> Self {
        Self { app, settings }
    }

    pub async fn handle_request(&self, request: Request<Body>) -> Response<Body> {
        let timer = std::time::Instant::now();
        let method = request.method().clone();
        // route without trailing slash for easier matching
        let route = request.uri().path().trim_end_matches('/').to_owned();

        let response = match (&method, route.as_str()) {
            (_, PING_URI) => ping_pong_response(),
            (&Method::GET, LISTS_URI) => {
                let host = self.host_for(&request);
                self.app.handle(Route::GetLists { host })
            }
            (&Method::POST, LISTS_URI) => {
                let auth = auth::authorization_from_headers(request.headers());
                match Self::get_body_as_json(request).await {
                    Ok(body) => self.app.handle(Route::AddList { auth, body }),
                    Err(error) => app::json_response(&error.into_outcome::<()>()),
                }
            }
            (&Method::GET, list_route) if list_route.starts_with(LIST_URI_PREFIX) => {
                let id = list_route[LIST_URI_PREFIX.len()..].to_owned();
                self.app.handle(Route::GetList { id })
            }
            _invalid => {
                warn!("invalid http method or route request: {} '{}'", method, route);
                not_found()
            }
        };

        info!(
            "{} '{}' -> {} in {:?}",
            method,
            route,
            response.status(),
            timer.elapsed()
        );

        response
    }

    fn host_for(&self, request: &Request<Body>) -> String {
        if let Some(host) = &self.settings.advertised_host {
            return host.clone();
        }

        request
            .headers()
            .get(HOST)
            .and_then(|host| host.to_str().ok())
            .map(str::to_owned)
            .unwrap_or_else(|| format!("localhost:{}", self.settings.port))
    }

    /// Reads the request body as json.
    ///
    /// An empty or unparseable body is `None`, deciding what that means is up to the route.
    async fn get_body_as_json(request: Request<Body>) -> AppResult<Option<JsonValue>> {
        let bytes = hyper::body::to_bytes(request.into_body())
            .await
            .map_err(|hyper_error| AppError::invalid_request().with_context(&hyper_error))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        match serde_json::from_slice(&bytes) {
            Ok(json) => Ok(Some(json)),
            Err(serde_error) => {
                warn!("error parsing request body as json: '{}'", serde_error);
                Ok(None)
            }
        }
    }
}

fn ping_pong_response() -> Response<Body> {
    Response::new(Body::from("pong"))
}

fn not_found() -> Response<Body> {
    let outcome: Outcome<()> = Outcome::new(Status::NotFound, "invalid route");
    app::json_response(&outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{ListRecord, ListSummary};
    use hyper::StatusCode;
    use serde::de::DeserializeOwned;

    fn settings() -> Settings {
        Settings {
            port: 3000,
            advertised_host: None,
            api_username: "testuser".to_owned(),
            api_password: "p455w0rd".to_owned(),
        }
    }

    fn webserver(settings: Settings) -> Webserver {
        let app = Arc::new(App::new(&settings));
        Webserver::new(app, settings)
    }

    fn basic_auth() -> String {
        format!("Basic {}", base64::encode("testuser:p455w0rd"))
    }

    async fn read_outcome<T>(response: Response<Body>) -> Outcome<T>
    where
        T: DeserializeOwned,
    {
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn add_request(body: &'static str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/lists")
            .header("Authorization", basic_auth())
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn ping_test() {
        let webserver = webserver(settings());
        let request = Request::get("/ping").body(Body::empty()).unwrap();

        let response = webserver.handle_request(request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        assert_eq!(&bytes[..], b"pong");
    }

    #[tokio::test]
    async fn add_and_fetch_test() {
        let webserver = webserver(settings());

        let response = webserver
            .handle_request(add_request(
                r#"{ "name": "Groceries", "list": ["milk", "eggs"] }"#,
            ))
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let added: Outcome<ListRecord> = read_outcome(response).await;
        let record = added.data.unwrap();
        assert_eq!(record.name, "Groceries");
        assert_eq!(record.list, vec!["milk", "eggs"]);

        let request = Request::get(format!("/lists/{}/", record.id))
            .body(Body::empty())
            .unwrap();
        let response = webserver.handle_request(request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let found: Outcome<ListRecord> = read_outcome(response).await;
        assert_eq!(found.message, "list found");
        assert_eq!(found.data, Some(record.clone()));

        let request = Request::get("/lists")
            .header("Host", "example.com:8080")
            .body(Body::empty())
            .unwrap();
        let response = webserver.handle_request(request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let all: Outcome<Vec<ListSummary>> = read_outcome(response).await;
        assert_eq!(all.message, "1 lists found");
        assert_eq!(
            all.data.unwrap(),
            vec![ListSummary::new(
                "Groceries".to_owned(),
                format!("http://example.com:8080/lists/{}", record.id)
            )]
        );
    }

    #[tokio::test]
    async fn advertised_host_is_preferred() {
        let webserver = webserver(Settings {
            advertised_host: Some("lists.example.com".to_owned()),
            ..settings()
        });
        webserver
            .handle_request(add_request(r#"{ "name": "Chores", "list": [] }"#))
            .await;

        let request = Request::get("/lists")
            .header("Host", "127.0.0.1:3000")
            .body(Body::empty())
            .unwrap();
        let all: Outcome<Vec<ListSummary>> =
            read_outcome(webserver.handle_request(request).await).await;

        assert!(all.data.unwrap()[0]
            .link
            .starts_with("http://lists.example.com/lists/"));
    }

    #[tokio::test]
    async fn empty_collection_test() {
        let webserver = webserver(settings());

        let request = Request::get("/lists").body(Body::empty()).unwrap();
        let response = webserver.handle_request(request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let outcome: Outcome<JsonValue> = read_outcome(response).await;
        assert_eq!(outcome.message, "no lists found");

        let request = Request::get("/lists/abc").body(Body::empty()).unwrap();
        let response = webserver.handle_request(request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let outcome: Outcome<JsonValue> = read_outcome(response).await;
        assert_eq!(outcome.message, "list not found");
    }

    #[tokio::test]
    async fn add_failures_test() {
        let webserver = webserver(settings());

        let request = Request::post("/lists")
            .body(Body::from(r#"{ "name": "X", "list": [] }"#))
            .unwrap();
        let response = webserver.handle_request(request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let outcome: Outcome<JsonValue> = read_outcome(response).await;
        assert_eq!(outcome.message, "missing basic auth");

        let request = Request::post("/lists")
            .header(
                "Authorization",
                format!("Basic {}", base64::encode("testuser:wrong")),
            )
            .body(Body::from(r#"{ "name": "X", "list": [] }"#))
            .unwrap();
        let response = webserver.handle_request(request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let outcome: Outcome<JsonValue> = read_outcome(response).await;
        assert_eq!(outcome.message, "invalid credentials");

        for body in &[r#"{ "name": "X", "list": ["a", 5] }"#, "not json", ""] {
            let response = webserver.handle_request(add_request(*body)).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", body);
            let outcome: Outcome<JsonValue> = read_outcome(response).await;
            assert_eq!(outcome.status, Status::BadRequest);
            assert_eq!(outcome.message, "JSON data missing in request body");
        }

        let request = Request::get("/lists").body(Body::empty()).unwrap();
        let response = webserver.handle_request(request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn invalid_route_test() {
        let webserver = webserver(settings());

        for (method, uri) in &[
            (Method::GET, "/"),
            (Method::DELETE, "/lists"),
            (Method::PUT, "/lists/abc"),
            (Method::GET, "/list"),
        ] {
            let request = Request::builder()
                .method(method.clone())
                .uri(*uri)
                .body(Body::empty())
                .unwrap();
            let response = webserver.handle_request(request).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{} {}", method, uri);

            let outcome: Outcome<JsonValue> = read_outcome(response).await;
            assert_eq!(outcome.message, "invalid route");
        }
    }
}
