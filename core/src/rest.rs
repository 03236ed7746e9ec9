// III-IV
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Generic code for REST handlers.
//!
//! All services should implement an `app` function in this module that returns the `Router` for the
//! application.
//!
//! Every API should be put in its own `.rs` file, using a name like `<entity>_<method>.rs`.  This
//! may seem overkill, but putting every API in its own file makes it easy to ensure all the
//! integration tests for the given API truly belong to that API.
//!
//! More specifically, the `tests` module within an API should define a `route` method that
//! returns the HTTP method and the API path under test.  All integration tests within the module
//! then rely on `route` to obtain this information, ensuring that they all test the desired API.
//!
//! It is also useful for the tests in this layer to define a `TestContext` in a `testutils` module
//! that allows interacting with the database layer directly, using simplified types.
//!
//! Handlers return `RestResult`s.  Errors are never rendered by the handlers themselves: the
//! response built from a `RestError` carries an `ErrorPage` extension that a single middleware in
//! the service turns into the user-visible error page.

use crate::driver::DriverError;
use crate::model::ModelError;
use crate::template::TemplateError;
use crate::validation::{RawForm, Validate, Validation, validate};
use async_trait::async_trait;
use axum::body::{Bytes, HttpBody};
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::http::{Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use futures::FutureExt;
use log::{error, warn};
use serde::de::DeserializeOwned;
use std::any::Any;
use std::panic::AssertUnwindSafe;

/// Message returned when no route matches the request.
pub const NOT_FOUND_MESSAGE: &str = "Page Not Found";

/// Name of the query parameter that HTML forms use to request a method other than POST.
const METHOD_OVERRIDE_PARAM: &str = "_method";

/// Frontend errors.  These are the errors that are visible to the user on failed requests.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum RestError {
    /// Catch-all error type for all unexpected errors.
    #[error("{0}")]
    InternalError(String),

    /// Indicates an error in the contents of the request.
    #[error("{0}")]
    InvalidRequest(String),

    /// Indicates that a requested entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Indicates that a request that should have empty content did not.
    #[error("Content should be empty")]
    PayloadNotEmpty,

    /// Indicates that the content of a request exceeds the accepted size.
    #[error("{0}")]
    PayloadTooLarge(String),
}

impl RestError {
    /// Returns the HTTP status code that represents this error.
    pub fn status(&self) -> StatusCode {
        match self {
            RestError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RestError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            RestError::NotFound(_) => StatusCode::NOT_FOUND,
            RestError::PayloadNotEmpty => StatusCode::PAYLOAD_TOO_LARGE,
            RestError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    /// Converts an axum extractor rejection, described by its `status` and `message`, into an
    /// error that keeps the status class of the rejection.
    fn from_rejection(status: StatusCode, message: String) -> Self {
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            RestError::PayloadTooLarge(message)
        } else if status.is_server_error() {
            RestError::InternalError(message)
        } else {
            RestError::InvalidRequest(message)
        }
    }
}

impl From<DriverError> for RestError {
    fn from(e: DriverError) -> Self {
        match e {
            DriverError::AlreadyExists(_) => RestError::InvalidRequest(e.to_string()),
            DriverError::BackendError(_) => RestError::InternalError(e.to_string()),
            DriverError::InvalidInput(_) => RestError::InvalidRequest(e.to_string()),
            DriverError::NotFound(_) => RestError::NotFound(e.to_string()),
        }
    }
}

impl From<ModelError> for RestError {
    fn from(e: ModelError) -> Self {
        RestError::InvalidRequest(e.to_string())
    }
}

impl From<TemplateError> for RestError {
    fn from(e: TemplateError) -> Self {
        RestError::InternalError(e.to_string())
    }
}

/// Details of a failed request, attached as an extension to the response of a `RestError` so
/// that the error page can be rendered further up the middleware chain.
#[derive(Clone, Debug, PartialEq)]
pub struct ErrorPage {
    /// The HTTP status code of the response.
    pub status: StatusCode,

    /// Textual representation of the error message.  May be empty.
    pub message: String,
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        if status.is_server_error() {
            warn!("Request failed with status {}: {}", status, message);
        }

        let mut response = (status, message.clone()).into_response();
        response.extensions_mut().insert(ErrorPage { status, message });
        response
    }
}

/// Result type for this module.
pub type RestResult<T> = Result<T, RestError>;

/// A request body extractor that forbids any content.
///
/// Any API that doesn't expect a body should use this to ensure we don't get garbage data that we
/// don't care about.  This future-proofs the service.
pub struct EmptyBody {}

#[async_trait]
impl<S> FromRequest<S> for EmptyBody
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        if req.into_body().is_end_stream() {
            Ok(EmptyBody {})
        } else {
            Err(RestError::PayloadNotEmpty)
        }
    }
}

/// A request body extractor that decodes a form and validates it against the schema of `T`.
///
/// This is the validation step of every handler chain that accepts user input: when the form does
/// not satisfy the schema, extraction fails with an `InvalidRequest` that joins all field errors
/// and the handler never runs.
pub struct Valid<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Valid<T>
where
    S: Send + Sync,
    T: Validate + Send,
{
    type Rejection = RestError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| RestError::from_rejection(e.status(), e.body_text()))?;
        let form = RawForm::parse(&body)?;
        match validate::<T>(&form) {
            Validation::Valid(value) => Ok(Valid(value)),
            Validation::Invalid(errors) => Err(RestError::InvalidRequest(errors.join(","))),
        }
    }
}

/// A path parameters extractor whose failures are reported as `RestError`s.
///
/// Rejections of axum's own `Path` produce plain responses that bypass the error page, so
/// handlers should take their parameters via this type instead.
pub struct PathParams<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for PathParams<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = RestError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(PathParams(value)),
            Err(e) => Err(RestError::from_rejection(e.status(), e.body_text())),
        }
    }
}

/// Fallback handler for requests that do not match any route.
pub async fn not_found() -> RestError {
    RestError::NotFound(NOT_FOUND_MESSAGE.to_owned())
}

/// Extracts the method requested via the `_method` parameter of a `query` string, if any.
fn requested_method(query: &str) -> Option<Method> {
    let pairs = serde_urlencoded::from_str::<Vec<(String, String)>>(query).ok()?;
    let (_, value) = pairs.into_iter().find(|(key, _)| key == METHOD_OVERRIDE_PARAM)?;
    match value.to_ascii_uppercase().as_str() {
        "DELETE" => Some(Method::DELETE),
        "PATCH" => Some(Method::PATCH),
        "PUT" => Some(Method::PUT),
        _ => None,
    }
}

/// Middleware that lets HTML forms, which can only issue GET and POST requests, reach handlers
/// for other methods by adding `_method=<METHOD>` to the query string of a POST request.
///
/// This must run before routing, so it has to wrap the router instead of being added to it as a
/// layer.
pub async fn method_override(mut request: Request, next: Next) -> Response {
    if request.method() == Method::POST {
        if let Some(method) = request.uri().query().and_then(requested_method) {
            *request.method_mut() = method;
        }
    }
    next.run(request).await
}

/// Extracts a printable message from the payload of a panic.
fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown cause"
    }
}

/// Middleware that converts panics raised while handling a request into a generic internal error.
///
/// Combined with handlers that return `RestResult`s, this guarantees that no failure in a handler
/// escapes the request chain: the client always gets an error response.
pub async fn catch_panics(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    match AssertUnwindSafe(next.run(request)).catch_unwind().await {
        Ok(response) => response,
        Err(panic) => {
            error!("Handler for {} {} panicked: {}", method, uri, panic_message(panic.as_ref()));
            RestError::InternalError(String::new()).into_response()
        }
    }
}

/// Common test code for the REST server.
#[cfg(feature = "testutils")]
pub mod testutils {
    use super::*;
    use axum::Router;
    use axum::http;
    use serde::Serialize;
    use tower::util::ServiceExt;

    /// Maximum body size for testing purposes.
    const MAX_BODY_SIZE: usize = 64 * 1024;

    /// Builder for a single request to the app.
    #[must_use]
    pub struct OneShotBuilder {
        /// The router for the app being tested.
        app: Router,

        /// Builder for the request that will be sent to the app.
        builder: axum::http::request::Builder,
    }

    impl OneShotBuilder {
        /// Creates a new request against a given `method`/`uri` pair served by an `app` router.
        pub fn new<U: AsRef<str>>(app: Router, (method, uri): (http::Method, U)) -> Self {
            let builder = Request::builder().method(method).uri(uri.as_ref());
            Self { app, builder }
        }

        /// Extends the URI in the request with a `query`.
        pub fn with_query<Q: Serialize>(mut self, query: Q) -> Self {
            let uri = self.builder.uri_ref().unwrap().to_string();
            assert!(!uri.contains('?'), "URI already contains a query: {}", uri);
            assert!(!uri.contains('#'), "URI contains a fragment: {}", uri);
            self.builder = self.builder.uri(format!(
                "{}?{}",
                uri,
                serde_urlencoded::to_string(query).unwrap()
            ));
            self
        }

        /// Finishes building the request and sends it with an empty payload.
        pub async fn send_empty(self) -> ResponseChecker {
            let request = self.builder.body(axum::body::Body::empty()).unwrap();
            ResponseChecker::from(self.app.oneshot(request).await.unwrap())
        }

        /// Finishes building the request and sends it with a text payload.
        pub async fn send_text<T: Into<String>>(self, text: T) -> ResponseChecker {
            let request = self
                .builder
                .header(http::header::CONTENT_TYPE, mime::TEXT_PLAIN.as_ref())
                .body(axum::body::Body::from(text.into()))
                .unwrap();
            ResponseChecker::from(self.app.oneshot(request).await.unwrap())
        }

        /// Finishes building the request and sends it with a form encoded in the
        /// body as the payload.
        pub async fn send_form<T: Serialize>(self, request: T) -> ResponseChecker {
            let request = self
                .builder
                .header(http::header::CONTENT_TYPE, mime::APPLICATION_WWW_FORM_URLENCODED.as_ref())
                .body(axum::body::Body::from(serde_urlencoded::to_string(&request).unwrap()))
                .unwrap();
            ResponseChecker::from(self.app.oneshot(request).await.unwrap())
        }
    }

    /// Type alias for the complex type returned by the `oneshot` function.
    type HttpResponse = http::Response<axum::body::Body>;

    /// Validator for the outcome of a request sent by a `OneShotBuilder`.
    #[must_use]
    pub struct ResponseChecker {
        /// Actual response that we received from the app.
        response: HttpResponse,

        /// Expected HTTP status code in the response above.
        exp_status: http::StatusCode,
    }

    impl From<HttpResponse> for ResponseChecker {
        fn from(response: HttpResponse) -> Self {
            Self { response, exp_status: http::StatusCode::OK }
        }
    }

    impl ResponseChecker {
        /// Sets the expected exit HTTP status to `status`.
        pub fn expect_status(mut self, status: http::StatusCode) -> Self {
            self.exp_status = status;
            self
        }

        /// Performs common validation operations on the response.
        pub fn verify(&self) {
            assert_eq!(self.exp_status, self.response.status());
        }

        /// Consumes the response and returns its body as UTF-8.
        async fn into_body_text(self) -> String {
            let body =
                axum::body::to_bytes(self.response.into_body(), MAX_BODY_SIZE).await.unwrap();
            String::from_utf8(body.to_vec()).unwrap()
        }

        /// Finishes checking the response and expects it to be an error whose body matches
        /// `exp_re`.
        pub async fn expect_error(self, exp_re: &str) {
            assert!(
                self.exp_status.is_client_error() || self.exp_status.is_server_error(),
                "Use expect_text to validate successful responses"
            );
            self.verify();

            let body = self.into_body_text().await;
            let re = regex::Regex::new(exp_re).unwrap();
            assert!(re.is_match(&body), "Error content '{}' does not match re '{}'", body, exp_re);
        }

        /// Finishes checking the response and expects it to be a redirection.  Returns the
        /// target location so that callers can follow it.
        pub async fn expect_redirect(self) -> String {
            assert_eq!(http::StatusCode::SEE_OTHER, self.response.status());

            self.response
                .headers()
                .get(http::header::LOCATION)
                .expect("Redirections must have a location")
                .to_str()
                .unwrap()
                .to_owned()
        }

        /// Finishes checking the response and expects its body to be valid UTF-8 and to match
        /// `exp_re`.
        pub async fn expect_text(self, exp_re: &str) {
            assert!(!exp_re.is_empty(), "Use take_body_as_text to validate empty responses");

            self.verify();

            let body = self.into_body_text().await;
            let re = regex::Regex::new(exp_re).unwrap();
            assert!(re.is_match(&body), "Body content '{}' does not match re '{}'", body, exp_re);
        }

        /// Finishes checking the response and returns the body of the response as UTF-8.
        pub async fn take_body_as_text(self) -> String {
            self.verify();

            self.into_body_text().await
        }

        /// Finishes checking the response and returns the response itself for out of band
        /// validation of properties not supported by the `ResponseChecker`.
        pub async fn take_response(self) -> HttpResponse {
            self.verify();

            self.response
        }
    }

    /// Generates a test to verify that an API that does not expect a payload fails as necessary.
    #[macro_export]
    macro_rules! test_payload_must_be_empty {
        ( $app:expr, $route:expr $(, $query:expr)? ) => {
            #[tokio::test]
            async fn test_payload_must_be_empty() {
                $crate::rest::testutils::OneShotBuilder::new($app, $route)
                    $( .with_query($query) )?
                    .send_text("should not be here")
                    .await
                    .expect_status(axum::http::StatusCode::PAYLOAD_TOO_LARGE)
                    .expect_error("should be empty")
                    .await;
            }
        };
    }

    pub use test_payload_must_be_empty;

    /// Generates a test to verify that an API that validates a form rejects requests without
    /// the expected entity.
    #[macro_export]
    macro_rules! test_payload_must_be_form {
        ( $app:expr, $route:expr, $entity:expr ) => {
            #[tokio::test]
            async fn test_payload_must_be_form() {
                $crate::rest::testutils::OneShotBuilder::new($app, $route)
                    .send_text("this is not a form")
                    .await
                    .expect_status(axum::http::StatusCode::BAD_REQUEST)
                    .expect_error(&format!("{}.*is required", $entity))
                    .await;
            }
        };
    }

    pub use test_payload_must_be_form;
}
