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

//! Entry point to the REST server.

use crate::driver::Driver;
use crate::views;
use axum::Router;
use axum::extract::{DefaultBodyLimit, Request};
use axum::middleware::{Next, from_fn};
use axum::response::{Html, IntoResponse, Response};
use campgrounds_core::rest::{ErrorPage, catch_panics, method_override, not_found};
use tower::ServiceBuilder;

mod campground_delete;
mod campground_edit_get;
mod campground_get;
mod campground_new_get;
mod campground_put;
mod campgrounds_get;
mod campgrounds_post;
mod home_get;
mod review_delete;
mod reviews_post;
#[cfg(test)]
mod testutils;

/// Maximum size of the body of any request.
const MAX_BODY_SIZE: usize = 64 * 1024;

/// Message shown in error pages when the failure did not provide one.
const DEFAULT_ERROR_MESSAGE: &str = "Something Went Wrong!";

/// Middleware that renders the error page for any response that carries error details.
///
/// This is the single place where errors become user-visible pages.
async fn render_error_page(request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    let Some(error) = response.extensions().get::<ErrorPage>() else {
        return response;
    };

    let message =
        if error.message.is_empty() { DEFAULT_ERROR_MESSAGE } else { error.message.as_str() };
    (error.status, Html(views::error_page(error.status, message))).into_response()
}

/// Wraps the `router` of the application with the middleware that applies to all requests.
///
/// Method overrides must be resolved before routing happens, which is why these are not added as
/// layers of the router itself.
fn wrap(router: Router) -> Router {
    Router::new().fallback_service(
        ServiceBuilder::new()
            .layer(from_fn(method_override))
            .layer(from_fn(render_error_page))
            .layer(from_fn(catch_panics))
            .service(router),
    )
}

/// Creates the router for the application.
pub(crate) fn app(driver: Driver) -> Router {
    use axum::routing::{delete, get, post};

    let router = Router::new()
        .route("/", get(home_get::handler).fallback(not_found))
        .route(
            "/campgrounds",
            get(campgrounds_get::handler).post(campgrounds_post::handler).fallback(not_found),
        )
        .route("/campgrounds/new", get(campground_new_get::handler).fallback(not_found))
        .route(
            "/campgrounds/:id",
            get(campground_get::handler)
                .put(campground_put::handler)
                .delete(campground_delete::handler)
                .fallback(not_found),
        )
        .route("/campgrounds/:id/edit", get(campground_edit_get::handler).fallback(not_found))
        .route("/campgrounds/:id/reviews", post(reviews_post::handler).fallback(not_found))
        .route(
            "/campgrounds/:id/reviews/:review_id",
            delete(review_delete::handler).fallback(not_found),
        )
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .with_state(driver);
    wrap(router)
}

#[cfg(test)]
mod tests {
    use super::testutils::*;
    use super::*;
    use axum::http;
    use axum::routing::get;
    use campgrounds_core::rest::RestError;
    use campgrounds_core::rest::testutils::OneShotBuilder;

    #[tokio::test]
    async fn test_unknown_path() {
        let context = TestContext::setup().await;

        for path in ["/nothing-here", "/campgrounds/a/b/c/d", "/campgrounds/"] {
            OneShotBuilder::new(context.app(), (http::Method::GET, path))
                .send_empty()
                .await
                .expect_status(http::StatusCode::NOT_FOUND)
                .expect_error("<h1>Page Not Found</h1>")
                .await;
        }
    }

    #[tokio::test]
    async fn test_unknown_method_on_known_path() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), (http::Method::PATCH, "/campgrounds"))
            .send_empty()
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error("Page Not Found")
            .await;

        OneShotBuilder::new(context.app(), (http::Method::POST, "/campgrounds/new"))
            .send_empty()
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error("Page Not Found")
            .await;
    }

    #[tokio::test]
    async fn test_unsupported_method_override() {
        let context = TestContext::setup().await;
        let campground = context.create_campground("c").await;

        OneShotBuilder::new(
            context.app(),
            (http::Method::POST, format!("/campgrounds/{}", campground.id())),
        )
        .with_query(vec![("_method", "PATCH")])
        .send_empty()
        .await
        .expect_status(http::StatusCode::NOT_FOUND)
        .expect_error("Page Not Found")
        .await;

        assert!(context.get_campground(*campground.id()).await.is_some());
    }

    #[tokio::test]
    async fn test_error_pages_are_html() {
        let context = TestContext::setup().await;

        let response = OneShotBuilder::new(context.app(), (http::Method::GET, "/missing"))
            .send_empty()
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .take_response()
            .await;
        let content_type = response.headers().get(http::header::CONTENT_TYPE).unwrap();
        assert_eq!("text/html; charset=utf-8", content_type.to_str().unwrap());
    }

    #[tokio::test]
    async fn test_malformed_paths_render_error_page() {
        let context = TestContext::setup().await;
        let campground = context.create_campground("c").await;

        for (method, path) in [
            (http::Method::GET, "/campgrounds/%FF".to_owned()),
            (http::Method::GET, "/campgrounds/%FF/edit".to_owned()),
            (http::Method::DELETE, format!("/campgrounds/{}/reviews/%FF", campground.id())),
        ] {
            let response = OneShotBuilder::new(context.app(), (method.clone(), path.clone()))
                .send_empty()
                .await
                .expect_status(http::StatusCode::BAD_REQUEST)
                .take_response()
                .await;
            let content_type = response.headers().get(http::header::CONTENT_TYPE).unwrap();
            assert_eq!("text/html; charset=utf-8", content_type.to_str().unwrap());

            OneShotBuilder::new(context.app(), (method, path))
                .send_empty()
                .await
                .expect_status(http::StatusCode::BAD_REQUEST)
                .expect_error("<h1>Invalid URL")
                .await;
        }
    }

    #[tokio::test]
    async fn test_panics_render_default_message() {
        let router = Router::new().route(
            "/boom",
            get(|| async {
                if true {
                    panic!("Something deep inside broke");
                }
                "unreachable"
            }),
        );

        OneShotBuilder::new(wrap(router), (http::Method::GET, "/boom"))
            .send_empty()
            .await
            .expect_status(http::StatusCode::INTERNAL_SERVER_ERROR)
            .expect_error("<h1>Something Went Wrong!</h1>")
            .await;
    }

    #[tokio::test]
    async fn test_errors_keep_their_message() {
        let router = Router::new().route(
            "/fail",
            get(|| async { Err::<(), _>(RestError::InternalError("Disk <full>".to_owned())) }),
        );

        OneShotBuilder::new(wrap(router), (http::Method::GET, "/fail"))
            .send_empty()
            .await
            .expect_status(http::StatusCode::INTERNAL_SERVER_ERROR)
            .expect_error("<h1>Disk &lt;full&gt;</h1>")
            .await;
    }

    #[tokio::test]
    async fn test_successful_responses_untouched() {
        let router = Router::new().route("/plain", get(|| async { "just text" }));

        OneShotBuilder::new(wrap(router), (http::Method::GET, "/plain"))
            .send_empty()
            .await
            .expect_text("^just text$")
            .await;
    }

    #[tokio::test]
    async fn test_e2e_campground_lifecycle() {
        let context = TestContext::setup().await;

        let location = OneShotBuilder::new(context.app(), (http::Method::POST, "/campgrounds"))
            .send_form(campground_form("Lakeside", "12.50"))
            .await
            .expect_redirect()
            .await;

        OneShotBuilder::new(context.app(), (http::Method::GET, &location))
            .send_empty()
            .await
            .expect_text("<h1>Lakeside</h1>")
            .await;

        let reviews_path = format!("{}/reviews", location);
        for (body, rating) in [("Lovely", "5"), ("Buggy", "2")] {
            let redirect = OneShotBuilder::new(context.app(), (http::Method::POST, &reviews_path))
                .send_form(vec![("review[body]", body), ("review[rating]", rating)])
                .await
                .expect_redirect()
                .await;
            assert_eq!(location, redirect);
        }

        let body = OneShotBuilder::new(context.app(), (http::Method::GET, &location))
            .send_empty()
            .await
            .take_body_as_text()
            .await;
        let lovely = body.find("Review: Lovely").unwrap();
        let buggy = body.find("Review: Buggy").unwrap();
        assert!(lovely < buggy);

        let edit_path = format!("{}/edit", location);
        OneShotBuilder::new(context.app(), (http::Method::GET, &edit_path))
            .send_empty()
            .await
            .expect_text("value=\"Lakeside\"")
            .await;

        let redirect = OneShotBuilder::new(context.app(), (http::Method::POST, &location))
            .with_query(vec![("_method", "PUT")])
            .send_form(campground_form("Riverside", "20"))
            .await
            .expect_redirect()
            .await;
        assert_eq!(location, redirect);

        OneShotBuilder::new(context.app(), (http::Method::GET, &location))
            .send_empty()
            .await
            .expect_text("<h1>Riverside</h1>")
            .await;

        let redirect = OneShotBuilder::new(context.app(), (http::Method::POST, &location))
            .with_query(vec![("_method", "DELETE")])
            .send_empty()
            .await
            .expect_redirect()
            .await;
        assert_eq!("/campgrounds", redirect);

        OneShotBuilder::new(context.app(), (http::Method::GET, &location))
            .send_empty()
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error("Campground not found")
            .await;

        assert_eq!(2, context.get_reviews().await.len());
    }
}
