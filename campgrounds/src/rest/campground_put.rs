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

//! API to replace the contents of an existing campground.

use crate::driver::Driver;
use crate::model::{CampgroundData, CampgroundId};
use axum::extract::State;
use axum::response::Redirect;
use campgrounds_core::rest::{PathParams, RestResult, Valid};

/// PUT handler for this API.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    PathParams(id): PathParams<String>,
    Valid(data): Valid<CampgroundData>,
) -> RestResult<Redirect> {
    let id = CampgroundId::parse(&id)?;
    driver.update_campground(id, data).await?;
    Ok(Redirect::to(&format!("/campgrounds/{}", id)))
}

#[cfg(test)]
mod tests {
    use crate::model::CampgroundId;
    use crate::rest::testutils::*;
    use axum::http;
    use campgrounds_core::rest::testutils::OneShotBuilder;
    use campgrounds_core::test_payload_must_be_form;

    fn route(id: &str) -> (http::Method, String) {
        (http::Method::PUT, format!("/campgrounds/{}", id))
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;

        let campground = context.create_campground("Old").await;
        let other = context.create_campground("Other").await;
        let review = context.create_review(*campground.id(), "Still here", 4).await;

        let location = OneShotBuilder::new(context.app(), route(&campground.id().to_string()))
            .send_form(campground_form("New", "99.99"))
            .await
            .expect_redirect()
            .await;
        assert_eq!(format!("/campgrounds/{}", campground.id()), location);

        let updated = context.get_campground(*campground.id()).await.unwrap();
        assert_eq!("New", updated.data().title());
        assert_eq!("New location", updated.data().location());
        assert_eq!(99.99, updated.data().price().as_f64());
        assert_eq!(vec![review], context.get_campground_reviews(*campground.id()).await);
        assert_eq!(Some(other.clone()), context.get_campground(*other.id()).await);
    }

    #[tokio::test]
    async fn test_edit_then_fetch_shows_new_title() {
        let context = TestContext::setup().await;

        let campground = context.create_campground("Before").await;
        let path = format!("/campgrounds/{}", campground.id());

        OneShotBuilder::new(context.app(), (http::Method::POST, &path))
            .with_query(vec![("_method", "put")])
            .send_form(campground_form("After", "1"))
            .await
            .expect_redirect()
            .await;

        OneShotBuilder::new(context.app(), (http::Method::GET, &path))
            .send_empty()
            .await
            .expect_text("<h1>After</h1>")
            .await;
    }

    #[tokio::test]
    async fn test_not_found() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), route(&CampgroundId::new_random().to_string()))
            .send_form(campground_form("Ghost", "1"))
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error("Campground not found")
            .await;

        assert!(context.get_campgrounds().await.is_empty());
    }

    #[tokio::test]
    async fn test_bad_id() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), route("bogus"))
            .send_form(campground_form("Whatever", "1"))
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("Invalid campground id")
            .await;
    }

    #[tokio::test]
    async fn test_validation_runs_first() {
        let context = TestContext::setup().await;

        let campground = context.create_campground("Untouched").await;

        OneShotBuilder::new(context.app(), route(&campground.id().to_string()))
            .send_form(campground_form_without("image"))
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("campground.image&quot; is required")
            .await;

        OneShotBuilder::new(context.app(), route("bogus"))
            .send_form(campground_form_without("image"))
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_error("campground.image&quot; is required")
            .await;

        assert_eq!(Some(campground.clone()), context.get_campground(*campground.id()).await);
    }

    test_payload_must_be_form!(
        TestContext::setup().await.into_app(),
        route(&CampgroundId::new_random().to_string()),
        "campground"
    );
}
