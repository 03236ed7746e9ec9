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

//! Test utilities for the REST API.

use crate::db;
use crate::driver::Driver;
use crate::model::*;
use crate::rest::app;
use axum::Router;
use campgrounds_core::db::{Db, DbError};
use std::sync::Arc;

/// State of a running test.
pub(crate) struct TestContext {
    /// The database backing the app, for direct access to its contents.
    db: Arc<dyn Db + Send + Sync>,

    /// The app under test.
    app: Router,
}

impl TestContext {
    /// Initializes the app using an in-memory database.
    pub(crate) async fn setup() -> Self {
        let db = Arc::new(campgrounds_core::db::sqlite::testutils::setup().await);
        db::init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        let driver = Driver::new(db.clone());
        let app = app(driver);
        Self { db, app }
    }

    /// Gets a clone of the app router.
    pub(crate) fn app(&self) -> Router {
        self.app.clone()
    }

    /// Consumes the context and transforms it into the app router.
    pub(crate) fn into_app(self) -> Router {
        self.app
    }

    /// Creates a campground titled `title` by directly modifying the backing database.
    pub(crate) async fn create_campground(&self, title: &str) -> Campground {
        let data = CampgroundData::new(
            title.to_owned(),
            format!("{} location", title),
            Price::new(30.0).unwrap(),
            format!("{} description", title),
            format!("https://example.com/{}.jpg", title),
        );
        db::create_campground(&mut self.db.ex().await.unwrap(), data).await.unwrap()
    }

    /// Creates a review and attaches it to `campground_id` by directly modifying the backing
    /// database.
    pub(crate) async fn create_review(
        &self,
        campground_id: CampgroundId,
        body: &str,
        rating: i64,
    ) -> Review {
        let mut ex = self.db.ex().await.unwrap();
        let data = ReviewData::new(body.to_owned(), Rating::new(rating).unwrap());
        let review = db::create_review(&mut ex, data).await.unwrap();
        db::attach_review(&mut ex, campground_id, *review.id()).await.unwrap();
        review
    }

    /// Gets the campground `id` from the database, if it exists.
    pub(crate) async fn get_campground(&self, id: CampgroundId) -> Option<Campground> {
        match db::get_campground(&mut self.db.ex().await.unwrap(), id).await {
            Ok(campground) => Some(campground),
            Err(DbError::NotFound) => None,
            Err(e) => panic!("{:?}", e),
        }
    }

    /// Gets all campgrounds in the database.
    pub(crate) async fn get_campgrounds(&self) -> Vec<Campground> {
        db::get_campgrounds(&mut self.db.ex().await.unwrap()).await.unwrap()
    }

    /// Gets the reviews attached to the campground `id`.
    pub(crate) async fn get_campground_reviews(&self, id: CampgroundId) -> Vec<Review> {
        db::get_campground_reviews(&mut self.db.ex().await.unwrap(), id).await.unwrap()
    }

    /// Gets all reviews in the database, attached or not.
    pub(crate) async fn get_reviews(&self) -> Vec<Review> {
        db::get_reviews(&mut self.db.ex().await.unwrap()).await.unwrap()
    }
}

/// Builds the fields of a complete campground form with the given `title` and `price`.
pub(crate) fn campground_form(title: &str, price: &str) -> Vec<(String, String)> {
    vec![
        ("campground[title]".to_owned(), title.to_owned()),
        ("campground[location]".to_owned(), format!("{} location", title)),
        ("campground[price]".to_owned(), price.to_owned()),
        ("campground[description]".to_owned(), format!("{} description", title)),
        ("campground[image]".to_owned(), format!("https://example.com/{}.jpg", title)),
    ]
}

/// Builds the fields of a campground form with `field` removed.
pub(crate) fn campground_form_without(field: &str) -> Vec<(String, String)> {
    let key = format!("campground[{}]", field);
    campground_form("Incomplete", "10").into_iter().filter(|(k, _)| *k != key).collect()
}
