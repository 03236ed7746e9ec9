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

//! Test utilities for the business layer.

use crate::db;
use crate::driver::Driver;
use crate::model::*;
use campgrounds_core::db::{Db, Executor};
use std::sync::Arc;

/// State of a running test.
pub(crate) struct TestContext {
    /// The database backing the driver.
    db: Arc<dyn Db + Send + Sync>,

    /// The driver under test.
    driver: Driver,
}

impl TestContext {
    /// Initializes the driver using an in-memory database.
    pub(crate) async fn setup() -> Self {
        let db = Arc::new(campgrounds_core::db::sqlite::testutils::setup().await);
        db::init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        let driver = Driver::new(db.clone());
        Self { db, driver }
    }

    /// Gets a direct executor against the database.
    pub(crate) async fn ex(&self) -> Executor {
        self.db.ex().await.unwrap()
    }

    /// Gets a copy of the driver in this test context.
    pub(crate) fn driver(&self) -> Driver {
        self.driver.clone()
    }

    /// Creates a campground titled `title` directly in the database.
    pub(crate) async fn create_campground(&self, title: &str) -> Campground {
        db::create_campground(&mut self.ex().await, campground_data(title)).await.unwrap()
    }

    /// Creates a review directly in the database and attaches it to `campground_id`.
    pub(crate) async fn create_review(
        &self,
        campground_id: CampgroundId,
        body: &str,
        rating: i64,
    ) -> Review {
        let mut ex = self.ex().await;
        let review = db::create_review(&mut ex, review_data(body, rating)).await.unwrap();
        db::attach_review(&mut ex, campground_id, *review.id()).await.unwrap();
        review
    }
}

/// Syntactic sugar to build the contents of a campground given only its `title`.
pub(crate) fn campground_data(title: &str) -> CampgroundData {
    CampgroundData::new(
        title.to_owned(),
        format!("{} location", title),
        Price::new(25.5).unwrap(),
        format!("{} description", title),
        format!("https://example.com/{}.jpg", title),
    )
}

/// Syntactic sugar to build the contents of a review.
pub(crate) fn review_data(body: &str, rating: i64) -> ReviewData {
    ReviewData::new(body.to_owned(), Rating::new(rating).unwrap())
}
