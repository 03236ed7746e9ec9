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

//! Operations on the reviews of a campground.

use crate::db;
use crate::driver::{Driver, or_not_found};
use crate::model::*;
use campgrounds_core::db::DbError;
use campgrounds_core::driver::DriverResult;
use log::{info, warn};

impl Driver {
    /// Posts a new review with `data` to the campground `campground_id`.
    ///
    /// The review is created and attached to the campground atomically, so a failure never leaves
    /// behind a review without an owner.
    pub(crate) async fn create_review(
        self,
        campground_id: CampgroundId,
        data: ReviewData,
    ) -> DriverResult<Review> {
        let mut tx = self.db.begin().await?;
        // The first statement must be a write so that the transaction takes the write lock up
        // front instead of upgrading a read lock later.
        let review = db::create_review(tx.ex(), data).await?;
        let owner = db::get_campground(tx.ex(), campground_id).await;
        if let Err(e) = or_not_found(owner, "Campground") {
            tx.rollback().await?;
            return Err(e);
        }
        db::attach_review(tx.ex(), campground_id, *review.id()).await?;
        tx.commit().await?;
        info!("Created review {} for campground {}", review.id(), campground_id);
        Ok(review)
    }

    /// Deletes the review `review_id` from the campground `campground_id`.
    ///
    /// The review is detached from the campground and deleted atomically.
    pub(crate) async fn delete_review(
        self,
        campground_id: CampgroundId,
        review_id: ReviewId,
    ) -> DriverResult<()> {
        let mut tx = self.db.begin().await?;
        or_not_found(db::detach_review(tx.ex(), campground_id, review_id).await, "Review")?;
        match db::delete_review(tx.ex(), review_id).await {
            Ok(()) => (),
            Err(DbError::NotFound) => {
                warn!(
                    "Review {} was referenced by campground {} but did not exist",
                    review_id, campground_id
                );
            }
            Err(e) => return Err(e.into()),
        }
        tx.commit().await?;
        info!("Deleted review {} from campground {}", review_id, campground_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::testutils::*;
    use campgrounds_core::driver::DriverError;

    #[tokio::test]
    async fn test_create_review_ok() {
        let context = TestContext::setup().await;

        let campground = context.create_campground("c").await;
        let existing = context.create_review(*campground.id(), "First", 2).await;

        let review = context
            .driver()
            .create_review(*campground.id(), review_data("Second", 5))
            .await
            .unwrap();
        assert_eq!(&review_data("Second", 5), review.data());

        let reviews =
            db::get_campground_reviews(&mut context.ex().await, *campground.id()).await.unwrap();
        assert_eq!(vec![existing, review.clone()], reviews);
        assert_eq!(
            *campground.id(),
            db::get_review_owner(&mut context.ex().await, *review.id()).await.unwrap()
        );
    }

    #[tokio::test]
    async fn test_create_review_campground_not_found() {
        let context = TestContext::setup().await;

        assert_eq!(
            DriverError::NotFound("Campground not found".to_owned()),
            context
                .driver()
                .create_review(CampgroundId::new_random(), review_data("Lost", 3))
                .await
                .unwrap_err()
        );

        assert!(db::get_reviews(&mut context.ex().await).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_review_campground_not_found_rolls_back_before_returning() {
        let context = TestContext::setup().await;

        let campground = context.create_campground("c").await;
        let existing = context.create_review(*campground.id(), "Kept", 4).await;

        context
            .driver()
            .create_review(CampgroundId::new_random(), review_data("Lost", 3))
            .await
            .unwrap_err();

        let review = context
            .driver()
            .create_review(*campground.id(), review_data("After", 2))
            .await
            .unwrap();

        assert_eq!(
            vec![existing.clone(), review.clone()],
            db::get_reviews(&mut context.ex().await).await.unwrap()
        );
        assert_eq!(
            vec![existing, review],
            db::get_campground_reviews(&mut context.ex().await, *campground.id()).await.unwrap()
        );
    }

    #[tokio::test]
    async fn test_delete_review_ok() {
        let context = TestContext::setup().await;

        let campground = context.create_campground("c").await;
        let review1 = context.create_review(*campground.id(), "One", 1).await;
        let review2 = context.create_review(*campground.id(), "Two", 2).await;

        context.driver().delete_review(*campground.id(), *review1.id()).await.unwrap();

        let reviews =
            db::get_campground_reviews(&mut context.ex().await, *campground.id()).await.unwrap();
        assert_eq!(vec![review2.clone()], reviews);
        assert_eq!(vec![review2], db::get_reviews(&mut context.ex().await).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_review_not_attached() {
        let context = TestContext::setup().await;

        let campground = context.create_campground("c").await;
        let other = context.create_campground("o").await;
        let review = context.create_review(*other.id(), "Other", 4).await;

        assert_eq!(
            DriverError::NotFound("Review not found".to_owned()),
            context.driver().delete_review(*campground.id(), *review.id()).await.unwrap_err()
        );

        assert_eq!(review, db::get_review(&mut context.ex().await, *review.id()).await.unwrap());
        assert_eq!(
            *other.id(),
            db::get_review_owner(&mut context.ex().await, *review.id()).await.unwrap()
        );
    }

    #[tokio::test]
    async fn test_delete_review_dangling_reference() {
        let context = TestContext::setup().await;

        let campground = context.create_campground("c").await;
        let review = context.create_review(*campground.id(), "Gone", 4).await;
        db::delete_review(&mut context.ex().await, *review.id()).await.unwrap();

        context.driver().delete_review(*campground.id(), *review.id()).await.unwrap();

        assert_eq!(
            DbError::NotFound,
            db::get_review_owner(&mut context.ex().await, *review.id()).await.unwrap_err()
        );
    }
}
