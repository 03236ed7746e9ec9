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

//! Database abstraction in terms of the operations needed by the server.

use crate::model::*;
use campgrounds_core::db::sqlite::{self, map_sqlx_error};
use campgrounds_core::db::{DbError, DbResult, Executor};
use futures::TryStreamExt;
use sqlx::Row;
use sqlx::sqlite::SqliteRow;


/// Initializes the database schema.
pub(crate) async fn init_schema(ex: &mut Executor) -> DbResult<()> {
    match ex {
        Executor::Sqlite(ex) => sqlite::run_schema(ex, include_str!("sqlite.sql")).await,
    }
}

impl TryFrom<SqliteRow> for Campground {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: String = row.try_get("id").map_err(map_sqlx_error)?;
        let title: String = row.try_get("title").map_err(map_sqlx_error)?;
        let location: String = row.try_get("location").map_err(map_sqlx_error)?;
        let price: f64 = row.try_get("price").map_err(map_sqlx_error)?;
        let description: String = row.try_get("description").map_err(map_sqlx_error)?;
        let image: String = row.try_get("image").map_err(map_sqlx_error)?;

        let data = CampgroundData::new(title, location, Price::new(price)?, description, image);
        Ok(Campground::new(CampgroundId::parse(&id)?, data))
    }
}

impl TryFrom<SqliteRow> for Review {
    type Error = DbError;

    fn try_from(row: SqliteRow) -> DbResult<Self> {
        let id: String = row.try_get("id").map_err(map_sqlx_error)?;
        let body: String = row.try_get("body").map_err(map_sqlx_error)?;
        let rating: i64 = row.try_get("rating").map_err(map_sqlx_error)?;

        Ok(Review::new(ReviewId::parse(&id)?, ReviewData::new(body, Rating::new(rating)?)))
    }
}

/// Checks that a statement that should have modified exactly one row did so.
fn expect_one_row(rows_affected: u64, what: &str) -> DbResult<()> {
    match rows_affected {
        0 => Err(DbError::NotFound),
        1 => Ok(()),
        _ => Err(DbError::BackendError(format!("{} affected more than one row", what))),
    }
}

/// Creates a new campground with the given `data` and returns it with its assigned identifier.
pub(crate) async fn create_campground(
    ex: &mut Executor,
    data: CampgroundData,
) -> DbResult<Campground> {
    let id = CampgroundId::new_random();

    let rows_affected = match ex {
        Executor::Sqlite(ex) => {
            let query_str = "
                INSERT INTO campgrounds (id, title, location, price, description, image)
                VALUES (?, ?, ?, ?, ?, ?)";
            let done = sqlx::query(query_str)
                .bind(id.to_string())
                .bind(data.title())
                .bind(data.location())
                .bind(data.price().as_f64())
                .bind(data.description())
                .bind(data.image())
                .execute(ex.conn())
                .await
                .map_err(map_sqlx_error)?;
            done.rows_affected()
        }
    };

    if rows_affected != 1 {
        return Err(DbError::BackendError("Insertion affected more than one row".to_owned()));
    }
    Ok(Campground::new(id, data))
}

/// Gets the campground identified by `id`.
pub(crate) async fn get_campground(ex: &mut Executor, id: CampgroundId) -> DbResult<Campground> {
    match ex {
        Executor::Sqlite(ex) => {
            let query_str = "SELECT * FROM campgrounds WHERE id = ?";
            let raw_campground = sqlx::query(query_str)
                .bind(id.to_string())
                .fetch_one(ex.conn())
                .await
                .map_err(map_sqlx_error)?;
            Campground::try_from(raw_campground)
        }
    }
}

/// Gets all campgrounds in creation order.
pub(crate) async fn get_campgrounds(ex: &mut Executor) -> DbResult<Vec<Campground>> {
    match ex {
        Executor::Sqlite(ex) => {
            let query_str = "SELECT * FROM campgrounds ORDER BY rowid";
            let mut rows = sqlx::query(query_str).fetch(ex.conn());

            let mut campgrounds = vec![];
            while let Some(row) = rows.try_next().await.map_err(map_sqlx_error)? {
                campgrounds.push(Campground::try_from(row)?);
            }
            Ok(campgrounds)
        }
    }
}

/// Gets the reviews attached to the campground `id`, in the order in which they were attached.
///
/// References to reviews that do not exist any longer are skipped.
pub(crate) async fn get_campground_reviews(
    ex: &mut Executor,
    id: CampgroundId,
) -> DbResult<Vec<Review>> {
    match ex {
        Executor::Sqlite(ex) => {
            let query_str = "
                SELECT reviews.*
                FROM campground_reviews
                    JOIN reviews ON campground_reviews.review_id = reviews.id
                WHERE campground_reviews.campground_id = ?
                ORDER BY campground_reviews.rowid";
            let mut rows = sqlx::query(query_str).bind(id.to_string()).fetch(ex.conn());

            let mut reviews = vec![];
            while let Some(row) = rows.try_next().await.map_err(map_sqlx_error)? {
                reviews.push(Review::try_from(row)?);
            }
            Ok(reviews)
        }
    }
}

/// Replaces all fields of the existing campground `id` with `data`.
pub(crate) async fn update_campground(
    ex: &mut Executor,
    id: CampgroundId,
    data: CampgroundData,
) -> DbResult<Campground> {
    let rows_affected = match ex {
        Executor::Sqlite(ex) => {
            let query_str = "
                UPDATE campgrounds
                SET title = ?, location = ?, price = ?, description = ?, image = ?
                WHERE id = ?";
            let done = sqlx::query(query_str)
                .bind(data.title())
                .bind(data.location())
                .bind(data.price().as_f64())
                .bind(data.description())
                .bind(data.image())
                .bind(id.to_string())
                .execute(ex.conn())
                .await
                .map_err(map_sqlx_error)?;
            done.rows_affected()
        }
    };

    expect_one_row(rows_affected, "Update")?;
    Ok(Campground::new(id, data))
}

/// Deletes the campground `id` and its list of review references.
///
/// The referenced reviews are left untouched.  This issues more than one statement so callers
/// should run it inside a transaction.
pub(crate) async fn delete_campground(ex: &mut Executor, id: CampgroundId) -> DbResult<()> {
    let rows_affected = match ex {
        Executor::Sqlite(ex) => {
            let query_str = "DELETE FROM campground_reviews WHERE campground_id = ?";
            sqlx::query(query_str)
                .bind(id.to_string())
                .execute(ex.conn())
                .await
                .map_err(map_sqlx_error)?;

            let query_str = "DELETE FROM campgrounds WHERE id = ?";
            let done = sqlx::query(query_str)
                .bind(id.to_string())
                .execute(ex.conn())
                .await
                .map_err(map_sqlx_error)?;
            done.rows_affected()
        }
    };

    expect_one_row(rows_affected, "Deletion")
}

/// Creates a new review with the given `data` and returns it with its assigned identifier.
///
/// The new review is not attached to any campground.
pub(crate) async fn create_review(ex: &mut Executor, data: ReviewData) -> DbResult<Review> {
    let id = ReviewId::new_random();

    let rows_affected = match ex {
        Executor::Sqlite(ex) => {
            let query_str = "INSERT INTO reviews (id, body, rating) VALUES (?, ?, ?)";
            let done = sqlx::query(query_str)
                .bind(id.to_string())
                .bind(data.body())
                .bind(data.rating().as_i64())
                .execute(ex.conn())
                .await
                .map_err(map_sqlx_error)?;
            done.rows_affected()
        }
    };

    if rows_affected != 1 {
        return Err(DbError::BackendError("Insertion affected more than one row".to_owned()));
    }
    Ok(Review::new(id, data))
}

/// Gets the review identified by `id`.
pub(crate) async fn get_review(ex: &mut Executor, id: ReviewId) -> DbResult<Review> {
    match ex {
        Executor::Sqlite(ex) => {
            let query_str = "SELECT * FROM reviews WHERE id = ?";
            let raw_review = sqlx::query(query_str)
                .bind(id.to_string())
                .fetch_one(ex.conn())
                .await
                .map_err(map_sqlx_error)?;
            Review::try_from(raw_review)
        }
    }
}

/// Gets all reviews in creation order, including those not attached to any campground.
pub(crate) async fn get_reviews(ex: &mut Executor) -> DbResult<Vec<Review>> {
    match ex {
        Executor::Sqlite(ex) => {
            let query_str = "SELECT * FROM reviews ORDER BY rowid";
            let mut rows = sqlx::query(query_str).fetch(ex.conn());

            let mut reviews = vec![];
            while let Some(row) = rows.try_next().await.map_err(map_sqlx_error)? {
                reviews.push(Review::try_from(row)?);
            }
            Ok(reviews)
        }
    }
}

/// Deletes the review `id`.  References to it, if any, are not touched.
pub(crate) async fn delete_review(ex: &mut Executor, id: ReviewId) -> DbResult<()> {
    let rows_affected = match ex {
        Executor::Sqlite(ex) => {
            let query_str = "DELETE FROM reviews WHERE id = ?";
            let done = sqlx::query(query_str)
                .bind(id.to_string())
                .execute(ex.conn())
                .await
                .map_err(map_sqlx_error)?;
            done.rows_affected()
        }
    };

    expect_one_row(rows_affected, "Deletion")
}

/// Appends the review `review_id` to the list of reviews of the campground `campground_id`.
pub(crate) async fn attach_review(
    ex: &mut Executor,
    campground_id: CampgroundId,
    review_id: ReviewId,
) -> DbResult<()> {
    let rows_affected = match ex {
        Executor::Sqlite(ex) => {
            let query_str =
                "INSERT INTO campground_reviews (campground_id, review_id) VALUES (?, ?)";
            let done = sqlx::query(query_str)
                .bind(campground_id.to_string())
                .bind(review_id.to_string())
                .execute(ex.conn())
                .await
                .map_err(map_sqlx_error)?;
            done.rows_affected()
        }
    };

    if rows_affected != 1 {
        return Err(DbError::BackendError("Insertion affected more than one row".to_owned()));
    }
    Ok(())
}

/// Removes the review `review_id` from the list of reviews of the campground `campground_id`.
///
/// Fails with `NotFound` if the review was not in the list.
pub(crate) async fn detach_review(
    ex: &mut Executor,
    campground_id: CampgroundId,
    review_id: ReviewId,
) -> DbResult<()> {
    let rows_affected = match ex {
        Executor::Sqlite(ex) => {
            let query_str =
                "DELETE FROM campground_reviews WHERE campground_id = ? AND review_id = ?";
            let done = sqlx::query(query_str)
                .bind(campground_id.to_string())
                .bind(review_id.to_string())
                .execute(ex.conn())
                .await
                .map_err(map_sqlx_error)?;
            done.rows_affected()
        }
    };

    expect_one_row(rows_affected, "Detach")
}

/// Gets the identifier of the campground that references the review `review_id`.
///
/// Fails with `NotFound` if the review is not attached to any campground.
pub(crate) async fn get_review_owner(
    ex: &mut Executor,
    review_id: ReviewId,
) -> DbResult<CampgroundId> {
    match ex {
        Executor::Sqlite(ex) => {
            let query_str = "SELECT campground_id FROM campground_reviews WHERE review_id = ?";
            let row = sqlx::query(query_str)
                .bind(review_id.to_string())
                .fetch_one(ex.conn())
                .await
                .map_err(map_sqlx_error)?;
            let campground_id: String = row.try_get("campground_id").map_err(map_sqlx_error)?;
            Ok(CampgroundId::parse(&campground_id)?)
        }
    }
}
