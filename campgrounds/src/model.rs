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

//! High-level data types.

use campgrounds_core::model::{ModelError, ModelResult};
use campgrounds_core::validation::{FieldKind, FieldRule, Record, Schema, Validate};
use derive_getters::Getters;
use derive_more::{Constructor, Display};
use uuid::Uuid;

/// Parses a textual identifier of an entity named `what`.
fn parse_uuid(what: &str, s: &str) -> ModelResult<Uuid> {
    Uuid::parse_str(s).map_err(|e| ModelError(format!("Invalid {} id '{}': {}", what, s, e)))
}

/// Opaque identifier of a campground.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) struct CampgroundId(Uuid);

impl CampgroundId {
    /// Generates a new random identifier.
    pub(crate) fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses an identifier from its textual representation, as found in URLs and the database.
    pub(crate) fn parse(s: &str) -> ModelResult<Self> {
        parse_uuid("campground", s).map(Self)
    }
}

/// Opaque identifier of a review.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) struct ReviewId(Uuid);

impl ReviewId {
    /// Generates a new random identifier.
    pub(crate) fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses an identifier from its textual representation, as found in URLs and the database.
    pub(crate) fn parse(s: &str) -> ModelResult<Self> {
        parse_uuid("review", s).map(Self)
    }
}

/// Nightly price of a campground.  Guaranteed to be finite and non-negative.
#[derive(Clone, Copy, Debug, Display, PartialEq, PartialOrd)]
pub(crate) struct Price(f64);

impl Price {
    /// Creates a new price after validating that `value` is acceptable.
    pub(crate) fn new(value: f64) -> ModelResult<Self> {
        if !value.is_finite() || value < 0.0 {
            return Err(ModelError(format!("Invalid price {}", value)));
        }
        Ok(Self(value))
    }

    /// Returns the price as a float.
    pub(crate) fn as_f64(&self) -> f64 {
        self.0
    }
}

/// Minimum rating a review can give.
const MIN_RATING: i64 = 1;

/// Maximum rating a review can give.
const MAX_RATING: i64 = 5;

/// Score given by a review.  Guaranteed to be in the `[MIN_RATING, MAX_RATING]` range.
#[derive(Clone, Copy, Debug, Display, Eq, Ord, PartialEq, PartialOrd)]
pub(crate) struct Rating(u8);

impl Rating {
    /// Creates a new rating after validating that `value` is in range.
    pub(crate) fn new(value: i64) -> ModelResult<Self> {
        if !(MIN_RATING..=MAX_RATING).contains(&value) {
            return Err(ModelError(format!(
                "Rating {} out of range [{}, {}]",
                value, MIN_RATING, MAX_RATING
            )));
        }
        Ok(Self(value as u8))
    }

    /// Returns the rating as an integer.
    pub(crate) fn as_i64(&self) -> i64 {
        i64::from(self.0)
    }
}

/// User-provided contents of a campground.
#[derive(Clone, Constructor, Debug, Getters, PartialEq)]
pub(crate) struct CampgroundData {
    /// Name of the campground.
    title: String,

    /// Free-form location of the campground.
    location: String,

    /// Nightly price.
    price: Price,

    /// Free-form description.
    description: String,

    /// URL of a picture of the campground.
    image: String,
}

impl Validate for CampgroundData {
    const SCHEMA: Schema = Schema {
        entity: "campground",
        fields: &[
            FieldRule::required("title", FieldKind::Text),
            FieldRule::required("price", FieldKind::Number { min: Some(0.0), max: None }),
            FieldRule::required("image", FieldKind::Text),
            FieldRule::required("location", FieldKind::Text),
            FieldRule::required("description", FieldKind::Text),
        ],
    };

    fn from_record(mut record: Record) -> ModelResult<Self> {
        Ok(Self {
            title: record.take_text("title")?,
            location: record.take_text("location")?,
            price: Price::new(record.take_number("price")?)?,
            description: record.take_text("description")?,
            image: record.take_text("image")?,
        })
    }
}

/// A persisted campground.
#[derive(Clone, Constructor, Debug, Getters, PartialEq)]
pub(crate) struct Campground {
    /// Identifier of the campground.
    id: CampgroundId,

    /// Contents of the campground.
    data: CampgroundData,
}

/// User-provided contents of a review.
#[derive(Clone, Constructor, Debug, Getters, PartialEq)]
pub(crate) struct ReviewData {
    /// Text of the review.
    body: String,

    /// Score given to the campground.
    rating: Rating,
}

impl Validate for ReviewData {
    const SCHEMA: Schema = Schema {
        entity: "review",
        fields: &[
            FieldRule::required("body", FieldKind::Text),
            FieldRule::required(
                "rating",
                FieldKind::Integer { min: Some(MIN_RATING), max: Some(MAX_RATING) },
            ),
        ],
    };

    fn from_record(mut record: Record) -> ModelResult<Self> {
        let body = record.take_text("body")?;
        let rating = Rating::new(record.take_integer("rating")?)?;
        Ok(Self { body, rating })
    }
}

/// A persisted review.
#[derive(Clone, Constructor, Debug, Getters, PartialEq)]
pub(crate) struct Review {
    /// Identifier of the review.
    id: ReviewId,

    /// Contents of the review.
    data: ReviewData,
}
