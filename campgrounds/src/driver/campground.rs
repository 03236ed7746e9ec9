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

//! Operations on one campground.

use crate::db;
use crate::driver::{Driver, or_not_found};
use crate::model::*;
use campgrounds_core::driver::DriverResult;
use log::info;

impl Driver {
    /// Gets the campground `id` without its reviews.
    pub(crate) async fn get_campground(self, id: CampgroundId) -> DriverResult<Campground> {
        or_not_found(db::get_campground(&mut self.db.ex().await?, id).await, "Campground")
    }

    /// Gets the campground `id` along with all of its reviews, in the order in which they were
    /// posted.
    pub(crate) async fn get_campground_with_reviews(
        self,
        id: CampgroundId,
    ) -> DriverResult<(Campground, Vec<Review>)> {
        let mut tx = self.db.begin().await?;
        let campground = or_not_found(db::get_campground(tx.ex(), id).await, "Campground")?;
        let reviews = db::get_campground_reviews(tx.ex(), id).await?;
        tx.commit().await?;
        Ok((campground, reviews))
    }

    /// Replaces the contents of the existing campground `id` with `data`.
    pub(crate) async fn update_campground(
        self,
        id: CampgroundId,
        data: CampgroundData,
    ) -> DriverResult<Campground> {
        let mut tx = self.db.begin().await?;
        let campground =
            or_not_found(db::update_campground(tx.ex(), id, data).await, "Campground")?;
        tx.commit().await?;
        Ok(campground)
    }

    /// Deletes the campground `id`.  Its reviews are left behind without an owner.
    pub(crate) async fn delete_campground(self, id: CampgroundId) -> DriverResult<()> {
        let mut tx = self.db.begin().await?;
        or_not_found(db::delete_campground(tx.ex(), id).await, "Campground")?;
        tx.commit().await?;
        info!("Deleted campground {}", id);
        Ok(())
    }
}
