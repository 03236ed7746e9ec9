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

//! Operations on the collection of campgrounds.

use crate::db;
use crate::driver::Driver;
use crate::model::*;
use campgrounds_core::driver::DriverResult;
use log::info;

impl Driver {
    /// Gets all campgrounds in creation order.
    pub(crate) async fn get_campgrounds(self) -> DriverResult<Vec<Campground>> {
        let campgrounds = db::get_campgrounds(&mut self.db.ex().await?).await?;
        Ok(campgrounds)
    }

    /// Creates a new campground with `data`.
    pub(crate) async fn create_campground(self, data: CampgroundData) -> DriverResult<Campground> {
        let mut tx = self.db.begin().await?;
        let campground = db::create_campground(tx.ex(), data).await?;
        tx.commit().await?;
        info!("Created campground {}", campground.id());
        Ok(campground)
    }
}
