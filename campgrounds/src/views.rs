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

//! HTML views of the service.
//!
//! Every page is built by rendering a named template with its values and then embedding the
//! result in the `layout` template.  All user-provided data is escaped before rendering.

use crate::model::{Campground, Review};
use axum::http::StatusCode;
use axum::response::Html;
use campgrounds_core::rest::{RestError, RestResult};
use campgrounds_core::template::{self, escape};
use log::error;

/// Templates known to the renderer, indexed by name.
const TEMPLATES: &[(&str, &str)] = &[
    ("campground_item", include_str!("../templates/campground_item.html")),
    ("edit", include_str!("../templates/edit.html")),
    ("error", include_str!("../templates/error.html")),
    ("home", include_str!("../templates/home.html")),
    ("index", include_str!("../templates/index.html")),
    ("layout", include_str!("../templates/layout.html")),
    ("new", include_str!("../templates/new.html")),
    ("review_item", include_str!("../templates/review_item.html")),
    ("show", include_str!("../templates/show.html")),
];

/// Renders the template `name` with the values in `context`.
///
/// Values are inserted as is, so they must have been escaped already.
pub(crate) fn render(name: &str, context: &[(&'static str, &str)]) -> RestResult<String> {
    let template = TEMPLATES
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, template)| *template)
        .ok_or_else(|| RestError::InternalError(format!("Unknown template {}", name)))?;
    Ok(template::apply(template, context)?)
}

/// Renders the page `name` with the values in `context` and wraps it in the layout.
fn page(title: &str, name: &str, context: &[(&'static str, &str)]) -> RestResult<Html<String>> {
    let body = render(name, context)?;
    let html = render("layout", &[("title", &escape(title)), ("body", &body)])?;
    Ok(Html(html))
}

/// Renders the landing page.
pub(crate) fn home() -> RestResult<Html<String>> {
    page("Home", "home", &[])
}

/// Renders the list of all `campgrounds`.
pub(crate) fn index(campgrounds: &[Campground]) -> RestResult<Html<String>> {
    let mut items = String::new();
    for campground in campgrounds {
        let data = campground.data();
        items.push_str(&render(
            "campground_item",
            &[
                ("id", &campground.id().to_string()),
                ("title", &escape(data.title())),
                ("location", &escape(data.location())),
                ("description", &escape(data.description())),
                ("image", &escape(data.image())),
            ],
        )?);
    }
    page("All Campgrounds", "index", &[("campgrounds", &items)])
}

/// Renders the form to create a new campground.
pub(crate) fn new_campground() -> RestResult<Html<String>> {
    page("New Campground", "new", &[])
}

/// Renders the details of a `campground` and its `reviews`.
pub(crate) fn show(campground: &Campground, reviews: &[Review]) -> RestResult<Html<String>> {
    let id = campground.id().to_string();

    let mut items = String::new();
    for review in reviews {
        items.push_str(&render(
            "review_item",
            &[
                ("campground_id", &id),
                ("id", &review.id().to_string()),
                ("rating", &review.data().rating().to_string()),
                ("body", &escape(review.data().body())),
            ],
        )?);
    }

    let data = campground.data();
    page(
        data.title(),
        "show",
        &[
            ("id", &id),
            ("title", &escape(data.title())),
            ("location", &escape(data.location())),
            ("price", &format!("{:.2}", data.price().as_f64())),
            ("description", &escape(data.description())),
            ("image", &escape(data.image())),
            ("reviews", &items),
        ],
    )
}

/// Renders the form to edit an existing `campground`.
pub(crate) fn edit(campground: &Campground) -> RestResult<Html<String>> {
    let data = campground.data();
    page(
        "Edit Campground",
        "edit",
        &[
            ("id", &campground.id().to_string()),
            ("title", &escape(data.title())),
            ("location", &escape(data.location())),
            ("price", &data.price().to_string()),
            ("description", &escape(data.description())),
            ("image", &escape(data.image())),
        ],
    )
}

/// Renders the error page for a request that failed with `status` and `message`.
///
/// This never fails: if the templates cannot be rendered, a bare page with the escaped message is
/// returned instead.
pub(crate) fn error_page(status: StatusCode, message: &str) -> String {
    let context = [("message", escape(message)), ("status", status.as_u16().to_string())];
    let context = context.iter().map(|(k, v)| (*k, v.as_str())).collect::<Vec<_>>();
    match page("Error", "error", &context) {
        Ok(Html(html)) => html,
        Err(e) => {
            error!("Failed to render error page: {}", e);
            format!("<h1>{}</h1>", escape(message))
        }
    }
}
