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

//! Server-rendered web application to list campgrounds and their reviews.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use campgrounds_core::db::Db;
use campgrounds_core::db::sqlite;
use campgrounds_core::env::get_optional_var;
use log::{info, warn};
use std::error::Error;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

mod db;
mod driver;
use driver::Driver;
mod model;
mod rest;
use rest::app;
mod views;

/// Default value for the `PORT` setting when not specified.
const DEFAULT_PORT: u16 = 3000;

/// Default value for the `DB_URL` setting when not specified.
const DEFAULT_DB_URL: &str = "sqlite://yelp-camp.db?mode=rwc";

/// Configuration options for the server.
#[derive(Clone, Debug, PartialEq)]
pub struct ServeOptions {
    /// Port to listen on.
    pub port: u16,

    /// Connection string for the SQLite database.
    pub db_url: String,

    /// Whether to listen on all interfaces instead of only on the loopback one.
    pub bind_all: bool,
}

impl Default for ServeOptions {
    fn default() -> Self {
        Self { port: DEFAULT_PORT, db_url: DEFAULT_DB_URL.to_owned(), bind_all: false }
    }
}

impl ServeOptions {
    /// Initializes a set of options from environment variables whose name is prefixed with the
    /// given `prefix`.
    ///
    /// This will use variables such as `<prefix>_PORT`, `<prefix>_DB_URL` and
    /// `<prefix>_BIND_ALL`, all of which are optional.
    pub fn from_env(prefix: &str) -> Result<Self, String> {
        Ok(Self {
            port: get_optional_var::<u16>(prefix, "PORT")?.unwrap_or(DEFAULT_PORT),
            db_url: get_optional_var::<String>(prefix, "DB_URL")?
                .unwrap_or_else(|| DEFAULT_DB_URL.to_owned()),
            bind_all: get_optional_var::<bool>(prefix, "BIND_ALL")?.unwrap_or(false),
        })
    }

    /// Returns the address to bind the server to.
    fn bind_addr(&self) -> SocketAddr {
        let ip = if self.bind_all { Ipv4Addr::UNSPECIFIED } else { Ipv4Addr::LOCALHOST };
        SocketAddr::from((ip, self.port))
    }
}

/// Waits until the process is asked to terminate.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received interrupt; shutting down"),
        Err(e) => warn!("Failed to wait for interrupt; shutting down: {}", e),
    }
}

/// Instantiates all resources to serve the application as configured by `opts`.
///
/// While it'd be nice to push this responsibility to `main`, doing so would force us to expose many
/// crate-internal types to the public, which in turn would make dead code detection harder.
pub async fn serve(opts: ServeOptions) -> Result<(), Box<dyn Error>> {
    let db = Arc::new(sqlite::connect(&opts.db_url).await?);
    db::init_schema(&mut db.ex().await?).await?;

    let driver = Driver::new(db.clone());
    let app = app(driver);

    let bind_addr = opts.bind_addr();
    let result = match tokio::net::TcpListener::bind(bind_addr).await {
        Ok(listener) => {
            info!("Listening on {}", bind_addr);
            axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await
        }
        Err(e) => Err(e),
    };

    db.close().await;
    Ok(result?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_options_from_env_defaults() {
        let overrides = [
            ("CAMPGROUNDS_PORT", None::<&str>),
            ("CAMPGROUNDS_DB_URL", None),
            ("CAMPGROUNDS_BIND_ALL", None),
        ];
        temp_env::with_vars(overrides, || {
            let opts = ServeOptions::from_env("CAMPGROUNDS").unwrap();
            assert_eq!(ServeOptions::default(), opts);
            assert_eq!(SocketAddr::from((Ipv4Addr::LOCALHOST, 3000)), opts.bind_addr());
        });
    }

    #[test]
    fn test_serve_options_from_env_all_present() {
        let overrides = [
            ("CAMPGROUNDS_PORT", Some("8080")),
            ("CAMPGROUNDS_DB_URL", Some(":memory:")),
            ("CAMPGROUNDS_BIND_ALL", Some("true")),
        ];
        temp_env::with_vars(overrides, || {
            let opts = ServeOptions::from_env("CAMPGROUNDS").unwrap();
            assert_eq!(
                ServeOptions { port: 8080, db_url: ":memory:".to_owned(), bind_all: true },
                opts
            );
            assert_eq!(SocketAddr::from((Ipv4Addr::UNSPECIFIED, 8080)), opts.bind_addr());
        });
    }

    #[test]
    fn test_serve_options_from_env_bad_port() {
        temp_env::with_var("CAMPGROUNDS_PORT", Some("http"), || {
            let err = ServeOptions::from_env("CAMPGROUNDS").unwrap_err();
            assert!(err.contains("CAMPGROUNDS_PORT"));
        });
    }

    #[test]
    fn test_serve_options_from_env_bad_bind_all() {
        temp_env::with_var("CAMPGROUNDS_BIND_ALL", Some("yes"), || {
            let err = ServeOptions::from_env("CAMPGROUNDS").unwrap_err();
            assert!(err.contains("CAMPGROUNDS_BIND_ALL"));
        });
    }

    #[tokio::test]
    async fn test_serve_bad_database() {
        let opts = ServeOptions {
            db_url: "sqlite:///this/directory/does/not/exist/db.sqlite?mode=ro".to_owned(),
            ..Default::default()
        };
        serve(opts).await.unwrap_err();
    }
}
