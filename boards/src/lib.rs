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

//! Bulletin board service exposing CRUD operations over REST.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use iii_iv_core::clocks::SystemClock;
use iii_iv_core::db::Db;
use iii_iv_core::env::get_optional_var;
use log::{info, warn};
use std::error::Error;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

pub mod db;
pub(crate) mod driver;
use driver::Driver;
pub(crate) mod model;
mod rest;
use rest::app;

/// Port to listen on when the configuration does not specify an address.
const DEFAULT_PORT: u16 = 9000;

/// Options to start the HTTP server.
#[derive(Debug, PartialEq)]
pub struct ServeOptions {
    /// Address to listen on.
    pub bind_addr: SocketAddr,
}

impl Default for ServeOptions {
    fn default() -> Self {
        Self { bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)) }
    }
}

impl ServeOptions {
    /// Initializes a set of options from environment variables whose name is prefixed with the
    /// given `prefix`.
    ///
    /// This will use variables such as `<prefix>_BIND_ADDR`, falling back to the defaults for
    /// the ones that are not set.
    pub fn from_env(prefix: &str) -> Result<ServeOptions, String> {
        let mut opts = ServeOptions::default();
        if let Some(bind_addr) = get_optional_var::<SocketAddr>(prefix, "BIND_ADDR")? {
            opts.bind_addr = bind_addr;
        }
        Ok(opts)
    }
}

/// Waits until the process receives a termination request.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown requested; draining in-flight requests"),
        Err(e) => warn!("Cannot listen for the shutdown signal: {}", e),
    }
}

/// Instantiates all resources to serve the application as configured by `opts`, storing data
/// in `db`.
///
/// While it'd be nice to push this responsibility to `main`, doing so would force us to expose many
/// crate-internal types to the public, which in turn would make dead code detection harder.
pub async fn serve(
    opts: ServeOptions,
    db: Arc<dyn Db + Send + Sync>,
) -> Result<(), Box<dyn Error>> {
    let driver = Driver::new(db.clone(), Arc::from(SystemClock::default()));
    let app = app(driver);

    let listener = tokio::net::TcpListener::bind(opts.bind_addr).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    db.close().await;
    Ok(())
}
