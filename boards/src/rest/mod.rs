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

//! Entry point to the REST server.

use crate::driver::Driver;
use crate::model::BoardId;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, MethodRouter};
use axum::Router;
use iii_iv_core::rest::{RestError, RestResult};
use log::info;
use std::collections::HashSet;
use std::str::FromStr;

mod board_delete;
mod board_get;
mod board_patch;
mod boards_get;
mod boards_post;
mod root_get;
#[cfg(test)]
mod testutils;

/// Converts the raw `id` path component into a board identifier.
///
/// An identifier that does not parse cannot match any board, so this reports it as not found.
fn parse_board_id(id: &str) -> RestResult<BoardId> {
    BoardId::from_str(id).map_err(|e| RestError::NotFound(e.to_string()))
}

/// Returns the path of the API to access board `id`.
fn board_location(id: BoardId) -> String {
    format!("/boards/{}", id)
}

/// Formats the access log entry for `request`.
fn access_line(request: &Request) -> String {
    format!("[{}] {}", request.method(), request.uri().path())
}

/// Middleware that logs every request before handing it to the router.
async fn access_log(request: Request, next: Next) -> Response {
    info!("{}", access_line(&request));
    next.run(request).await
}

/// Returns the list of APIs served by the application.
fn routes() -> Vec<(&'static str, MethodRouter<Driver>)> {
    vec![
        ("/", get(root_get::handler)),
        ("/boards", get(boards_get::handler).post(boards_post::handler)),
        (
            "/boards/:id",
            get(board_get::handler).patch(board_patch::handler).delete(board_delete::handler),
        ),
    ]
}

/// Builds a router out of the `routes` list, panicking if a path is registered more than once.
fn build_router(routes: Vec<(&'static str, MethodRouter<Driver>)>) -> Router<Driver> {
    let mut seen = HashSet::new();
    let mut router = Router::new();
    for (path, method_router) in routes {
        assert!(seen.insert(path), "Path {} registered more than once", path);
        router = router.route(path, method_router);
    }
    router
}

/// Creates the router for the application.
pub(crate) fn app(driver: Driver) -> Router {
    build_router(routes())
        .fallback(|| async { StatusCode::NOT_FOUND })
        .layer(middleware::from_fn(access_log))
        .with_state(driver)
}
