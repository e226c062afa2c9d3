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

//! Test utilities for the REST API.

use crate::db;
use crate::driver::testutils::TestContext as DriverTestContext;
use crate::model::*;
use crate::rest::app;
use axum::Router;
use iii_iv_core::clocks::testutils::SettableClock;
use iii_iv_core::clocks::Clock;

/// State of a running test, with direct access to the database behind the app.
pub(crate) struct TestContext {
    /// Context of the driver backing the app.
    inner: DriverTestContext,

    /// The app under test.
    app: Router,
}

impl TestContext {
    /// Initializes the app against an in-memory database with a fake clock.
    pub(crate) async fn setup() -> Self {
        let inner = DriverTestContext::setup().await;
        let app = app(inner.driver());
        Self { inner, app }
    }

    /// Returns a copy of the app router.
    pub(crate) fn app(&self) -> Router {
        self.app.clone()
    }

    /// Consumes the context and returns the app router.
    pub(crate) fn into_app(self) -> Router {
        self.app
    }

    /// Returns the fake clock.
    pub(crate) fn clock(&self) -> &SettableClock {
        self.inner.clock()
    }

    /// Stores a new board directly in the database.
    pub(crate) async fn create_board(&self, title: &str, name: &str, plain_text: &str) -> BoardId {
        self.inner.create_board(title, name, plain_text).await
    }

    /// Marks board `id` as deleted directly in the database.
    pub(crate) async fn delete_board(&self, id: BoardId) {
        let now = self.inner.clock().now_utc();
        db::delete_board(&mut self.inner.ex().await, id, now).await.unwrap();
    }

    /// Fetches board `id` directly from the database, even if it was deleted.
    pub(crate) async fn get_board_with_deleted(&self, id: BoardId) -> Board {
        db::get_board_with_deleted(&mut self.inner.ex().await, id).await.unwrap()
    }

    /// Counts the active boards in the database.
    pub(crate) async fn count_boards(&self) -> usize {
        db::find_boards(&mut self.inner.ex().await, &BoardQuery::default()).await.unwrap().len()
    }
}
