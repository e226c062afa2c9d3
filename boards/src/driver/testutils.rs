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

//! Test utilities for the business layer.

use crate::db;
use crate::driver::Driver;
use crate::model::testutils::fields;
use crate::model::*;
use iii_iv_core::clocks::testutils::SettableClock;
use iii_iv_core::clocks::Clock;
use iii_iv_core::db::{Db, Executor};
use std::sync::Arc;
use time::macros::datetime;

/// State of a running test.
pub(crate) struct TestContext {
    /// The database the driver is backed by.
    db: Arc<dyn Db + Send + Sync>,

    /// The clock the driver uses, which tests can tweak at will.
    clock: Arc<SettableClock>,

    /// The driver under test.
    driver: Driver,
}

impl TestContext {
    /// Initializes the driver against an in-memory database with a fake clock.
    pub(crate) async fn setup() -> Self {
        let db = Arc::from(iii_iv_core::db::sqlite::testutils::setup().await);
        db::init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        let clock = Arc::from(SettableClock::new(datetime!(2024-02-03 04:05:06 UTC)));
        let driver = Driver::new(db.clone(), clock.clone());
        Self { db, clock, driver }
    }

    /// Obtains a direct executor against the database.
    pub(crate) async fn ex(&self) -> Executor {
        self.db.ex().await.unwrap()
    }

    /// Returns the fake clock.
    pub(crate) fn clock(&self) -> &SettableClock {
        &self.clock
    }

    /// Returns a copy of the driver.
    pub(crate) fn driver(&self) -> Driver {
        self.driver.clone()
    }

    /// Stores a new board directly in the database, timestamped with the current fake time.
    pub(crate) async fn create_board(&self, title: &str, name: &str, plain_text: &str) -> BoardId {
        let now = self.clock.now_utc();
        db::create_board(&mut self.ex().await, &fields(title, name, plain_text), now)
            .await
            .unwrap()
    }
}
