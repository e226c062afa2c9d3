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

//! Operations on one board.

use crate::db;
use crate::driver::Driver;
use crate::model::*;
use iii_iv_core::clocks::Clock;
use iii_iv_core::driver::DriverResult;

impl Driver {
    /// Gets the active board identified by `id`.
    pub(crate) async fn get_board(self, id: BoardId) -> DriverResult<Board> {
        let board = db::get_board(&mut self.db.ex().await?, id).await?;
        Ok(board)
    }

    /// Overlays the fields present in `input` onto the active board `id`.
    pub(crate) async fn update_board(self, id: BoardId, input: BoardInput) -> DriverResult<()> {
        let mut tx = self.db.begin().await?;
        let board = db::get_board(tx.ex(), id).await?;
        let fields = input.merge_into(board.fields().clone())?;
        let board = board.with_fields(fields, self.clock.now_utc());
        db::save_board(tx.ex(), &board).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Marks the active board `id` as deleted.
    pub(crate) async fn delete_board(self, id: BoardId) -> DriverResult<()> {
        let now = self.clock.now_utc();
        db::delete_board(&mut self.db.ex().await?, id, now).await?;
        Ok(())
    }
}
