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

//! API to update an existing board.

use crate::driver::Driver;
use crate::model::BoardInput;
use crate::rest::{board_location, parse_board_id};
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use iii_iv_core::rest::{RawJsonBody, RestError};

/// API handler.
///
/// The payload is only decoded once the board is known to exist, so a missing board is reported
/// as such even when the payload is malformed.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Path(id): Path<String>,
    body: RawJsonBody,
) -> Result<impl IntoResponse, RestError> {
    let id = parse_board_id(&id)?;
    driver.clone().get_board(id).await?;
    let input: BoardInput = body.decode()?;
    driver.update_board(id, input).await?;
    Ok((StatusCode::NO_CONTENT, [(header::LOCATION, board_location(id))]))
}
