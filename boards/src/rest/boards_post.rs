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

//! API to create a new board.

use crate::driver::Driver;
use crate::model::BoardInput;
use crate::rest::board_location;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use iii_iv_core::driver::DriverError;
use iii_iv_core::rest::{JsonBody, RestError};

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    JsonBody(input): JsonBody<BoardInput>,
) -> Result<impl IntoResponse, RestError> {
    let id = driver.create_board(input).await.map_err(|e| match e {
        DriverError::BackendError(msg) => RestError::UnprocessableEntity(msg),
        e => RestError::from(e),
    })?;
    Ok((StatusCode::CREATED, [(header::LOCATION, board_location(id))]))
}
