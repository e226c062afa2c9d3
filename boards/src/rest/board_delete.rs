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

//! API to delete a board.

use crate::driver::Driver;
use crate::rest::parse_board_id;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use iii_iv_core::rest::{EmptyBody, RestError};

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Path(id): Path<String>,
    _: EmptyBody,
) -> Result<StatusCode, RestError> {
    let id = parse_board_id(&id)?;
    driver.delete_board(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::testutils::*;
    use axum::http;
    use iii_iv_core::clocks::Clock;
    use iii_iv_core::rest::testutils::*;
    use std::time::Duration;

    fn route(id: &str) -> (http::Method, String) {
        (http::Method::DELETE, format!("/boards/{}", id))
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;

        let id = context.create_board("Title", "Alice", "Text").await;
        context.clock().advance(Duration::from_secs(30));

        OneShotBuilder::new(context.app(), route(&id.to_string()))
            .send_empty()
            .await
            .expect_status(http::StatusCode::NO_CONTENT)
            .expect_empty()
            .await;

        let board = context.get_board_with_deleted(id).await;
        assert_eq!(Some(context.clock().now_utc()), *board.deleted_at());
        assert_eq!("Title", board.fields().title());
    }

    #[tokio::test]
    async fn test_twice() {
        let context = TestContext::setup().await;

        let id = context.create_board("Title", "Alice", "Text").await;

        OneShotBuilder::new(context.app(), route(&id.to_string()))
            .send_empty()
            .await
            .expect_status(http::StatusCode::NO_CONTENT)
            .expect_empty()
            .await;

        OneShotBuilder::new(context.app(), route(&id.to_string()))
            .send_empty()
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error("not found")
            .await;
    }

    #[tokio::test]
    async fn test_others_untouched() {
        let context = TestContext::setup().await;

        let id1 = context.create_board("One", "Alice", "Text").await;
        let id2 = context.create_board("Two", "Alice", "Text").await;

        OneShotBuilder::new(context.app(), route(&id1.to_string()))
            .send_empty()
            .await
            .expect_status(http::StatusCode::NO_CONTENT)
            .expect_empty()
            .await;

        assert_eq!(None, *context.get_board_with_deleted(id2).await.deleted_at());
        assert_eq!(1, context.count_boards().await);
    }

    #[tokio::test]
    async fn test_not_found() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), route("7"))
            .send_empty()
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error("Entity not found")
            .await;
    }

    #[tokio::test]
    async fn test_invalid_id() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), route("1.5"))
            .send_empty()
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error("Invalid board id '1.5'")
            .await;
    }

    test_payload_must_be_empty!(TestContext::setup().await.into_app(), route("1"));
}
