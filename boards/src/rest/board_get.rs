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

//! API to fetch a single board.

use crate::driver::Driver;
use crate::model::BoardDetails;
use crate::rest::parse_board_id;
use axum::extract::{Path, State};
use axum::Json;
use iii_iv_core::rest::{EmptyBody, RestError};

/// API handler.
pub(crate) async fn handler(
    State(driver): State<Driver>,
    Path(id): Path<String>,
    _: EmptyBody,
) -> Result<Json<BoardDetails>, RestError> {
    let id = parse_board_id(&id)?;
    let board = driver.get_board(id).await?;
    Ok(Json(board.to_details()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::*;
    use crate::rest::testutils::*;
    use axum::http;
    use iii_iv_core::rest::testutils::*;

    fn route(id: &str) -> (http::Method, String) {
        (http::Method::GET, format!("/boards/{}", id))
    }

    #[tokio::test]
    async fn test_ok() {
        let context = TestContext::setup().await;

        let id = context.create_board("The title", "Alice", "Some text").await;

        let response = OneShotBuilder::new(context.app(), route(&id.to_string()))
            .send_empty()
            .await
            .expect_json::<BoardDetails>()
            .await;
        let exp_response = context.get_board_with_deleted(id).await.to_details();
        assert_eq!(exp_response, response);
        assert_eq!("The title", response.title);
        assert_eq!("<p>content</p>", response.content);
        assert_eq!("Some text", response.plain_text);
        assert_eq!(None, response.deleted_at);
    }

    #[tokio::test]
    async fn test_password_not_exposed() {
        let context = TestContext::setup().await;

        let id = context.create_board("The title", "Alice", "Some text").await;

        let response = OneShotBuilder::new(context.app(), route(&id.to_string()))
            .send_empty()
            .await
            .take_response()
            .await;
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024).await.unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(!body.contains("pwd"));
        assert!(!body.contains("precomputed"));
    }

    #[tokio::test]
    async fn test_not_found() {
        let context = TestContext::setup().await;

        context.create_board("The title", "Alice", "Some text").await;

        OneShotBuilder::new(context.app(), route("2"))
            .send_empty()
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error("Entity not found")
            .await;
    }

    #[tokio::test]
    async fn test_deleted() {
        let context = TestContext::setup().await;

        let id = context.create_board("The title", "Alice", "Some text").await;
        context.delete_board(id).await;

        OneShotBuilder::new(context.app(), route(&id.to_string()))
            .send_empty()
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error("not found")
            .await;
    }

    #[tokio::test]
    async fn test_invalid_id() {
        let context = TestContext::setup().await;

        OneShotBuilder::new(context.app(), route("abc"))
            .send_empty()
            .await
            .expect_status(http::StatusCode::NOT_FOUND)
            .expect_error("Invalid board id 'abc'")
            .await;
    }

    #[tokio::test]
    async fn test_put_not_allowed() {
        let context = TestContext::setup().await;

        let id = context.create_board("The title", "Alice", "Some text").await;

        OneShotBuilder::new(context.app(), (http::Method::PUT, format!("/boards/{}", id)))
            .send_json(BoardInput { title: Some("x".to_owned()), ..Default::default() })
            .await
            .expect_status(http::StatusCode::METHOD_NOT_ALLOWED)
            .expect_empty()
            .await;
        assert_eq!("The title", context.get_board_with_deleted(id).await.fields().title());
    }

    test_payload_must_be_empty!(TestContext::setup().await.into_app(), route("1"));
}
