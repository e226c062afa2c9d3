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

//! Operations on the collection of boards.

use crate::db;
use crate::driver::Driver;
use crate::model::*;
use iii_iv_core::clocks::Clock;
use iii_iv_core::driver::{DriverError, DriverResult};

impl Driver {
    /// Gets the active boards selected by the raw query `params` of a list request.
    pub(crate) async fn list_boards(
        self,
        params: Vec<(String, String)>,
    ) -> DriverResult<Vec<Board>> {
        let query =
            BoardQuery::from_params(params).map_err(|e| DriverError::InvalidQuery(e.to_string()))?;
        let boards = db::find_boards(&mut self.db.ex().await?, &query).await?;
        Ok(boards)
    }

    /// Creates a new board from `input` and returns its identifier.
    pub(crate) async fn create_board(self, input: BoardInput) -> DriverResult<BoardId> {
        let fields = input.into_new_fields()?;
        let now = self.clock.now_utc();
        let id = db::create_board(&mut self.db.ex().await?, &fields, now).await?;
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::testutils::*;

    /// Shorthand to build raw query parameters.
    fn params(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect()
    }

    #[tokio::test]
    async fn test_list_boards_empty() {
        let context = TestContext::setup().await;

        assert!(context.driver().list_boards(vec![]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_boards_default_page() {
        let context = TestContext::setup().await;

        let mut exp_ids = vec![];
        for i in 0..12 {
            exp_ids.push(context.create_board(&format!("board {}", i), "Alice", "text").await);
        }
        exp_ids.truncate(10);

        let boards = context.driver().list_boards(vec![]).await.unwrap();
        assert_eq!(exp_ids, boards.iter().map(|b| *b.id()).collect::<Vec<BoardId>>());
    }

    #[tokio::test]
    async fn test_list_boards_filter_and_page() {
        let context = TestContext::setup().await;

        let mut alices = vec![];
        for i in 0..4 {
            context.create_board(&format!("b{}", i), "Bob", "text").await;
            alices.push(context.create_board(&format!("a{}", i), "Alice", "text").await);
        }

        let boards = context
            .driver()
            .list_boards(params(&[("name", "Alice"), ("page", "2"), ("page_size", "3")]))
            .await
            .unwrap();
        assert_eq!(vec![alices[3]], boards.iter().map(|b| *b.id()).collect::<Vec<BoardId>>());
    }

    #[tokio::test]
    async fn test_list_boards_invalid_filter() {
        let context = TestContext::setup().await;

        match context.driver().list_boards(params(&[("pwd", "secret")])).await {
            Err(DriverError::InvalidQuery(e)) => assert!(e.contains("unknown column 'pwd'")),
            e => panic!("{:?}", e),
        }
    }

    #[tokio::test]
    async fn test_create_board_defaults() {
        let context = TestContext::setup().await;

        let input = BoardInput { title: Some("Hello".to_owned()), ..Default::default() };
        let id = context.driver().create_board(input).await.unwrap();

        let board = db::get_board(&mut context.ex().await, id).await.unwrap();
        let now = context.clock().now_utc();
        assert_eq!(now, *board.created_at());
        assert_eq!(now, *board.updated_at());
        assert_eq!(None, *board.deleted_at());
        assert_eq!("Hello", board.fields().title());
        assert_eq!("", board.fields().content());
        assert_eq!(YnUse::Yes, *board.fields().yn_use());
    }

    #[tokio::test]
    async fn test_create_board_hashes_password() {
        let context = TestContext::setup().await;

        let input = BoardInput { pwd: Some(Password::from("secret")), ..Default::default() };
        let id = context.driver().create_board(input).await.unwrap();

        let board = db::get_board(&mut context.ex().await, id).await.unwrap();
        assert!(board.fields().pwd().as_str() != "secret");
        assert!(Password::from("secret").verify(board.fields().pwd()).unwrap());
    }

    #[tokio::test]
    async fn test_create_board_too_long() {
        let context = TestContext::setup().await;

        let input = BoardInput { title: Some("x".repeat(256)), ..Default::default() };
        match context.driver().create_board(input).await {
            Err(DriverError::InvalidInput(e)) => assert!(e.contains("title is too long")),
            e => panic!("{:?}", e),
        }

        assert!(context.driver().list_boards(vec![]).await.unwrap().is_empty());
    }
}
