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

//! Database abstraction in terms of the operations needed by the server.

use crate::model::*;
use iii_iv_core::db::postgres;
#[cfg(test)]
use iii_iv_core::db::sqlite;
use iii_iv_core::db::{ensure_one_row, DbError, DbResult, Executor};
use sqlx::{Database, Encode, QueryBuilder, Row, Type};
use std::str::FromStr;
use time::OffsetDateTime;


/// Columns to fetch from PostgreSQL to build a `Board`.
const PG_BOARD_COLUMNS: &str = "
    id, created_at, updated_at, deleted_at, title, content, plain_text, yn_use, name, pwd
";

/// Columns to fetch from SQLite to build a `Board`.
#[cfg(test)]
const SQLITE_BOARD_COLUMNS: &str = "
    id, created_at_sec, created_at_nsec, updated_at_sec, updated_at_nsec,
    deleted_at_sec, deleted_at_nsec, title, content, plain_text, yn_use, name, pwd
";

/// Builds the user-provided contents of a board from the raw values of a row.
fn build_fields(
    title: String,
    content: String,
    plain_text: String,
    yn_use: String,
    name: String,
    pwd: String,
) -> DbResult<BoardFields> {
    let yn_use = YnUse::from_str(&yn_use)?;
    Ok(BoardFields::new(title, content, plain_text, yn_use, name, HashedPassword::new(pwd))?)
}

/// Converts a PostgreSQL row into a `Board`.
fn pg_row_to_board(row: sqlx::postgres::PgRow) -> DbResult<Board> {
    let id: i64 = row.try_get("id").map_err(postgres::map_sqlx_error)?;
    let created_at: OffsetDateTime = row.try_get("created_at").map_err(postgres::map_sqlx_error)?;
    let updated_at: OffsetDateTime = row.try_get("updated_at").map_err(postgres::map_sqlx_error)?;
    let deleted_at: Option<OffsetDateTime> =
        row.try_get("deleted_at").map_err(postgres::map_sqlx_error)?;
    let title: String = row.try_get("title").map_err(postgres::map_sqlx_error)?;
    let content: String = row.try_get("content").map_err(postgres::map_sqlx_error)?;
    let plain_text: String = row.try_get("plain_text").map_err(postgres::map_sqlx_error)?;
    let yn_use: String = row.try_get("yn_use").map_err(postgres::map_sqlx_error)?;
    let name: String = row.try_get("name").map_err(postgres::map_sqlx_error)?;
    let pwd: String = row.try_get("pwd").map_err(postgres::map_sqlx_error)?;

    let fields = build_fields(title, content, plain_text, yn_use, name, pwd)?;
    Ok(Board::new(BoardId::new(id), created_at, updated_at, deleted_at, fields))
}

/// Converts an SQLite row into a `Board`.
#[cfg(test)]
fn sqlite_row_to_board(row: sqlx::sqlite::SqliteRow) -> DbResult<Board> {
    let id: i64 = row.try_get("id").map_err(sqlite::map_sqlx_error)?;
    let created_at_sec: i64 = row.try_get("created_at_sec").map_err(sqlite::map_sqlx_error)?;
    let created_at_nsec: i64 = row.try_get("created_at_nsec").map_err(sqlite::map_sqlx_error)?;
    let updated_at_sec: i64 = row.try_get("updated_at_sec").map_err(sqlite::map_sqlx_error)?;
    let updated_at_nsec: i64 = row.try_get("updated_at_nsec").map_err(sqlite::map_sqlx_error)?;
    let deleted_at_sec: Option<i64> =
        row.try_get("deleted_at_sec").map_err(sqlite::map_sqlx_error)?;
    let deleted_at_nsec: Option<i64> =
        row.try_get("deleted_at_nsec").map_err(sqlite::map_sqlx_error)?;
    let title: String = row.try_get("title").map_err(sqlite::map_sqlx_error)?;
    let content: String = row.try_get("content").map_err(sqlite::map_sqlx_error)?;
    let plain_text: String = row.try_get("plain_text").map_err(sqlite::map_sqlx_error)?;
    let yn_use: String = row.try_get("yn_use").map_err(sqlite::map_sqlx_error)?;
    let name: String = row.try_get("name").map_err(sqlite::map_sqlx_error)?;
    let pwd: String = row.try_get("pwd").map_err(sqlite::map_sqlx_error)?;

    let created_at = sqlite::build_timestamp(created_at_sec, created_at_nsec)?;
    let updated_at = sqlite::build_timestamp(updated_at_sec, updated_at_nsec)?;
    let deleted_at =
        sqlite::build_optional_timestamp("deleted_at", deleted_at_sec, deleted_at_nsec)?;

    let fields = build_fields(title, content, plain_text, yn_use, name, pwd)?;
    Ok(Board::new(BoardId::new(id), created_at, updated_at, deleted_at, fields))
}

/// Appends the predicates, ordering and limits described by `query` to `qb`, which must already
/// contain a `SELECT` with a `WHERE` clause.
fn push_query<'a, DB>(qb: &mut QueryBuilder<'a, DB>, query: &BoardQuery)
where
    DB: Database,
    i64: 'a + Encode<'a, DB> + Type<DB>,
    String: 'a + Encode<'a, DB> + Type<DB>,
{
    for filter in query.filters() {
        qb.push(" AND ").push(filter.column().as_str()).push(" = ");
        match filter.value() {
            FilterValue::Int(i) => qb.push_bind(*i),
            FilterValue::Text(s) => qb.push_bind(s.clone()),
        };
    }
    qb.push(" ORDER BY id");
    if let Some((offset, limit)) = query.page() {
        qb.push(" LIMIT ").push_bind(limit).push(" OFFSET ").push_bind(offset);
    }
}

/// Initializes the database schema.
pub async fn init_schema(ex: &mut Executor) -> DbResult<()> {
    match ex {
        Executor::Postgres(ref mut ex) => {
            postgres::run_schema(ex, include_str!("postgres.sql")).await
        }

        #[cfg(test)]
        Executor::Sqlite(ref mut ex) => sqlite::run_schema(ex, include_str!("sqlite.sql")).await,

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Stores a new board with the given `fields`, created at `now`, and returns its identifier.
pub(crate) async fn create_board(
    ex: &mut Executor,
    fields: &BoardFields,
    now: OffsetDateTime,
) -> DbResult<BoardId> {
    match ex {
        Executor::Postgres(ref mut ex) => {
            let query_str = "
                INSERT INTO boards
                    (created_at, updated_at, title, content, plain_text, yn_use, name, pwd)
                VALUES ($1, $1, $2, $3, $4, $5, $6, $7)
                RETURNING id
            ";
            let row = sqlx::query(query_str)
                .bind(now)
                .bind(fields.title())
                .bind(fields.content())
                .bind(fields.plain_text())
                .bind(fields.yn_use().as_str())
                .bind(fields.name())
                .bind(fields.pwd().as_str())
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            let id: i64 = row.try_get("id").map_err(postgres::map_sqlx_error)?;
            Ok(BoardId::new(id))
        }

        #[cfg(test)]
        Executor::Sqlite(ref mut ex) => {
            let (now_sec, now_nsec) = sqlite::unpack_timestamp(now);

            let query_str = "
                INSERT INTO boards
                    (created_at_sec, created_at_nsec, updated_at_sec, updated_at_nsec,
                    title, content, plain_text, yn_use, name, pwd)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ";
            let done = sqlx::query(query_str)
                .bind(now_sec)
                .bind(now_nsec)
                .bind(now_sec)
                .bind(now_nsec)
                .bind(fields.title())
                .bind(fields.content())
                .bind(fields.plain_text())
                .bind(fields.yn_use().as_str())
                .bind(fields.name())
                .bind(fields.pwd().as_str())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            Ok(BoardId::new(done.last_insert_rowid()))
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Gets the active board identified by `id`.
pub(crate) async fn get_board(ex: &mut Executor, id: BoardId) -> DbResult<Board> {
    let maybe_board = match ex {
        Executor::Postgres(ref mut ex) => {
            let query_str = format!(
                "SELECT {} FROM boards WHERE id = $1 AND deleted_at IS NULL",
                PG_BOARD_COLUMNS
            );
            let maybe_row = sqlx::query(&query_str)
                .bind(id.as_i64())
                .fetch_optional(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            maybe_row.map(pg_row_to_board).transpose()?
        }

        #[cfg(test)]
        Executor::Sqlite(ref mut ex) => {
            let query_str = format!(
                "SELECT {} FROM boards WHERE id = ? AND deleted_at_sec IS NULL",
                SQLITE_BOARD_COLUMNS
            );
            let maybe_row = sqlx::query(&query_str)
                .bind(id.as_i64())
                .fetch_optional(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            maybe_row.map(sqlite_row_to_board).transpose()?
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    maybe_board.ok_or(DbError::NotFound)
}

/// Gets all active boards that match `query`, sorted by identifier.
pub(crate) async fn find_boards(ex: &mut Executor, query: &BoardQuery) -> DbResult<Vec<Board>> {
    match ex {
        Executor::Postgres(ref mut ex) => {
            let mut qb = QueryBuilder::<sqlx::Postgres>::new(format!(
                "SELECT {} FROM boards WHERE deleted_at IS NULL",
                PG_BOARD_COLUMNS
            ));
            push_query(&mut qb, query);
            let rows =
                qb.build().fetch_all(ex.conn()).await.map_err(postgres::map_sqlx_error)?;
            rows.into_iter().map(pg_row_to_board).collect()
        }

        #[cfg(test)]
        Executor::Sqlite(ref mut ex) => {
            let mut qb = QueryBuilder::<sqlx::Sqlite>::new(format!(
                "SELECT {} FROM boards WHERE deleted_at_sec IS NULL",
                SQLITE_BOARD_COLUMNS
            ));
            push_query(&mut qb, query);
            let rows = qb.build().fetch_all(ex.conn()).await.map_err(sqlite::map_sqlx_error)?;
            rows.into_iter().map(sqlite_row_to_board).collect()
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Replaces all mutable columns of the active board `board.id` with the values in `board`.
pub(crate) async fn save_board(ex: &mut Executor, board: &Board) -> DbResult<()> {
    let fields = board.fields();
    let rows_affected = match ex {
        Executor::Postgres(ref mut ex) => {
            let query_str = "
                UPDATE boards
                SET updated_at = $2, title = $3, content = $4, plain_text = $5, yn_use = $6,
                    name = $7, pwd = $8
                WHERE id = $1 AND deleted_at IS NULL
            ";
            sqlx::query(query_str)
                .bind(board.id().as_i64())
                .bind(*board.updated_at())
                .bind(fields.title())
                .bind(fields.content())
                .bind(fields.plain_text())
                .bind(fields.yn_use().as_str())
                .bind(fields.name())
                .bind(fields.pwd().as_str())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?
                .rows_affected()
        }

        #[cfg(test)]
        Executor::Sqlite(ref mut ex) => {
            let (updated_sec, updated_nsec) = sqlite::unpack_timestamp(*board.updated_at());

            let query_str = "
                UPDATE boards
                SET updated_at_sec = ?, updated_at_nsec = ?, title = ?, content = ?,
                    plain_text = ?, yn_use = ?, name = ?, pwd = ?
                WHERE id = ? AND deleted_at_sec IS NULL
            ";
            sqlx::query(query_str)
                .bind(updated_sec)
                .bind(updated_nsec)
                .bind(fields.title())
                .bind(fields.content())
                .bind(fields.plain_text())
                .bind(fields.yn_use().as_str())
                .bind(fields.name())
                .bind(fields.pwd().as_str())
                .bind(board.id().as_i64())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?
                .rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    ensure_one_row(rows_affected)
}

/// Marks the active board `id` as deleted at `now`.
pub(crate) async fn delete_board(
    ex: &mut Executor,
    id: BoardId,
    now: OffsetDateTime,
) -> DbResult<()> {
    let rows_affected = match ex {
        Executor::Postgres(ref mut ex) => {
            let query_str = "
                UPDATE boards SET deleted_at = $2 WHERE id = $1 AND deleted_at IS NULL
            ";
            sqlx::query(query_str)
                .bind(id.as_i64())
                .bind(now)
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?
                .rows_affected()
        }

        #[cfg(test)]
        Executor::Sqlite(ref mut ex) => {
            let (now_sec, now_nsec) = sqlite::unpack_timestamp(now);

            let query_str = "
                UPDATE boards SET deleted_at_sec = ?, deleted_at_nsec = ?
                WHERE id = ? AND deleted_at_sec IS NULL
            ";
            sqlx::query(query_str)
                .bind(now_sec)
                .bind(now_nsec)
                .bind(id.as_i64())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?
                .rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    ensure_one_row(rows_affected)
}

/// Gets a board regardless of whether it has been deleted, for tests that need to inspect
/// soft-deleted rows.
#[cfg(test)]
pub(crate) async fn get_board_with_deleted(ex: &mut Executor, id: BoardId) -> DbResult<Board> {
    match ex {
        Executor::Postgres(ref mut ex) => {
            let query_str = format!("SELECT {} FROM boards WHERE id = $1", PG_BOARD_COLUMNS);
            let row = sqlx::query(&query_str)
                .bind(id.as_i64())
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            pg_row_to_board(row)
        }

        Executor::Sqlite(ref mut ex) => {
            let query_str = format!("SELECT {} FROM boards WHERE id = ?", SQLITE_BOARD_COLUMNS);
            let row = sqlx::query(&query_str)
                .bind(id.as_i64())
                .fetch_one(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            sqlite_row_to_board(row)
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}
