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

//! Composable query scopes to look up boards.

use crate::model::YnUse;
use iii_iv_core::model::{ModelError, ModelResult};
use std::collections::HashSet;
use std::str::FromStr;

/// Page returned when the caller does not ask for one.
const DEFAULT_PAGE: i64 = 1;

/// Number of boards per page when the caller does not ask for a specific size.
const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum number of boards per page.
const MAX_PAGE_SIZE: i64 = 100;

/// Name of the query parameter that selects the page to return.
const PAGE_PARAM: &str = "page";

/// Name of the query parameter that selects the number of boards per page.
const PAGE_SIZE_PARAM: &str = "page_size";

/// Parses a raw integer parameter, treating anything that is not an integer as zero.
fn parse_or_zero(raw: Option<&str>) -> i64 {
    raw.and_then(|s| s.parse::<i64>().ok()).unwrap_or(0)
}

/// A validated page selection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Pagination {
    /// 1-based page number.
    page: i64,

    /// Number of boards per page, in the `[1, MAX_PAGE_SIZE]` range.
    page_size: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: DEFAULT_PAGE, page_size: DEFAULT_PAGE_SIZE }
    }
}

impl Pagination {
    /// Builds a page selection from the raw `page` and `page_size` parameters, clamping them to
    /// valid values.
    pub(crate) fn from_raw(page: Option<&str>, page_size: Option<&str>) -> Self {
        let page = match parse_or_zero(page) {
            n if n <= 0 => DEFAULT_PAGE,
            n => n,
        };
        let page_size = match parse_or_zero(page_size) {
            n if n > MAX_PAGE_SIZE => MAX_PAGE_SIZE,
            n if n <= 0 => DEFAULT_PAGE_SIZE,
            n => n,
        };
        Self { page, page_size }
    }

    /// Returns the number of boards to skip.
    pub(crate) fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    /// Returns the maximum number of boards to return.
    pub(crate) fn limit(&self) -> i64 {
        self.page_size
    }

    /// Converts this selection into a query scope.
    pub(crate) fn to_scope(self) -> QueryScope {
        QueryScope::Paginate { offset: self.offset(), limit: self.limit() }
    }
}

/// Columns of the boards table that can be used in equality filters.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum BoardColumn {
    /// The `id` column.
    Id,

    /// The `title` column.
    Title,

    /// The `content` column.
    Content,

    /// The `plain_text` column.
    PlainText,

    /// The `yn_use` column.
    YnUse,

    /// The `name` column.
    Name,
}

impl BoardColumn {
    /// Returns the name of the column in the database.
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            BoardColumn::Id => "id",
            BoardColumn::Title => "title",
            BoardColumn::Content => "content",
            BoardColumn::PlainText => "plain_text",
            BoardColumn::YnUse => "yn_use",
            BoardColumn::Name => "name",
        }
    }
}

impl FromStr for BoardColumn {
    type Err = ModelError;

    fn from_str(s: &str) -> ModelResult<Self> {
        match s {
            "id" => Ok(BoardColumn::Id),
            "title" => Ok(BoardColumn::Title),
            "content" => Ok(BoardColumn::Content),
            "plain_text" => Ok(BoardColumn::PlainText),
            "yn_use" => Ok(BoardColumn::YnUse),
            "name" => Ok(BoardColumn::Name),
            s => Err(ModelError(format!("Cannot filter by unknown column '{}'", s))),
        }
    }
}

/// A typed value to compare a column against.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum FilterValue {
    /// An integer value.
    Int(i64),

    /// A textual value.
    Text(String),
}

/// An equality predicate on one column.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Filter {
    /// Column to compare.
    column: BoardColumn,

    /// Value that the column must be equal to.
    value: FilterValue,
}

impl Filter {
    /// Creates a new filter from the raw `column` name and `value`, validating both.
    pub(crate) fn parse(column: &str, value: &str) -> ModelResult<Self> {
        let column = BoardColumn::from_str(column)?;
        let value = match column {
            BoardColumn::Id => FilterValue::Int(value.parse::<i64>().map_err(|e| {
                ModelError(format!("Invalid value '{}' for column id: {}", value, e))
            })?),
            BoardColumn::YnUse => FilterValue::Text(YnUse::from_str(value)?.as_str().to_owned()),
            _ => FilterValue::Text(value.to_owned()),
        };
        Ok(Self { column, value })
    }

    /// Returns the column to compare.
    pub(crate) fn column(&self) -> BoardColumn {
        self.column
    }

    /// Returns the value that the column must be equal to.
    pub(crate) fn value(&self) -> &FilterValue {
        &self.value
    }
}

/// A composable transformation of a board query.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum QueryScope {
    /// Skips `offset` boards and returns at most `limit` of them.
    Paginate {
        /// Number of boards to skip.
        offset: i64,

        /// Maximum number of boards to return.
        limit: i64,
    },

    /// Restricts the query to boards that match the filter.
    WhereEqual(Filter),
}

/// A query over the active boards, built by composing scopes.
///
/// Filters are combined with `AND` and pagination always applies after filtering, so the order in
/// which scopes are composed does not change the results.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct BoardQuery {
    /// Equality filters to apply.
    filters: Vec<Filter>,

    /// Offset and limit to apply, if any.
    page: Option<(i64, i64)>,
}

impl BoardQuery {
    /// Returns a new query that results from applying `scope` to this one.
    ///
    /// A later pagination scope replaces an earlier one.
    pub(crate) fn scope(mut self, scope: QueryScope) -> Self {
        match scope {
            QueryScope::Paginate { offset, limit } => self.page = Some((offset, limit)),
            QueryScope::WhereEqual(filter) => self.filters.push(filter),
        }
        self
    }

    /// Builds a query from the raw query parameters of a list request.
    ///
    /// `page` and `page_size` select the page to return and every other parameter becomes an
    /// equality filter.  Only the first value of a repeated parameter is considered.
    pub(crate) fn from_params(params: Vec<(String, String)>) -> ModelResult<Self> {
        let mut seen = HashSet::new();
        let mut page = None;
        let mut page_size = None;
        let mut query = BoardQuery::default();
        for (key, value) in params {
            if !seen.insert(key.clone()) {
                continue;
            }
            match key.as_str() {
                PAGE_PARAM => page = Some(value),
                PAGE_SIZE_PARAM => page_size = Some(value),
                column => {
                    query = query.scope(QueryScope::WhereEqual(Filter::parse(column, &value)?));
                }
            }
        }
        let pagination = Pagination::from_raw(page.as_deref(), page_size.as_deref());
        Ok(query.scope(pagination.to_scope()))
    }

    /// Returns the equality filters of the query.
    pub(crate) fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Returns the offset and limit of the query, if any.
    pub(crate) fn page(&self) -> Option<(i64, i64)> {
        self.page
    }
}
