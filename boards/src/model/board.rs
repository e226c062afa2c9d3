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

//! The `Board` data type and its projections.

use derive_getters::Getters;
use derive_more::Constructor;
use iii_iv_core::model::{check_max_chars, ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;

/// Maximum number of characters in a board title.
pub(crate) const MAX_TITLE_CHARS: usize = 255;

/// Maximum number of characters in a board's content.
pub(crate) const MAX_CONTENT_CHARS: usize = 4000;

/// Maximum number of characters in the name of a board's author.
pub(crate) const MAX_NAME_CHARS: usize = 50;

/// Maximum number of characters in a board's password before hashing.
pub(crate) const MAX_PWD_CHARS: usize = 255;

/// Maximum number of characters of plain text exposed by `BoardSummary`.
pub(crate) const SUMMARY_CHARS: usize = 255;

/// Cost parameter for bcrypt.
const BCRYPT_COST: u32 = 10;

/// Identifier of a board, assigned by the database at creation time.
#[derive(Clone, Copy, Deserialize, Eq, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
#[cfg_attr(test, derive(Debug))]
pub(crate) struct BoardId(i64);

impl BoardId {
    /// Creates a new identifier from its raw database representation.
    pub(crate) fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw database representation of the identifier.
    pub(crate) fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for BoardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for BoardId {
    type Err = ModelError;

    fn from_str(s: &str) -> ModelResult<Self> {
        s.parse::<i64>()
            .map(BoardId)
            .map_err(|e| ModelError(format!("Invalid board id '{}': {}", s, e)))
    }
}

/// Whether a board is in use, stored as a single `Y` or `N` character.
#[derive(Clone, Copy, Default, Deserialize, Eq, PartialEq, Serialize)]
#[cfg_attr(test, derive(Debug))]
pub(crate) enum YnUse {
    /// The board is in use.
    #[default]
    #[serde(rename = "Y")]
    Yes,

    /// The board is not in use.
    #[serde(rename = "N")]
    No,
}

impl YnUse {
    /// Returns the database representation of this value.
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            YnUse::Yes => "Y",
            YnUse::No => "N",
        }
    }
}

impl FromStr for YnUse {
    type Err = ModelError;

    fn from_str(s: &str) -> ModelResult<Self> {
        match s {
            "Y" => Ok(YnUse::Yes),
            "N" => Ok(YnUse::No),
            s => Err(ModelError(format!("Invalid yn_use value '{}': must be Y or N", s))),
        }
    }
}

/// An opaque type to hold a board password, protecting it from leaking into logs.
#[derive(Default, Deserialize, PartialEq, Serialize)]
#[serde(transparent)]
#[cfg_attr(test, derive(Clone))]
pub(crate) struct Password(String);

impl Password {
    /// Creates a new password from a literal string.
    #[cfg(test)]
    pub(crate) fn new<S: Into<String>>(s: S) -> ModelResult<Self> {
        let s = s.into();
        check_max_chars("pwd", &s, MAX_PWD_CHARS)?;
        Ok(Password(s))
    }

    /// Hashes the password.  Consumes the password because there is no context in which keeping
    /// the password alive once we have generated its hash is correct.
    pub(crate) fn hash(self) -> ModelResult<HashedPassword> {
        check_max_chars("pwd", &self.0, MAX_PWD_CHARS)?;
        let hashed = bcrypt::hash(self.0, BCRYPT_COST)
            .map_err(|e| ModelError(format!("Password error: {}", e)))?;
        Ok(HashedPassword::new(hashed))
    }

    /// Verifies if this password matches a given `hash`.
    #[cfg(test)]
    pub(crate) fn verify(self, hash: &HashedPassword) -> ModelResult<bool> {
        bcrypt::verify(self.0, hash.as_str())
            .map_err(|e| ModelError(format!("Password error: {}", e)))
    }
}

#[cfg(test)]
impl From<&'static str> for Password {
    /// Creates a new password from a hardcoded string, which must be valid.
    fn from(s: &'static str) -> Self {
        Password::new(s).expect("Hardcoded passwords must be valid")
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("scrubbed password")
    }
}

/// An opaque type to hold a hashed password, protecting it from leaking into logs.
#[derive(Clone, PartialEq)]
pub(crate) struct HashedPassword(String);

impl HashedPassword {
    /// Creates a new hashed password from a literal string.
    pub(crate) fn new<S: Into<String>>(s: S) -> Self {
        HashedPassword(s.into())
    }

    /// Returns a string view of the hash.
    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("scrubbed hash")
    }
}

/// User-provided contents of a board, validated at construction time.
#[derive(Clone, Getters)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub(crate) struct BoardFields {
    /// Title of the board.
    title: String,

    /// Content of the board, which may contain markup.
    content: String,

    /// Plain text rendition of the content.
    plain_text: String,

    /// Whether the board is in use.
    yn_use: YnUse,

    /// Name of the author.
    name: String,

    /// Hash of the password that protects the board.
    pwd: HashedPassword,
}

impl BoardFields {
    /// Creates a new set of fields after validating their lengths.
    pub(crate) fn new(
        title: String,
        content: String,
        plain_text: String,
        yn_use: YnUse,
        name: String,
        pwd: HashedPassword,
    ) -> ModelResult<Self> {
        check_max_chars("title", &title, MAX_TITLE_CHARS)?;
        check_max_chars("content", &content, MAX_CONTENT_CHARS)?;
        check_max_chars("name", &name, MAX_NAME_CHARS)?;
        Ok(Self { title, content, plain_text, yn_use, name, pwd })
    }
}

/// A board as stored in the database.
#[derive(Constructor, Getters)]
#[cfg_attr(test, derive(Clone, Debug, PartialEq))]
pub(crate) struct Board {
    /// Identifier of the board.
    id: BoardId,

    /// Time when the board was created.
    created_at: OffsetDateTime,

    /// Time when the board was last modified.
    updated_at: OffsetDateTime,

    /// Time when the board was deleted, or `None` if it is still active.
    deleted_at: Option<OffsetDateTime>,

    /// User-provided contents of the board.
    fields: BoardFields,
}

impl Board {
    /// Replaces the contents of the board with `fields`, marking the board as updated at `now`.
    pub(crate) fn with_fields(self, fields: BoardFields, now: OffsetDateTime) -> Self {
        Self { fields, updated_at: now, ..self }
    }

    /// Projects the board into its list representation.
    pub(crate) fn to_summary(&self) -> BoardSummary {
        BoardSummary {
            id: self.id,
            created_at: self.created_at,
            updated_at: self.updated_at,
            deleted_at: self.deleted_at,
            title: self.fields.title.clone(),
            yn_use: self.fields.yn_use,
            name: self.fields.name.clone(),
            content_summary: summarize(&self.fields.plain_text, SUMMARY_CHARS),
        }
    }

    /// Projects the board into its detailed representation.
    pub(crate) fn to_details(&self) -> BoardDetails {
        BoardDetails {
            id: self.id,
            created_at: self.created_at,
            updated_at: self.updated_at,
            deleted_at: self.deleted_at,
            title: self.fields.title.clone(),
            yn_use: self.fields.yn_use,
            name: self.fields.name.clone(),
            content: self.fields.content.clone(),
            plain_text: self.fields.plain_text.clone(),
        }
    }
}

/// Returns the first `max` characters of `text`, never splitting a character in half.
pub(crate) fn summarize(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((pos, _)) => text[..pos].to_owned(),
        None => text.to_owned(),
    }
}

/// Representation of a board when listing boards.
#[derive(Serialize)]
#[cfg_attr(test, derive(Debug, Deserialize, PartialEq))]
pub(crate) struct BoardSummary {
    /// Identifier of the board.
    pub(crate) id: BoardId,

    /// Time when the board was created.
    #[serde(with = "time::serde::rfc3339")]
    pub(crate) created_at: OffsetDateTime,

    /// Time when the board was last modified.
    #[serde(with = "time::serde::rfc3339")]
    pub(crate) updated_at: OffsetDateTime,

    /// Time when the board was deleted.
    #[serde(with = "time::serde::rfc3339::option")]
    pub(crate) deleted_at: Option<OffsetDateTime>,

    /// Title of the board.
    pub(crate) title: String,

    /// Whether the board is in use.
    pub(crate) yn_use: YnUse,

    /// Name of the author.
    pub(crate) name: String,

    /// Leading part of the plain text of the board.
    pub(crate) content_summary: String,
}

/// Representation of a board when fetching it individually.
#[derive(Serialize)]
#[cfg_attr(test, derive(Debug, Deserialize, PartialEq))]
pub(crate) struct BoardDetails {
    /// Identifier of the board.
    pub(crate) id: BoardId,

    /// Time when the board was created.
    #[serde(with = "time::serde::rfc3339")]
    pub(crate) created_at: OffsetDateTime,

    /// Time when the board was last modified.
    #[serde(with = "time::serde::rfc3339")]
    pub(crate) updated_at: OffsetDateTime,

    /// Time when the board was deleted.
    #[serde(with = "time::serde::rfc3339::option")]
    pub(crate) deleted_at: Option<OffsetDateTime>,

    /// Title of the board.
    pub(crate) title: String,

    /// Whether the board is in use.
    pub(crate) yn_use: YnUse,

    /// Name of the author.
    pub(crate) name: String,

    /// Full content of the board.
    pub(crate) content: String,

    /// Full plain text of the board.
    pub(crate) plain_text: String,
}

/// Request payload to create or update a board.  All fields are optional.
#[derive(Default, Deserialize)]
#[cfg_attr(test, derive(Debug, Serialize))]
pub(crate) struct BoardInput {
    /// New title, if any.
    #[cfg_attr(test, serde(skip_serializing_if = "Option::is_none"))]
    pub(crate) title: Option<String>,

    /// New content, if any.
    #[cfg_attr(test, serde(skip_serializing_if = "Option::is_none"))]
    pub(crate) content: Option<String>,

    /// New plain text, if any.
    #[cfg_attr(test, serde(skip_serializing_if = "Option::is_none"))]
    pub(crate) plain_text: Option<String>,

    /// New usage flag, if any.
    #[cfg_attr(test, serde(skip_serializing_if = "Option::is_none"))]
    pub(crate) yn_use: Option<YnUse>,

    /// New author name, if any.
    #[cfg_attr(test, serde(skip_serializing_if = "Option::is_none"))]
    pub(crate) name: Option<String>,

    /// New password, if any.
    #[cfg_attr(test, serde(skip_serializing_if = "Option::is_none"))]
    pub(crate) pwd: Option<Password>,
}

impl BoardInput {
    /// Builds the fields of a new board, using empty values for the missing fields and `Y` for a
    /// missing `yn_use`.
    pub(crate) fn into_new_fields(self) -> ModelResult<BoardFields> {
        let pwd = self.pwd.unwrap_or_default().hash()?;
        BoardFields::new(
            self.title.unwrap_or_default(),
            self.content.unwrap_or_default(),
            self.plain_text.unwrap_or_default(),
            self.yn_use.unwrap_or_default(),
            self.name.unwrap_or_default(),
            pwd,
        )
    }

    /// Overlays the present fields onto `fields`, keeping the previous values for the missing
    /// ones.  A new password is hashed before being stored.
    pub(crate) fn merge_into(self, fields: BoardFields) -> ModelResult<BoardFields> {
        let pwd = match self.pwd {
            Some(pwd) => pwd.hash()?,
            None => fields.pwd,
        };
        BoardFields::new(
            self.title.unwrap_or(fields.title),
            self.content.unwrap_or(fields.content),
            self.plain_text.unwrap_or(fields.plain_text),
            self.yn_use.unwrap_or(fields.yn_use),
            self.name.unwrap_or(fields.name),
            pwd,
        )
    }
}
