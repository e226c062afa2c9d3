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

//! Generic types shared by the model layer of all services.

/// Model errors.  These describe untrusted input that does not satisfy the invariants of a
/// domain type.
#[derive(Debug, PartialEq, thiserror::Error)]
#[error("{0}")]
pub struct ModelError(pub String);

/// Result type for this module.
pub type ModelResult<T> = Result<T, ModelError>;

/// Ensures that `value` has at most `max` Unicode characters.
///
/// The `field` name is only used to compose the error message.
pub fn check_max_chars(field: &str, value: &str, max: usize) -> ModelResult<()> {
    let length = value.chars().count();
    if length > max {
        return Err(ModelError(format!(
            "Field {} is too long: {} characters but at most {} are allowed",
            field, length, max
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_max_chars_ok() {
        check_max_chars("f", "", 0).unwrap();
        check_max_chars("f", "abc", 3).unwrap();
        check_max_chars("f", "\u{00e9}\u{00e9}\u{00e9}", 3).unwrap();
    }

    #[test]
    fn test_check_max_chars_too_long() {
        assert_eq!(
            ModelError(
                "Field title is too long: 4 characters but at most 3 are allowed".to_owned()
            ),
            check_max_chars("title", "abcd", 3).unwrap_err()
        );
    }
}
