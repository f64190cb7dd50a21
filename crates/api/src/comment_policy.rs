// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Comment policy validation.
//!
//! This module enforces input requirements on revision comments and
//! revision response comments before they reach the workflow core. The
//! core enforces the non-empty rule itself; the policy here adds the
//! boundary concerns of trimming and a length ceiling.

use thiserror::Error;

/// Comment policy errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommentPolicyError {
    /// Comment is empty or whitespace-only.
    #[error("Comment must not be empty")]
    Empty,

    /// Comment exceeds the maximum length.
    #[error("Comment must be at most {max_length} characters long (found {found})")]
    TooLong { max_length: usize, found: usize },
}

/// Comment policy configuration.
pub struct CommentPolicy {
    /// Maximum comment length in characters.
    pub max_length: usize,
}

impl Default for CommentPolicy {
    fn default() -> Self {
        Self { max_length: 4000 }
    }
}

impl CommentPolicy {
    /// Validates a comment against the policy.
    ///
    /// # Arguments
    ///
    /// * `comment` - The raw comment to validate
    ///
    /// # Returns
    ///
    /// The trimmed comment on success.
    ///
    /// # Errors
    ///
    /// Returns a `CommentPolicyError` if the comment is blank after
    /// trimming or exceeds the maximum length.
    pub fn validate<'a>(&self, comment: &'a str) -> Result<&'a str, CommentPolicyError> {
        let trimmed: &str = comment.trim();
        if trimmed.is_empty() {
            return Err(CommentPolicyError::Empty);
        }

        let found: usize = trimmed.chars().count();
        if found > self.max_length {
            return Err(CommentPolicyError::TooLong {
                max_length: self.max_length,
                found,
            });
        }

        Ok(trimmed)
    }
}
