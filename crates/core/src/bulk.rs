// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The generic partial-failure bulk combinator.
//!
//! Every bulk mutation in the system shares one contract: each item is
//! applied independently, a failure on one item neither aborts nor rolls
//! back the others, and the caller receives a full account of successes
//! and failures. The batch itself is deliberately not one transaction;
//! each item's own operation is.

/// A single failed item with the reason its operation returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkFailure<T> {
    /// The item that failed.
    pub item: T,
    /// The failure reason, rendered from the operation's error.
    pub reason: String,
}

/// The outcome of a bulk operation.
///
/// `failed_items` preserves input order; `success_ids` preserves the
/// order identifiers were produced in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkOutcome<T> {
    /// How many items succeeded.
    pub success_count: usize,
    /// How many items failed.
    pub failed_count: usize,
    /// The identifiers produced by successful operations.
    pub success_ids: Vec<i64>,
    /// The failed items paired with their failure reasons.
    pub failed_items: Vec<BulkFailure<T>>,
}

/// Applies `single_op` to each item independently, accumulating
/// successes and failures.
///
/// An error from `single_op` is recorded against its item and the batch
/// continues; items already applied stay applied. An empty input yields
/// an empty outcome — collaborators that require a non-empty batch
/// enforce that themselves.
///
/// # Arguments
///
/// * `items` - The items to apply, in order
/// * `single_op` - The single-item operation, returning the produced id
pub fn bulk_apply<T, E, F>(items: Vec<T>, mut single_op: F) -> BulkOutcome<T>
where
    E: std::fmt::Display,
    F: FnMut(&T) -> Result<i64, E>,
{
    let mut success_ids: Vec<i64> = Vec::new();
    let mut failed_items: Vec<BulkFailure<T>> = Vec::new();

    for item in items {
        match single_op(&item) {
            Ok(id) => success_ids.push(id),
            Err(e) => failed_items.push(BulkFailure {
                item,
                reason: e.to_string(),
            }),
        }
    }

    BulkOutcome {
        success_count: success_ids.len(),
        failed_count: failed_items.len(),
        success_ids,
        failed_items,
    }
}
