//! Result paging.
//!
//! When both `skip` and `limit` are present they are the half-open slice
//! endpoints `[skip, limit)`, not an offset and a count; a `skip` alone
//! takes `[skip, len - skip)`. Both quirks are part of the observable
//! contract and are kept as-is. Slices that fall outside the result set
//! are an error, never a panic.

use super::errors::{ExecError, ExecResult};
use crate::storage::Objects;

/// Slices a result set by the request's `skip` / `limit`.
pub fn page(objects: Objects, skip: Option<i64>, limit: Option<i64>) -> ExecResult<Objects> {
    let len = objects.len();

    let (start, end) = match (skip, limit) {
        (Some(skip), Some(limit)) => (skip, limit),
        (None, Some(limit)) => (0, limit),
        (Some(skip), None) => (skip, len as i64 - skip),
        (None, None) => return Ok(objects),
    };

    if start < 0 || end < start || end > len as i64 {
        return Err(ExecError::PageOutOfRange { start, end, len });
    }

    Ok(objects
        .into_iter()
        .skip(start as usize)
        .take((end - start) as usize)
        .collect())
}
