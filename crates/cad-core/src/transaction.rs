//! Single-transaction execution of a batch of target writes.

use std::panic::{AssertUnwindSafe, catch_unwind, resume_unwind};

use crate::error::Result;
use crate::target::RenderTarget;

/// Runs `f` inside one target transaction.
///
/// The transaction is committed when `f` succeeds and rolled back when it
/// returns an error, when the commit itself fails, or when `f` panics.
pub fn in_transaction<T, R, F>(target: &mut T, name: &str, f: F) -> Result<R>
where
    T: RenderTarget + ?Sized,
    F: FnOnce(&mut T) -> Result<R>,
{
    tracing::trace!(transaction = name, "starting transaction");
    target.begin_transaction(name)?;

    let outcome = catch_unwind(AssertUnwindSafe(|| f(&mut *target)));

    match outcome {
        Ok(Ok(value)) => {
            if let Err(e) = target.commit_transaction() {
                target.rollback_transaction();
                return Err(e.into());
            }
            tracing::trace!(transaction = name, "transaction committed");
            Ok(value)
        }
        Ok(Err(err)) => {
            target.rollback_transaction();
            tracing::debug!(transaction = name, %err, "transaction rolled back");
            Err(err)
        }
        Err(payload) => {
            target.rollback_transaction();
            tracing::error!(transaction = name, "transaction rolled back after panic");
            resume_unwind(payload);
        }
    }
}
