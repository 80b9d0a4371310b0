//! Optimistic mutations: apply locally, await the store, undo on rejection.
//!
//! Every store-backed edit follows the same three steps. The local document is
//! changed first so the surface reflects the edit immediately; the store call
//! is awaited; if the store rejects it, the local change is rolled back and,
//! for edits that may already have reached the server, a compensating store
//! call restores the last confirmed state. The document never keeps a value
//! the store refused.

#[cfg(test)]
#[path = "saga_test.rs"]
mod saga_test;

use std::future::Future;

use tracing::warn;

use crate::doc::MapDoc;
use crate::store::PersistenceError;

/// Apply `apply` to `doc`, await `confirm`, and run `rollback` if it fails.
///
/// # Errors
///
/// Returns the store's error after the rollback has run.
pub async fn apply_confirm<T, A, C, R>(
    doc: &mut MapDoc,
    label: &'static str,
    apply: A,
    confirm: C,
    rollback: R,
) -> Result<T, PersistenceError>
where
    A: FnOnce(&mut MapDoc),
    C: Future<Output = Result<T, PersistenceError>>,
    R: FnOnce(&mut MapDoc),
{
    apply(doc);
    match confirm.await {
        Ok(value) => Ok(value),
        Err(err) => {
            warn!(operation = label, error = %err, "store rejected mutation; rolled back");
            rollback(doc);
            Err(err)
        }
    }
}

/// Like [`apply_confirm`], but also awaits `compensate` after a rejection.
///
/// `compensate` restores the server to the prior confirmed state. Its own
/// failure is logged; the original error is what the caller sees.
///
/// # Errors
///
/// Returns the store's error for `confirm`.
pub async fn apply_confirm_compensate<T, U, A, C, R, K>(
    doc: &mut MapDoc,
    label: &'static str,
    apply: A,
    confirm: C,
    rollback: R,
    compensate: K,
) -> Result<T, PersistenceError>
where
    A: FnOnce(&mut MapDoc),
    C: Future<Output = Result<T, PersistenceError>>,
    R: FnOnce(&mut MapDoc),
    K: Future<Output = Result<U, PersistenceError>>,
{
    apply(doc);
    match confirm.await {
        Ok(value) => Ok(value),
        Err(err) => {
            rollback(doc);
            match compensate.await {
                Ok(_) => warn!(operation = label, error = %err, "store rejected mutation; compensated"),
                Err(comp_err) => warn!(
                    operation = label,
                    error = %err,
                    compensation_error = %comp_err,
                    "store rejected mutation and compensation failed"
                ),
            }
            Err(err)
        }
    }
}
