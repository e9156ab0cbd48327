//! Multi-endpoint fan-out.
//!
//! Every credential operation runs once per mirror, concurrently. Outcomes are
//! kept in resolution order, so tie-breaks follow configuration order rather
//! than arrival order. What counts as overall success is decided by an
//! [`Aggregation`] policy.

use std::future::Future;
use std::time::Duration;

use futures::future::join_all;
use tracing::warn;

use crate::core::{EndpointSet, ForkastError, Result};

/// How per-endpoint successes combine into one result.
pub(crate) trait Aggregation<T> {
    type Output;

    /// `None` means the operation failed as a whole.
    fn combine(successes: Vec<T>) -> Option<Self::Output>;
}

/// Issuance: the first mirror (in resolution order) that succeeds is canonical.
pub(crate) struct FirstSuccess;

impl<T> Aggregation<T> for FirstSuccess {
    type Output = T;

    fn combine(successes: Vec<T>) -> Option<T> {
        successes.into_iter().next()
    }
}

/// Listing: union of every successful listing, first-seen order, no duplicates.
pub(crate) struct UnionKeys;

impl Aggregation<Vec<String>> for UnionKeys {
    type Output = Vec<String>;

    fn combine(successes: Vec<Vec<String>>) -> Option<Vec<String>> {
        if successes.is_empty() {
            return None;
        }
        let mut keys: Vec<String> = Vec::new();
        for key in successes.into_iter().flatten() {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        Some(keys)
    }
}

/// Revocation: one accepting mirror is enough.
pub(crate) struct AnySuccess;

impl Aggregation<()> for AnySuccess {
    type Output = ();

    fn combine(successes: Vec<()>) -> Option<()> {
        (!successes.is_empty()).then_some(())
    }
}

/// Outcomes of one fan-out, in resolution order.
pub(crate) struct Settled<T> {
    outcomes: Vec<Result<T>>,
}

impl<T> Settled<T> {
    #[cfg(test)]
    pub(crate) fn from_outcomes(outcomes: Vec<Result<T>>) -> Self {
        Self { outcomes }
    }

    /// Combine successes with `A`; on failure surface the last error in
    /// resolution order, or `fallback` if nothing was observed.
    pub(crate) fn aggregate<A: Aggregation<T>>(
        self,
        fallback: impl FnOnce() -> ForkastError,
    ) -> Result<A::Output> {
        let mut successes = Vec::new();
        let mut last_error = None;
        for outcome in self.outcomes {
            match outcome {
                Ok(value) => successes.push(value),
                Err(err) => last_error = Some(err),
            }
        }
        A::combine(successes).ok_or_else(|| last_error.unwrap_or_else(fallback))
    }
}

/// Run `call` against every endpoint concurrently, bounding each call by
/// `timeout`. Failures are logged and kept; nothing is retried.
pub(crate) async fn fan_out<'a, T, F, Fut>(
    endpoints: &'a EndpointSet,
    timeout: Duration,
    operation: &'static str,
    call: F,
) -> Settled<T>
where
    F: Fn(&'a str) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = endpoints.iter().map(|endpoint| {
        let attempt = call(endpoint);
        async move {
            tokio::time::timeout(timeout, attempt)
                .await
                .unwrap_or_else(|_| {
                    Err(ForkastError::timeout(
                        timeout,
                        format!("{operation} via {endpoint}"),
                    ))
                })
        }
    });

    let outcomes = join_all(attempts).await;

    for (endpoint, outcome) in endpoints.iter().zip(&outcomes) {
        if let Err(err) = outcome {
            warn!(
                operation,
                endpoint,
                status = ?err.status(),
                error = %err,
                "Forkast endpoint failed"
            );
        }
    }

    Settled { outcomes }
}
