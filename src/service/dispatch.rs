//! Ordered batch fan-out over a provider operation.

use std::fmt;
use std::future::Future;
use std::num::NonZeroUsize;
use std::str::FromStr;

use futures::stream::{self, StreamExt};

/// What a batch does when one item fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchPolicy {
    /// Stop at the first failure (in input order) and report only that failure.
    #[default]
    FailFast,
    /// Run every item and report each outcome.
    BestEffort,
}

impl BatchPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FailFast => "fail-fast",
            Self::BestEffort => "best-effort",
        }
    }
}

impl FromStr for BatchPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fail-fast" | "fail_fast" | "failfast" => Ok(Self::FailFast),
            "best-effort" | "best_effort" | "besteffort" => Ok(Self::BestEffort),
            other => Err(format!(
                "unknown batch policy {other:?} (expected fail-fast or best-effort)"
            )),
        }
    }
}

/// A fail-fast batch aborted at `index`.
#[derive(Debug, thiserror::Error)]
#[error("batch item {index} failed: {source}")]
pub struct BatchError<E>
where
    E: std::error::Error + 'static,
{
    pub index: usize,
    #[source]
    pub source: E,
}

/// Result of one item in a best-effort batch.
#[derive(Debug)]
pub enum ItemOutcome<R, E> {
    Ok { index: usize, result: R },
    Failed { index: usize, error: E },
}

impl<R, E> ItemOutcome<R, E> {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }
}

/// Batch results, shaped by the policy that produced them.
#[derive(Debug)]
pub enum BatchReport<R, E> {
    /// Every item succeeded (fail-fast).
    Completed(Vec<R>),
    /// One outcome per item (best-effort).
    Outcomes(Vec<ItemOutcome<R, E>>),
}

/// Runs an operation once per item, keeping results in input order.
///
/// At most `concurrency` operations are in flight; the default of one means
/// each call finishes before the next starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatcher {
    concurrency: NonZeroUsize,
    policy: BatchPolicy,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::sequential(BatchPolicy::default())
    }
}

impl Dispatcher {
    pub fn new(concurrency: NonZeroUsize, policy: BatchPolicy) -> Self {
        Self {
            concurrency,
            policy,
        }
    }

    pub fn sequential(policy: BatchPolicy) -> Self {
        Self::new(NonZeroUsize::MIN, policy)
    }

    pub fn concurrency(&self) -> NonZeroUsize {
        self.concurrency
    }

    pub fn policy(&self) -> BatchPolicy {
        self.policy
    }

    /// Dispatch under the configured policy.
    pub async fn run<T, R, E, F, Fut>(
        &self,
        items: Vec<T>,
        operation: F,
    ) -> Result<BatchReport<R, E>, BatchError<E>>
    where
        F: FnMut(T) -> Fut,
        Fut: Future<Output = Result<R, E>>,
        E: std::error::Error + 'static,
    {
        match self.policy {
            BatchPolicy::FailFast => self.try_all(items, operation).await.map(BatchReport::Completed),
            BatchPolicy::BestEffort => Ok(BatchReport::Outcomes(self.each(items, operation).await)),
        }
    }

    /// Fail-fast: all results, or the first failure by input position.
    ///
    /// Operations still in flight when a failure surfaces are dropped.
    pub async fn try_all<T, R, E, F, Fut>(
        &self,
        items: Vec<T>,
        mut operation: F,
    ) -> Result<Vec<R>, BatchError<E>>
    where
        F: FnMut(T) -> Fut,
        Fut: Future<Output = Result<R, E>>,
        E: std::error::Error + 'static,
    {
        let total = items.len();
        let mut results = stream::iter(items.into_iter().enumerate())
            .map(|(index, item)| {
                let pending = operation(item);
                async move { (index, pending.await) }
            })
            .buffered(self.concurrency.get());

        let mut collected = Vec::with_capacity(total);
        while let Some((index, result)) = results.next().await {
            match result {
                Ok(value) => collected.push(value),
                Err(source) => {
                    tracing::warn!(index, total, error = %source, "batch aborted");
                    return Err(BatchError { index, source });
                }
            }
        }

        tracing::debug!(total, "batch completed");
        Ok(collected)
    }

    /// Best-effort: one outcome per item, in input order.
    pub async fn each<T, R, E, F, Fut>(
        &self,
        items: Vec<T>,
        mut operation: F,
    ) -> Vec<ItemOutcome<R, E>>
    where
        F: FnMut(T) -> Fut,
        Fut: Future<Output = Result<R, E>>,
        E: fmt::Display,
    {
        let total = items.len();
        let outcomes = stream::iter(items.into_iter().enumerate())
            .map(|(index, item)| {
                let pending = operation(item);
                async move {
                    match pending.await {
                        Ok(result) => ItemOutcome::Ok { index, result },
                        Err(error) => {
                            tracing::warn!(index, total, error = %error, "batch item failed");
                            ItemOutcome::Failed { index, error }
                        }
                    }
                }
            })
            .buffered(self.concurrency.get())
            .collect::<Vec<_>>()
            .await;

        let failed = outcomes.iter().filter(|outcome| !outcome.is_ok()).count();
        tracing::debug!(total, failed, "batch finished");
        outcomes
    }
}
