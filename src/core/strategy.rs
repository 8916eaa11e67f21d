//! Ordered fallback chains
//!
//! Both the metrics negotiation and the server-then-local export are lists
//! of strategies with the same `attempt -> Result` shape. [`first_success`]
//! walks such a list in order and stops at the first success, or at the first
//! error the caller classifies as fatal.

use std::fmt::Display;
use std::future::Future;

/// Result of driving a chain to completion
#[derive(Debug)]
pub struct ChainSuccess<T, S> {
    /// Value produced by the winning strategy
    pub value: T,
    /// The strategy that produced it
    pub strategy: S,
    /// 1-based attempt number of the winner
    pub attempts: usize,
    /// `strategy: error` for each strategy that failed before the winner
    pub failures: Vec<String>,
}

/// Why a chain produced no value
#[derive(Debug)]
pub enum ChainFailure<E> {
    /// A strategy returned an error classified as fatal; nothing after it ran
    Aborted { error: E, attempts: usize },
    /// Every strategy failed; carries the last error
    Exhausted { last_error: Option<E>, attempts: usize },
}

impl<E> ChainFailure<E> {
    pub fn attempts(&self) -> usize {
        match self {
            ChainFailure::Aborted { attempts, .. } | ChainFailure::Exhausted { attempts, .. } => {
                *attempts
            }
        }
    }
}

/// Try `strategies` in order until one succeeds
///
/// `attempt` runs a single strategy. `is_fatal` decides whether an error stops
/// the chain instead of advancing it.
///
/// # Example
///
/// ```
/// use vaultflow::core::strategy::first_success;
///
/// # async fn example() {
/// let result = first_success(
///     "demo",
///     vec![1u32, 2, 3],
///     |n| async move { if n == 2 { Ok(n * 10) } else { Err(format!("{n} rejected")) } },
///     |_e: &String| false,
/// )
/// .await
/// .unwrap();
///
/// assert_eq!(result.value, 20);
/// assert_eq!(result.attempts, 2);
/// # }
/// ```
pub async fn first_success<S, T, E, F, Fut, P>(
    chain: &str,
    strategies: impl IntoIterator<Item = S>,
    mut attempt: F,
    is_fatal: P,
) -> Result<ChainSuccess<T, S>, ChainFailure<E>>
where
    S: Clone + Display,
    E: Display,
    F: FnMut(S) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
{
    let strategies: Vec<S> = strategies.into_iter().collect();
    let total = strategies.len();
    let mut last_error = None;
    let mut failures = Vec::new();
    let mut attempts = 0;

    for strategy in strategies {
        attempts += 1;
        let name = strategy.to_string();
        crate::log_candidate_attempt!(chain, attempts, total, name.as_str());

        match attempt(strategy.clone()).await {
            Ok(value) => {
                return Ok(ChainSuccess {
                    value,
                    strategy,
                    attempts,
                    failures,
                });
            }
            Err(error) if is_fatal(&error) => {
                tracing::warn!(
                    chain = chain,
                    strategy = %name,
                    error = %error,
                    "Strategy failed fatally, aborting chain"
                );
                return Err(ChainFailure::Aborted { error, attempts });
            }
            Err(error) => {
                tracing::debug!(
                    chain = chain,
                    strategy = %name,
                    error = %error,
                    "Strategy failed, advancing"
                );
                failures.push(format!("{name}: {error}"));
                last_error = Some(error);
            }
        }
    }

    Err(ChainFailure::Exhausted {
        last_error,
        attempts,
    })
}
