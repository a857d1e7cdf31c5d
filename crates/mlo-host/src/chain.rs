//! Ordered fallback over a list of providers.
//!
//! Each provider is tried in insertion order. A provider either yields a
//! value (the chain stops), yields nothing (`Ok(None)`, try the next one), or
//! fails (the error is recorded, try the next one). The outcome carries the
//! value, the name of the provider that produced it, and every failure seen
//! on the way.
//!
//! # Example
//!
//! ```
//! use mlo_host::chain::FallbackChain;
//!
//! let outcome = FallbackChain::new()
//!     .provider("native", || Err::<Option<u32>, _>("offline"))
//!     .provider("local", || Ok(Some(7)))
//!     .run();
//!
//! assert_eq!(outcome.value, Some(7));
//! assert_eq!(outcome.provider, Some("local"));
//! assert_eq!(outcome.failures.len(), 1);
//! ```

use std::fmt::Display;

use tracing::warn;

type ProviderFn<'a, T, E> = Box<dyn FnOnce() -> Result<Option<T>, E> + 'a>;

/// A failed provider and its error.
#[derive(Debug)]
pub struct ChainFailure<E> {
    pub provider: &'static str,
    pub error: E,
}

/// Result of running a [`FallbackChain`].
#[derive(Debug)]
pub struct ChainOutcome<T, E> {
    /// The first value produced, if any provider produced one.
    pub value: Option<T>,
    /// Name of the provider that produced `value`.
    pub provider: Option<&'static str>,
    /// Failures from providers tried before (or instead of) the winner.
    pub failures: Vec<ChainFailure<E>>,
}

impl<T, E: Display> ChainOutcome<T, E> {
    /// Log every recorded failure as a warning under `context`.
    pub fn log_failures(&self, context: &str) {
        for failure in &self.failures {
            warn!(
                target: "mlo.host",
                context,
                provider = failure.provider,
                error = %failure.error,
                "provider failed, falling back"
            );
        }
    }
}

/// Builder for an ordered list of providers.
pub struct FallbackChain<'a, T, E> {
    providers: Vec<(&'static str, ProviderFn<'a, T, E>)>,
}

impl<T, E> Default for FallbackChain<'_, T, E> {
    fn default() -> Self {
        Self {
            providers: Vec::new(),
        }
    }
}

impl<'a, T, E> FallbackChain<'a, T, E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a provider.
    #[must_use]
    pub fn provider(
        mut self,
        name: &'static str,
        f: impl FnOnce() -> Result<Option<T>, E> + 'a,
    ) -> Self {
        self.providers.push((name, Box::new(f)));
        self
    }

    /// Append a provider only when `enabled` is true.
    #[must_use]
    pub fn provider_if(
        self,
        enabled: bool,
        name: &'static str,
        f: impl FnOnce() -> Result<Option<T>, E> + 'a,
    ) -> Self {
        if enabled { self.provider(name, f) } else { self }
    }

    /// Number of providers queued.
    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Try providers in order until one yields a value.
    pub fn run(self) -> ChainOutcome<T, E> {
        let mut failures = Vec::new();
        for (name, provider) in self.providers {
            match provider() {
                Ok(Some(value)) => {
                    return ChainOutcome {
                        value: Some(value),
                        provider: Some(name),
                        failures,
                    };
                }
                Ok(None) => {}
                Err(error) => failures.push(ChainFailure {
                    provider: name,
                    error,
                }),
            }
        }
        ChainOutcome {
            value: None,
            provider: None,
            failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn first_value_wins_and_later_providers_do_not_run() {
        let ran_last = Cell::new(false);
        let outcome = FallbackChain::<_, String>::new()
            .provider("a", || Ok(Some(1)))
            .provider("b", || {
                ran_last.set(true);
                Ok(Some(2))
            })
            .run();
        assert_eq!(outcome.value, Some(1));
        assert_eq!(outcome.provider, Some("a"));
        assert!(!ran_last.get());
    }

    #[test]
    fn none_moves_on_without_recording_failure() {
        let outcome = FallbackChain::<_, String>::new()
            .provider("empty", || Ok(None))
            .provider("full", || Ok(Some("x")))
            .run();
        assert_eq!(outcome.value, Some("x"));
        assert!(outcome.failures.is_empty());
    }

    #[test]
    fn all_failures_are_aggregated() {
        let outcome = FallbackChain::<u8, &str>::new()
            .provider("a", || Err("one"))
            .provider("b", || Err("two"))
            .run();
        assert_eq!(outcome.value, None);
        assert_eq!(outcome.provider, None);
        let names: Vec<_> = outcome.failures.iter().map(|f| f.provider).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn disabled_provider_is_skipped() {
        let chain = FallbackChain::<u8, &str>::new()
            .provider_if(false, "native", || Ok(Some(1)))
            .provider("local", || Ok(Some(2)));
        assert_eq!(chain.len(), 1);
        assert_eq!(chain.run().provider, Some("local"));
    }

    #[test]
    fn empty_chain_yields_nothing() {
        let chain = FallbackChain::<u8, &str>::new();
        assert!(chain.is_empty());
        let outcome = chain.run();
        assert!(outcome.value.is_none());
        assert!(outcome.failures.is_empty());
    }
}
