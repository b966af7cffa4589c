//! # StreamBox Testing
//!
//! Testing utilities and helpers for the StreamBox client.
//!
//! This crate provides:
//! - [`ReducerTest`]: Given-When-Then builder for reducers
//! - Effect assertions
//! - [`FixedClock`] for deterministic time
//! - [`helpers::run_effects`] to drive effects without a Store
//!
//! Mock implementations of the client's provider traits live next to the
//! traits, in `streambox::mocks`.
//!
//! ## Example
//!
//! ```ignore
//! use streambox_testing::{ReducerTest, assertions};
//!
//! ReducerTest::new(ThemeReducer)
//!     .with_env(test_environment())
//!     .given_state(ThemeState::default())
//!     .when_action(ThemeAction::Set(ThemePreference::Dark))
//!     .then_state(|s| assert_eq!(s.preference, ThemePreference::Dark))
//!     .then_effects(assertions::assert_has_future_effect)
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use streambox_core::environment::Clock;

pub mod reducer_test;

pub use reducer_test::{assertions, ReducerTest};

/// Mock implementations of core Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use streambox_testing::mocks::FixedClock;
    /// use streambox_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Test helpers and utilities
pub mod helpers {
    use futures::future::{BoxFuture, FutureExt};
    use streambox_core::effect::Effect;

    /// Execute effects in place and collect the actions they produce.
    ///
    /// Parallel effects are awaited together and reported in declaration
    /// order; delays are skipped. Produced actions are NOT reduced, which
    /// lets a test assert on exactly what an effect answers.
    pub fn run_effects<A>(effects: Vec<Effect<A>>) -> BoxFuture<'static, Vec<A>>
    where
        A: Send + 'static,
    {
        async move {
            let mut actions = Vec::new();
            for effect in effects {
                match effect {
                    Effect::None => {},
                    Effect::Future(fut) => actions.extend(fut.await),
                    Effect::Delay { action, .. } => actions.push(*action),
                    Effect::Sequential(inner) => actions.extend(run_effects(inner).await),
                    Effect::Parallel(inner) => {
                        let branches = inner.into_iter().map(|e| run_effects(vec![e]));
                        for produced in futures::future::join_all(branches).await {
                            actions.extend(produced);
                        }
                    },
                }
            }
            actions
        }
        .boxed()
    }

    /// Install a test-friendly tracing subscriber (idempotent).
    pub fn init_test_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "warn".into()),
            )
            .with_test_writer()
            .try_init();
    }
}

// Re-export commonly used items
pub use mocks::{test_clock, FixedClock};
