//! Fetch-state machine shared by every remote-backed slice.
//!
//! A [`ResourceState`] tracks one fetchable resource (the trending list, the
//! search results, the currently viewed movie detail, ...):
//!
//! ```text
//! idle ──begin──▶ loading ──resolve──▶ succeeded
//!                    │                     │
//!                    └──reject──▶ failed ◀─┘ (on a later failed fetch)
//! ```
//!
//! `succeeded` and `failed` go back to `loading` on the next `begin`; there
//! is no terminal state.
//!
//! Every request is tagged with a [`RequestSeq`]. Only the most recently issued
//! sequence may commit a result, so when two requests race the last one
//! dispatched wins regardless of completion order. A request for the key that
//! is already in flight is coalesced instead of being issued twice.

use serde::{Deserialize, Serialize};

/// Lifecycle of a fetchable resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchStatus {
    /// Nothing requested yet, or the last request was cancelled
    #[default]
    Idle,
    /// A request is in flight
    Loading,
    /// The last committed request succeeded
    Succeeded,
    /// The last committed request failed
    Failed,
}

/// Sequence number identifying one request for a resource.
///
/// Sequence numbers increase monotonically per resource and are carried in
/// the result action so the reducer can tell whether the response is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestSeq(u64);

impl RequestSeq {
    /// Raw sequence value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for RequestSeq {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct InFlight {
    seq: RequestSeq,
    key: String,
}

/// Data of a remote resource plus its fetch status.
///
/// Invariant: `error` is `Some` iff `status == Failed`, and
/// `status == Loading` iff a request is in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceState<T> {
    /// Last successfully fetched value (stale-but-available after a failure)
    pub data: T,
    status: FetchStatus,
    error: Option<String>,
    in_flight: Option<InFlight>,
    last_seq: u64,
}

impl<T: Default> Default for ResourceState<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> ResourceState<T> {
    /// Create an idle resource holding `data`.
    #[must_use]
    pub const fn new(data: T) -> Self {
        Self {
            data,
            status: FetchStatus::Idle,
            error: None,
            in_flight: None,
            last_seq: 0,
        }
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> FetchStatus {
        self.status
    }

    /// Human-readable message of the last failure.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether a request is currently in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.status, FetchStatus::Loading)
    }

    /// Request key of the in-flight request, if any.
    #[must_use]
    pub fn in_flight_key(&self) -> Option<&str> {
        self.in_flight.as_ref().map(|f| f.key.as_str())
    }

    /// Start a request for `key`.
    ///
    /// Returns `None` when a request for the identical key is already in
    /// flight; the caller must not issue it again. Otherwise a fresh sequence
    /// number is issued, superseding any in-flight request for another key.
    pub fn begin(&mut self, key: impl Into<String>) -> Option<RequestSeq> {
        let key = key.into();

        if self.in_flight.as_ref().is_some_and(|f| f.key == key) {
            return None;
        }

        self.last_seq += 1;
        let seq = RequestSeq(self.last_seq);
        self.in_flight = Some(InFlight { seq, key });
        self.status = FetchStatus::Loading;
        self.error = None;
        Some(seq)
    }

    /// Whether `seq` is the request currently allowed to commit.
    #[must_use]
    pub fn is_current(&self, seq: RequestSeq) -> bool {
        self.in_flight.as_ref().is_some_and(|f| f.seq == seq)
    }

    /// Commit a successful response, replacing data wholesale.
    ///
    /// Returns `false` (and changes nothing) if the response is stale.
    pub fn resolve(&mut self, seq: RequestSeq, data: T) -> bool {
        if !self.is_current(seq) {
            return false;
        }
        self.in_flight = None;
        self.data = data;
        self.status = FetchStatus::Succeeded;
        self.error = None;
        true
    }

    /// Commit a failed response, keeping the previous data.
    ///
    /// Returns `false` (and changes nothing) if the response is stale.
    pub fn reject(&mut self, seq: RequestSeq, message: impl Into<String>) -> bool {
        if !self.is_current(seq) {
            return false;
        }
        self.in_flight = None;
        self.status = FetchStatus::Failed;
        self.error = Some(message.into());
        true
    }

    /// Drop the in-flight request and return to idle without an error.
    ///
    /// Responses for the dropped request will be discarded as stale.
    pub fn cancel(&mut self) {
        self.in_flight = None;
        self.status = FetchStatus::Idle;
        self.error = None;
    }

    /// Clear a failure message without touching data or in-flight state.
    pub fn clear_error(&mut self) {
        if self.status == FetchStatus::Failed {
            self.status = FetchStatus::Idle;
        }
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_begin_moves_to_loading() {
        let mut resource = ResourceState::<Vec<u32>>::default();
        assert_eq!(resource.status(), FetchStatus::Idle);

        let seq = resource.begin("trending:1");
        assert!(seq.is_some());
        assert!(resource.is_loading());
        assert_eq!(resource.in_flight_key(), Some("trending:1"));
    }

    #[test]
    fn test_identical_key_is_coalesced() {
        let mut resource = ResourceState::<Vec<u32>>::default();
        let first = resource.begin("popular:1");
        let second = resource.begin("popular:1");

        assert!(first.is_some());
        assert!(second.is_none());
    }

    #[test]
    fn test_last_dispatched_wins() {
        let mut resource = ResourceState::<Vec<u32>>::default();
        let a = resource.begin("search:bat").unwrap_or_else(|| unreachable!());
        let b = resource.begin("search:batman").unwrap_or_else(|| unreachable!());

        assert!(resource.resolve(b, vec![2]));
        assert!(!resource.resolve(a, vec![1]));
        assert_eq!(resource.data, vec![2]);
        assert_eq!(resource.status(), FetchStatus::Succeeded);
    }

    #[test]
    fn test_stale_response_discarded_before_newer_completes() {
        let mut resource = ResourceState::<Vec<u32>>::default();
        let a = resource.begin("a").unwrap_or_else(|| unreachable!());
        let b = resource.begin("b").unwrap_or_else(|| unreachable!());

        assert!(!resource.resolve(a, vec![1]));
        assert!(resource.is_loading());
        assert!(resource.resolve(b, vec![2]));
        assert_eq!(resource.data, vec![2]);
    }

    #[test]
    fn test_reject_keeps_previous_data() {
        let mut resource = ResourceState::new(vec![7]);
        let seq = resource.begin("k").unwrap_or_else(|| unreachable!());

        assert!(resource.reject(seq, "Network error"));
        assert_eq!(resource.status(), FetchStatus::Failed);
        assert_eq!(resource.error(), Some("Network error"));
        assert_eq!(resource.data, vec![7]);
    }

    #[test]
    fn test_refetch_after_failure_clears_error() {
        let mut resource = ResourceState::<Vec<u32>>::default();
        let seq = resource.begin("k").unwrap_or_else(|| unreachable!());
        resource.reject(seq, "boom");

        let _ = resource.begin("k");
        assert!(resource.is_loading());
        assert_eq!(resource.error(), None);
    }

    #[test]
    fn test_cancel_discards_in_flight() {
        let mut resource = ResourceState::<Vec<u32>>::default();
        let seq = resource.begin("k").unwrap_or_else(|| unreachable!());
        resource.cancel();

        assert_eq!(resource.status(), FetchStatus::Idle);
        assert!(!resource.resolve(seq, vec![1]));
        assert!(resource.data.is_empty());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Begin(u8),
        Resolve(usize),
        Reject(usize),
        Cancel,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u8..3).prop_map(Op::Begin),
            (0usize..8).prop_map(Op::Resolve),
            (0usize..8).prop_map(Op::Reject),
            Just(Op::Cancel),
        ]
    }

    proptest! {
        #[test]
        fn error_present_iff_failed(ops in proptest::collection::vec(op(), 0..40)) {
            let mut resource = ResourceState::<u32>::default();
            let mut issued: Vec<RequestSeq> = Vec::new();

            for op in ops {
                match op {
                    Op::Begin(key) => {
                        if let Some(seq) = resource.begin(key.to_string()) {
                            issued.push(seq);
                        }
                    }
                    Op::Resolve(i) => {
                        if let Some(seq) = issued.get(i).copied() {
                            resource.resolve(seq, 1);
                        }
                    }
                    Op::Reject(i) => {
                        if let Some(seq) = issued.get(i).copied() {
                            resource.reject(seq, "failed");
                        }
                    }
                    Op::Cancel => resource.cancel(),
                }

                prop_assert_eq!(resource.error().is_some(), resource.status() == FetchStatus::Failed);
                prop_assert_eq!(resource.is_loading(), resource.in_flight_key().is_some());
            }
        }
    }
}
