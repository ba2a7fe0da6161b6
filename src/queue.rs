//! The three event queues the simulator core drains: market data, pending actions, and the
//! timestamped strategy-update queue.

use std::collections::{BTreeMap, VecDeque};

use crate::types::{Action, MdUpdate, StrategyEvent};

/// Sentinel used for "no more events" when peeking an empty queue, matching the cache-aligned
/// event dispatcher's `i64::MAX` convention for an exhausted source.
pub const NO_EVENT: i64 = i64::MAX;

/// FIFO queue of market-data updates, populated once at construction from the replay stream.
#[derive(Debug, Default)]
pub struct MdQueue {
    inner: VecDeque<MdUpdate>,
}

impl MdQueue {
    pub fn new(events: impl IntoIterator<Item = MdUpdate>) -> Self {
        Self {
            inner: events.into_iter().collect(),
        }
    }

    pub fn peek_ts(&self) -> i64 {
        self.inner.front().map(MdUpdate::exchange_ts).unwrap_or(NO_EVENT)
    }

    pub fn pop_front(&mut self) -> Option<MdUpdate> {
        self.inner.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// FIFO queue of pending order placements and cancellations.
///
/// `append` enforces the same monotonic-timestamp contract the original queue wrapper does:
/// `place_order`/`cancel_order` add latency before enqueuing, so arrivals are already
/// non-decreasing in practice, but the assertion catches a caller bug early.
#[derive(Debug, Default)]
pub struct ActionQueue {
    inner: VecDeque<Action>,
    last_ts: i64,
}

impl ActionQueue {
    pub fn new() -> Self {
        Self {
            inner: VecDeque::new(),
            last_ts: i64::MIN,
        }
    }

    pub fn append(&mut self, action: Action) {
        let ts = action.exchange_ts();
        debug_assert!(
            ts >= self.last_ts,
            "action queue timestamps must be non-decreasing"
        );
        self.last_ts = ts;
        self.inner.push_back(action);
    }

    pub fn peek_ts(&self) -> i64 {
        self.inner.front().map(Action::exchange_ts).unwrap_or(NO_EVENT)
    }

    pub fn pop_front(&mut self) -> Option<Action> {
        self.inner.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// Timestamped min-priority queue of events awaiting delivery to the strategy.
///
/// Keyed by receive timestamp; within a bucket, insertion order is preserved. The cached minimum
/// key lets `peek_ts` avoid a tree descent on the hot path of the tick loop.
#[derive(Debug, Default)]
pub struct TimeQueue {
    buckets: BTreeMap<i64, Vec<StrategyEvent>>,
}

impl TimeQueue {
    pub fn new() -> Self {
        Self {
            buckets: BTreeMap::new(),
        }
    }

    pub fn push(&mut self, ts: i64, event: StrategyEvent) {
        self.buckets.entry(ts).or_default().push(event);
    }

    pub fn peek_ts(&self) -> i64 {
        self.buckets.keys().next().copied().unwrap_or(NO_EVENT)
    }

    /// Pops the bucket at the current minimum timestamp, if any.
    pub fn pop_min(&mut self) -> Option<(i64, Vec<StrategyEvent>)> {
        let ts = *self.buckets.keys().next()?;
        self.buckets.remove(&ts).map(|batch| (ts, batch))
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
