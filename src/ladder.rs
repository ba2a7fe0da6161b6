//! Price-indexed resting-order ladder, one per side.
//!
//! Mirrors the role of `PriorHeap` in the original optimized simulator: rather than scanning every
//! resting order on each market-data event, orders are bucketed by price so that a crossing query
//! only has to touch the price levels that actually cross, plus the ids within them.

use std::collections::{BTreeMap, HashMap, VecDeque};

use crate::types::{OrderId, Side};

/// An integer price tick. Ticks order the same way the underlying `f64` prices do, which lets the
/// ladder use a plain `BTreeMap` instead of carrying an `Ord` wrapper for floats around.
pub type Tick = i64;

pub fn price_to_tick(price: f64, tick_size: f64) -> Tick {
    (price / tick_size).round() as Tick
}

pub fn tick_to_price(tick: Tick, tick_size: f64) -> f64 {
    tick as f64 * tick_size
}

/// Resting orders for one side of the book, indexed by price tick.
///
/// Each price bucket is a `VecDeque` so that orders resting at the same level are visited in the
/// order they were inserted (FIFO by placement), and an interior cancel can be removed without
/// disturbing that order.
#[derive(Debug)]
pub struct PriceLadder {
    side: Side,
    buckets: BTreeMap<Tick, VecDeque<OrderId>>,
    index: HashMap<OrderId, Tick>,
}

impl PriceLadder {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            buckets: BTreeMap::new(),
            index: HashMap::new(),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, order_id: OrderId) -> bool {
        self.index.contains_key(&order_id)
    }

    /// Inserts a resting order at `tick`. Caller must not insert an id already present.
    pub fn insert(&mut self, order_id: OrderId, tick: Tick) {
        self.buckets.entry(tick).or_default().push_back(order_id);
        self.index.insert(order_id, tick);
    }

    /// Removes `order_id` from the ladder, wherever it rests. Returns `true` if it was present.
    pub fn erase(&mut self, order_id: OrderId) -> bool {
        let Some(tick) = self.index.remove(&order_id) else {
            return false;
        };
        if let Some(bucket) = self.buckets.get_mut(&tick) {
            if let Some(pos) = bucket.iter().position(|id| *id == order_id) {
                bucket.remove(pos);
            }
            if bucket.is_empty() {
                self.buckets.remove(&tick);
            }
        }
        true
    }

    /// All resting order ids at a tick greater than or equal to `tick`, in (price, then
    /// insertion) order. Used on the bid ladder to find bids marketable against an ask at `tick`.
    pub fn ids_ge(&self, tick: Tick) -> impl Iterator<Item = OrderId> + '_ {
        self.buckets
            .range(tick..)
            .flat_map(|(_, bucket)| bucket.iter().copied())
    }

    /// All resting order ids at a tick less than or equal to `tick`, in (price, then insertion)
    /// order. Used on the ask ladder to find asks marketable against a bid at `tick`.
    pub fn ids_le(&self, tick: Tick) -> impl Iterator<Item = OrderId> + '_ {
        self.buckets
            .range(..=tick)
            .flat_map(|(_, bucket)| bucket.iter().copied())
    }
}
