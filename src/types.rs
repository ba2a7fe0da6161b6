//! Plain value types shared by the ladder, the queues, and the simulator core.

/// An order id, assigned by the simulator when `place_order` is called.
pub type OrderId = u64;

/// A trade id, assigned by the simulator when an own-trade execution is produced.
pub type TradeId = u64;

/// Which side of the book an order or print sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Bid,
    Ask,
}

impl Side {
    /// The opposite side, used when looking up the touch an order can cross.
    pub fn opposite(self) -> Side {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }
}

/// Tags an [`OwnTrade`] with why it executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecKind {
    /// Filled because the quoted book moved through the order's price.
    Book,
    /// Filled because an anonymous market-trade print swept through the order's price.
    Trade,
}

/// A single (price, size) level, ask levels ascending, bid levels descending.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Level {
    pub price: f64,
    pub size: f64,
}

/// A full order-book snapshot as replayed from the market-data stream.
///
/// Only level 0 (`asks[0]`, `bids[0]`) is read by the simulator; deeper levels are carried for
/// strategies that want to look further into the book.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBookSnapshot {
    pub exchange_ts: i64,
    pub receive_ts: i64,
    pub asks: Vec<Level>,
    pub bids: Vec<Level>,
}

impl OrderBookSnapshot {
    pub fn best_ask(&self) -> Option<f64> {
        self.asks.first().map(|l| l.price)
    }

    pub fn best_bid(&self) -> Option<f64> {
        self.bids.first().map(|l| l.price)
    }
}

/// An anonymous market trade print.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnonTrade {
    pub exchange_ts: i64,
    pub receive_ts: i64,
    pub side: Side,
    pub size: f64,
    pub price: f64,
}

/// One market-data event: either a book snapshot or a trade print, never both, never neither.
#[derive(Debug, Clone, PartialEq)]
pub enum MdUpdate {
    Snapshot(OrderBookSnapshot),
    Trade(AnonTrade),
}

impl MdUpdate {
    pub fn exchange_ts(&self) -> i64 {
        match self {
            MdUpdate::Snapshot(s) => s.exchange_ts,
            MdUpdate::Trade(t) => t.exchange_ts,
        }
    }

    pub fn receive_ts(&self) -> i64 {
        match self {
            MdUpdate::Snapshot(s) => s.receive_ts,
            MdUpdate::Trade(t) => t.receive_ts,
        }
    }
}

/// An own order placed by the strategy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Order {
    /// Strategy-side clock at the moment `place_order` was called.
    pub place_ts: i64,
    /// `place_ts + execution_latency`; when the exchange (the ladder) sees this order.
    pub exchange_ts: i64,
    pub order_id: OrderId,
    pub side: Side,
    pub size: f64,
    pub price: f64,
}

/// A cancellation request for a previously placed order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CancelOrder {
    /// `place_ts + execution_latency`; when the exchange sees this cancel.
    pub exchange_ts: i64,
    pub order_id: OrderId,
}

/// An in-flight action in the action queue: either a new placement or a cancellation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Place(Order),
    Cancel(CancelOrder),
}

impl Action {
    pub fn exchange_ts(&self) -> i64 {
        match self {
            Action::Place(o) => o.exchange_ts,
            Action::Cancel(c) => c.exchange_ts,
        }
    }
}

/// An execution of one of the strategy's own orders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OwnTrade {
    pub place_ts: i64,
    pub exchange_ts: i64,
    pub receive_ts: i64,
    pub trade_id: TradeId,
    pub order_id: OrderId,
    pub side: Side,
    pub size: f64,
    pub price: f64,
    pub exec: ExecKind,
}

/// One element of the batch returned by `Simulator::tick`.
#[derive(Debug, Clone, PartialEq)]
pub enum StrategyEvent {
    Md(MdUpdate),
    Fill(OwnTrade),
}

impl StrategyEvent {
    pub fn receive_ts(&self) -> i64 {
        match self {
            StrategyEvent::Md(md) => md.receive_ts(),
            StrategyEvent::Fill(t) => t.receive_ts,
        }
    }
}
