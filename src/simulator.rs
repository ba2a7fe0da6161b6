//! The event-loop core: merges the market-data, action, and strategy-update queues, maintains the
//! resting-order ladders, and produces own-trade executions.

use std::collections::HashMap;

use crate::{
    error::SimError,
    ladder::{price_to_tick, PriceLadder},
    queue::{ActionQueue, MdQueue, TimeQueue, NO_EVENT},
    types::{
        Action, CancelOrder, ExecKind, MdUpdate, Order, OrderId, OwnTrade, Side, StrategyEvent,
        TradeId,
    },
};

/// Builds a [`Simulator`], validating latencies before producing a runnable instance.
pub struct SimulatorBuilder {
    market_data: Vec<MdUpdate>,
    execution_latency: Option<i64>,
    md_latency: Option<i64>,
    tick_size: f64,
}

impl SimulatorBuilder {
    pub fn new() -> Self {
        Self {
            market_data: Vec::new(),
            execution_latency: None,
            md_latency: None,
            tick_size: 1e-8,
        }
    }

    pub fn market_data(mut self, market_data: Vec<MdUpdate>) -> Self {
        self.market_data = market_data;
        self
    }

    pub fn execution_latency(mut self, latency: i64) -> Self {
        self.execution_latency = Some(latency);
        self
    }

    pub fn md_latency(mut self, latency: i64) -> Self {
        self.md_latency = Some(latency);
        self
    }

    /// Sets the granularity at which prices are bucketed into ladder levels. Does not affect
    /// prices reported on fills, only how resting orders are grouped for matching.
    pub fn tick_size(mut self, tick_size: f64) -> Self {
        self.tick_size = tick_size;
        self
    }

    pub fn build(self) -> Result<Simulator, SimError> {
        let execution_latency = self.execution_latency.unwrap_or(0);
        let md_latency = self.md_latency.unwrap_or(0);
        if execution_latency < 0 {
            return Err(SimError::InvalidOrder {
                reason: "execution_latency must be non-negative",
            });
        }
        if md_latency < 0 {
            return Err(SimError::InvalidOrder {
                reason: "md_latency must be non-negative",
            });
        }
        Ok(Simulator {
            md_queue: MdQueue::new(self.market_data),
            action_queue: ActionQueue::new(),
            strategy_updates: TimeQueue::new(),
            bid_ladder: PriceLadder::new(Side::Bid),
            ask_ladder: PriceLadder::new(Side::Ask),
            orders: HashMap::new(),
            last_order: None,
            best_bid: f64::NEG_INFINITY,
            best_ask: f64::INFINITY,
            last_trade_bid_side_price: None,
            last_trade_ask_side_price: None,
            last_md_exchange_ts: i64::MIN,
            next_order_id: 0,
            next_trade_id: 0,
            execution_latency,
            md_latency,
            tick_size: self.tick_size,
        })
    }
}

impl Default for SimulatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The simulator core. Single-threaded, pure in `(market data, strategy actions, parameters)`.
pub struct Simulator {
    md_queue: MdQueue,
    action_queue: ActionQueue,
    strategy_updates: TimeQueue,
    bid_ladder: PriceLadder,
    ask_ladder: PriceLadder,
    orders: HashMap<OrderId, Order>,
    /// Single-slot staging area for the most recently arrived placement, tried aggressively
    /// before it is ever allowed to rest. Prevents a fresh order from matching against the same
    /// market event that delivered it.
    last_order: Option<Order>,
    best_bid: f64,
    best_ask: f64,
    /// Last trade print price with aggressor side Bid (lifted the ask); matched against the ask
    /// ladder.
    last_trade_bid_side_price: Option<f64>,
    /// Last trade print price with aggressor side Ask (hit the bid); matched against the bid
    /// ladder.
    last_trade_ask_side_price: Option<f64>,
    last_md_exchange_ts: i64,
    next_order_id: OrderId,
    next_trade_id: TradeId,
    execution_latency: i64,
    md_latency: i64,
    tick_size: f64,
}

impl Simulator {
    pub fn builder() -> SimulatorBuilder {
        SimulatorBuilder::new()
    }

    pub fn best_bid(&self) -> f64 {
        self.best_bid
    }

    pub fn best_ask(&self) -> f64 {
        self.best_ask
    }

    /// Places a new order. `ts` is the strategy's own clock; the order is scheduled to arrive at
    /// the exchange at `ts + execution_latency`.
    pub fn place_order(
        &mut self,
        ts: i64,
        size: f64,
        side: Side,
        price: f64,
    ) -> Result<Order, SimError> {
        if !(size > 0.0) {
            return Err(SimError::InvalidOrder {
                reason: "size must be positive",
            });
        }
        if !price.is_finite() {
            return Err(SimError::InvalidOrder {
                reason: "price must be finite",
            });
        }
        let order_id = self.next_order_id;
        self.next_order_id += 1;
        let order = Order {
            place_ts: ts,
            exchange_ts: ts + self.execution_latency,
            order_id,
            side,
            size,
            price,
        };
        self.action_queue.append(Action::Place(order));
        Ok(order)
    }

    /// Schedules a cancellation. Cancelling an order that has already filled, already been
    /// cancelled, or never existed is resolved silently at execution time.
    pub fn cancel_order(&mut self, ts: i64, order_id: OrderId) -> CancelOrder {
        let cancel = CancelOrder {
            exchange_ts: ts + self.execution_latency,
            order_id,
        };
        self.action_queue.append(Action::Cancel(cancel));
        cancel
    }

    /// Drives simulated time forward and returns the next batch of updates due to the strategy.
    ///
    /// Returns `Err(SimError::EndOfData)` once every queue is exhausted.
    pub fn tick(&mut self) -> Result<(i64, Vec<StrategyEvent>), SimError> {
        loop {
            let t_strat = self.strategy_updates.peek_ts();
            let t_md = self.md_queue.peek_ts();
            let t_act = self.action_queue.peek_ts();

            if t_md == NO_EVENT && t_act == NO_EVENT {
                break;
            }
            if t_strat < t_md.min(t_act) {
                break;
            }

            if t_md <= t_act {
                let md = self.md_queue.pop_front().expect("peeked non-empty md queue");
                self.handle_md(md)?;
            } else {
                let action = self
                    .action_queue
                    .pop_front()
                    .expect("peeked non-empty action queue");
                self.handle_action(action);
            }
        }

        match self.strategy_updates.pop_min() {
            Some((ts, batch)) => Ok((ts, batch)),
            None => Err(SimError::EndOfData),
        }
    }

    fn handle_md(&mut self, md: MdUpdate) -> Result<(), SimError> {
        let exchange_ts = md.exchange_ts();
        match &md {
            MdUpdate::Snapshot(snapshot) => {
                let best_bid = snapshot
                    .best_bid()
                    .ok_or(SimError::MalformedUpdate { exchange_ts })?;
                let best_ask = snapshot
                    .best_ask()
                    .ok_or(SimError::MalformedUpdate { exchange_ts })?;
                self.best_bid = best_bid;
                self.best_ask = best_ask;
            }
            MdUpdate::Trade(trade) => match trade.side {
                Side::Bid => self.last_trade_bid_side_price = Some(trade.price),
                Side::Ask => self.last_trade_ask_side_price = Some(trade.price),
            },
        }
        self.last_md_exchange_ts = exchange_ts;
        let receive_ts = md.receive_ts();
        tracing::debug!(exchange_ts, receive_ts, "market data event delivered");
        self.strategy_updates.push(receive_ts, StrategyEvent::Md(md));
        self.book_matching_pass();
        Ok(())
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Place(order) => {
                self.last_order = Some(order);
            }
            Action::Cancel(cancel) => {
                let erased = self.bid_ladder.erase(cancel.order_id) || self.ask_ladder.erase(cancel.order_id);
                if erased {
                    self.orders.remove(&cancel.order_id);
                } else {
                    tracing::warn!(
                        order_id = cancel.order_id,
                        "cancel of unknown or already-settled order id ignored"
                    );
                }
            }
        }
        self.execute_last_order();
    }

    /// Tries the staged order aggressively against the current touch; rests it otherwise.
    fn execute_last_order(&mut self) {
        let Some(order) = self.last_order.take() else {
            return;
        };
        let crosses = match order.side {
            Side::Bid => order.price >= self.best_ask,
            Side::Ask => order.price <= self.best_bid,
        };
        if crosses {
            let executed_price = match order.side {
                Side::Bid => self.best_ask,
                Side::Ask => self.best_bid,
            };
            self.emit_fill(&order, executed_price, ExecKind::Book);
        } else {
            let tick = price_to_tick(order.price, self.tick_size);
            match order.side {
                Side::Bid => self.bid_ladder.insert(order.order_id, tick),
                Side::Ask => self.ask_ladder.insert(order.order_id, tick),
            }
            self.orders.insert(order.order_id, order);
        }
    }

    /// Sweeps both ladders against the current touch (BOOK) and then against the latest trade
    /// prints (TRADE), in that order, matching the emission order the ladder's FIFO buckets give
    /// for free.
    fn book_matching_pass(&mut self) {
        let mut book_fills = Vec::new();
        if self.best_ask.is_finite() {
            let ask_tick = price_to_tick(self.best_ask, self.tick_size);
            book_fills.extend(self.bid_ladder.ids_ge(ask_tick).map(|id| (id, Side::Bid)));
        }
        if self.best_bid.is_finite() {
            let bid_tick = price_to_tick(self.best_bid, self.tick_size);
            book_fills.extend(self.ask_ladder.ids_le(bid_tick).map(|id| (id, Side::Ask)));
        }
        for (order_id, side) in book_fills {
            self.execute_resting(order_id, side, ExecKind::Book);
        }

        let mut trade_fills = Vec::new();
        if let Some(price) = self.last_trade_ask_side_price {
            let tick = price_to_tick(price, self.tick_size);
            trade_fills.extend(self.bid_ladder.ids_ge(tick).map(|id| (id, Side::Bid)));
        }
        if let Some(price) = self.last_trade_bid_side_price {
            let tick = price_to_tick(price, self.tick_size);
            trade_fills.extend(self.ask_ladder.ids_le(tick).map(|id| (id, Side::Ask)));
        }
        for (order_id, side) in trade_fills {
            self.execute_resting(order_id, side, ExecKind::Trade);
        }

        self.last_trade_bid_side_price = None;
        self.last_trade_ask_side_price = None;
    }

    fn execute_resting(&mut self, order_id: OrderId, side: Side, exec: ExecKind) {
        let ladder = match side {
            Side::Bid => &mut self.bid_ladder,
            Side::Ask => &mut self.ask_ladder,
        };
        if !ladder.erase(order_id) {
            return;
        }
        let Some(order) = self.orders.remove(&order_id) else {
            return;
        };
        let price = order.price;
        self.emit_fill(&order, price, exec);
    }

    fn emit_fill(&mut self, order: &Order, price: f64, exec: ExecKind) {
        let trade_id = self.next_trade_id;
        self.next_trade_id += 1;
        let exchange_ts = self.last_md_exchange_ts;
        let own_trade = OwnTrade {
            place_ts: order.place_ts,
            exchange_ts,
            receive_ts: exchange_ts + self.md_latency,
            trade_id,
            order_id: order.order_id,
            side: order.side,
            size: order.size,
            price,
            exec,
        };
        tracing::debug!(
            order_id = own_trade.order_id,
            trade_id,
            ?exec,
            price,
            "own order filled"
        );
        self.strategy_updates
            .push(own_trade.receive_ts, StrategyEvent::Fill(own_trade));
    }
}
