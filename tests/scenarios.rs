use lobsim::prelude::*;

fn snapshot(ts: i64, bid: f64, ask: f64) -> MdUpdate {
    MdUpdate::Snapshot(OrderBookSnapshot {
        exchange_ts: ts,
        receive_ts: ts,
        asks: vec![Level { price: ask, size: 1.0 }],
        bids: vec![Level { price: bid, size: 1.0 }],
    })
}

fn trade(ts: i64, side: Side, price: f64, size: f64) -> MdUpdate {
    MdUpdate::Trade(AnonTrade {
        exchange_ts: ts,
        receive_ts: ts,
        side,
        size,
        price,
    })
}

fn fills(batch: &[StrategyEvent]) -> Vec<OwnTrade> {
    batch
        .iter()
        .filter_map(|e| match e {
            StrategyEvent::Fill(t) => Some(*t),
            _ => None,
        })
        .collect()
}

#[test]
fn aggressive_marketable_bid_executes_on_arrival() {
    let mut sim = Simulator::builder()
        .market_data(vec![snapshot(100, 99.0, 101.0)])
        .build()
        .unwrap();
    sim.tick().unwrap();
    sim.place_order(100, 1.0, Side::Bid, 102.0).unwrap();

    let (_, batch) = sim.tick().unwrap();
    let f = fills(&batch);
    assert_eq!(f.len(), 1);
    assert_eq!(f[0].exec, ExecKind::Book);
    assert_eq!(f[0].price, 101.0);
}

#[test]
fn passive_order_fills_only_once_the_book_moves_through_it() {
    let mut sim = Simulator::builder()
        .market_data(vec![snapshot(100, 99.0, 101.0), snapshot(200, 98.5, 99.5)])
        .build()
        .unwrap();
    sim.tick().unwrap();
    sim.place_order(100, 1.0, Side::Ask, 100.0).unwrap();

    let (_, batch) = sim.tick().unwrap();
    assert!(fills(&batch).is_empty(), "order should not fill before the book reaches it");
}

#[test]
fn resting_order_fills_when_a_trade_print_sweeps_through_it() {
    let mut sim = Simulator::builder()
        .market_data(vec![snapshot(100, 99.0, 101.0), trade(200, Side::Ask, 98.0, 3.0)])
        .build()
        .unwrap();
    sim.tick().unwrap();
    sim.place_order(100, 1.0, Side::Bid, 98.5).unwrap();

    let (_, batch) = sim.tick().unwrap();
    let f = fills(&batch);
    assert_eq!(f.len(), 1);
    assert_eq!(f[0].exec, ExecKind::Trade);
    assert_eq!(f[0].price, 98.5);
}

#[test]
fn cancel_that_beats_the_market_move_prevents_the_fill() {
    let mut sim = Simulator::builder()
        .market_data(vec![snapshot(100, 99.0, 101.0), snapshot(200, 99.5, 100.0)])
        .build()
        .unwrap();
    sim.tick().unwrap();
    let order = sim.place_order(100, 1.0, Side::Bid, 100.0).unwrap();
    sim.cancel_order(100, order.order_id);

    let (_, batch) = sim.tick().unwrap();
    assert!(
        fills(&batch).is_empty(),
        "cancel arriving before the crossing market event must win"
    );
}

#[test]
fn cancel_that_loses_the_race_to_a_fill_is_a_silent_no_op() {
    let mut sim = Simulator::builder()
        .market_data(vec![snapshot(100, 99.0, 101.0), snapshot(200, 99.5, 100.0)])
        .build()
        .unwrap();
    sim.tick().unwrap();
    let order = sim.place_order(100, 1.0, Side::Bid, 100.0).unwrap();

    let (_, batch) = sim.tick().unwrap();
    assert_eq!(fills(&batch).len(), 1, "order fills on the book move");

    // The cancel was in flight concurrently; by the time it would have executed the order is
    // already gone. This must not panic or surface an error.
    sim.cancel_order(250, order.order_id);
    assert!(matches!(sim.tick(), Err(SimError::EndOfData)));
}

#[test]
fn fresh_arrival_does_not_match_against_the_event_that_delivered_it() {
    // A snapshot and a same-timestamp placement interleave; the new order must not be matched
    // against stale book state left over from before its own arrival was processed.
    let mut sim = Simulator::builder()
        .market_data(vec![snapshot(100, 99.0, 101.0)])
        .build()
        .unwrap();
    sim.tick().unwrap();
    // Marketable against the touch established by the snapshot just consumed.
    sim.place_order(100, 1.0, Side::Ask, 99.0).unwrap();

    let (_, batch) = sim.tick().unwrap();
    let f = fills(&batch);
    assert_eq!(f.len(), 1);
    assert_eq!(f[0].price, 99.0);
}

#[test]
fn multiple_orders_at_one_level_fill_in_placement_order() {
    let mut sim = Simulator::builder()
        .market_data(vec![
            snapshot(100, 99.0, 101.0),
            snapshot(150, 99.0, 101.0),
            snapshot(300, 99.5, 100.0),
        ])
        .build()
        .unwrap();
    sim.tick().unwrap();
    let a = sim.place_order(100, 1.0, Side::Bid, 100.0).unwrap();
    sim.tick().unwrap();
    let b = sim.place_order(160, 1.0, Side::Bid, 100.0).unwrap();

    let (_, batch) = sim.tick().unwrap();
    let f = fills(&batch);
    assert_eq!(f.len(), 2);
    assert_eq!(f[0].order_id, a.order_id);
    assert_eq!(f[1].order_id, b.order_id);
}

#[test]
fn dropping_all_strategy_actions_replays_the_raw_market_data_stream() {
    let mds = vec![snapshot(100, 99.0, 101.0), trade(200, Side::Bid, 101.5, 1.0)];
    let mut sim = Simulator::builder().market_data(mds.clone()).build().unwrap();

    let (ts1, batch1) = sim.tick().unwrap();
    assert_eq!(ts1, 100);
    assert_eq!(batch1, vec![StrategyEvent::Md(mds[0].clone())]);

    let (ts2, batch2) = sim.tick().unwrap();
    assert_eq!(ts2, 200);
    assert_eq!(batch2, vec![StrategyEvent::Md(mds[1].clone())]);

    assert!(matches!(sim.tick(), Err(SimError::EndOfData)));
}
