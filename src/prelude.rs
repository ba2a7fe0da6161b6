pub use crate::{
    error::SimError,
    simulator::{Simulator, SimulatorBuilder},
    types::{
        Action, AnonTrade, CancelOrder, ExecKind, Level, MdUpdate, Order, OrderBookSnapshot,
        OrderId, OwnTrade, Side, StrategyEvent, TradeId,
    },
};
