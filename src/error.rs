use thiserror::Error;

/// Errors that can arise while driving the simulator.
///
/// Following the engine's error disposition: a cancel of an unknown order id is never
/// represented here, it is silently ignored by [`crate::simulator::Simulator::cancel_order`] and
/// logged via `tracing::warn!` instead.
#[derive(Error, Debug)]
pub enum SimError {
    /// An [`MdUpdate`](crate::types::MdUpdate) carried neither a snapshot nor a trade.
    #[error("market-data update at exchange_ts={exchange_ts} carries neither a snapshot nor a trade")]
    MalformedUpdate {
        /// Exchange timestamp of the offending update.
        exchange_ts: i64,
    },
    /// A [`Side`](crate::types::Side) value other than `Bid`/`Ask` reached matching.
    #[error("unsupported side encountered during matching")]
    UnsupportedSide,
    /// `place_order` was called with a non-positive size or a non-finite price.
    #[error("invalid order: {reason}")]
    InvalidOrder {
        /// Human-readable reason the order was rejected.
        reason: &'static str,
    },
    /// Every queue has been drained; there is no more data to replay.
    #[error("end of market-data stream")]
    EndOfData,
}
