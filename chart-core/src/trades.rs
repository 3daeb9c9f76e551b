//! Reconstruction of completed trades from a signal stream.

use crate::{Action, Side, Signal, Trade};

/// Pairs open/close signals into completed trades.
///
/// Signals are processed in chronological order (stable sort, so
/// same-timestamp signals keep their input order). Each side carries at
/// most one pending open: a second open on the same side replaces the
/// first, and a close without a pending open on its side is ignored. A
/// pair only becomes a trade when the open strictly precedes the close.
/// Output is ordered by close time.
pub fn reconstruct_trades(signals: &[Signal]) -> Vec<Trade> {
    let mut ordered: Vec<&Signal> = signals.iter().collect();
    ordered.sort_by_key(|s| s.ts);

    let mut pending: [Option<&Signal>; 2] = [None, None];
    let slot = |side: Side| match side {
        Side::Long => 0,
        Side::Short => 1,
    };

    let mut trades = Vec::new();
    for signal in ordered {
        let side = signal.kind.side();
        match signal.kind.action() {
            Action::Open => {
                pending[slot(side)] = Some(signal);
            }
            Action::Close => {
                let Some(open) = pending[slot(side)].take() else {
                    continue;
                };
                if open.ts >= signal.ts {
                    continue;
                }
                let pnl = match side {
                    Side::Long => signal.price - open.price,
                    Side::Short => open.price - signal.price,
                };
                trades.push(Trade {
                    side,
                    open_ts: open.ts,
                    close_ts: signal.ts,
                    open_price: open.price,
                    close_price: signal.price,
                    pnl,
                });
            }
        }
    }
    trades
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SignalKind;

    fn sig(ts: i64, kind: SignalKind, price: f64) -> Signal {
        Signal {
            ts,
            kind,
            price,
            comment: None,
        }
    }

    #[test]
    fn long_and_short_round_trips() {
        let signals = vec![
            sig(1_000, SignalKind::LongOpen, 100.0),
            sig(2_000, SignalKind::LongClose, 110.0),
            sig(3_000, SignalKind::ShortOpen, 110.0),
            sig(4_000, SignalKind::ShortClose, 95.0),
        ];
        let trades = reconstruct_trades(&signals);
        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].side, Side::Long);
        assert_eq!(trades[0].pnl, 10.0);
        assert_eq!(trades[1].side, Side::Short);
        assert_eq!(trades[1].pnl, 15.0);
    }

    #[test]
    fn output_is_ordered_by_close_time() {
        // Short opens first but closes last.
        let signals = vec![
            sig(1_000, SignalKind::ShortOpen, 50.0),
            sig(2_000, SignalKind::LongOpen, 50.0),
            sig(3_000, SignalKind::LongClose, 55.0),
            sig(4_000, SignalKind::ShortClose, 45.0),
        ];
        let trades = reconstruct_trades(&signals);
        assert_eq!(trades.len(), 2);
        assert!(trades[0].close_ts < trades[1].close_ts);
        assert_eq!(trades[0].side, Side::Long);
    }

    #[test]
    fn duplicate_open_replaces_pending_open() {
        let signals = vec![
            sig(1_000, SignalKind::LongOpen, 100.0),
            sig(2_000, SignalKind::LongOpen, 105.0),
            sig(3_000, SignalKind::LongClose, 110.0),
        ];
        let trades = reconstruct_trades(&signals);
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].open_ts, 2_000);
        assert_eq!(trades[0].pnl, 5.0);
    }

    #[test]
    fn orphan_close_produces_nothing() {
        let signals = vec![sig(1_000, SignalKind::LongClose, 110.0)];
        assert!(reconstruct_trades(&signals).is_empty());

        // A close on the wrong side must not consume the other side's open.
        let signals = vec![
            sig(1_000, SignalKind::LongOpen, 100.0),
            sig(2_000, SignalKind::ShortClose, 90.0),
            sig(3_000, SignalKind::LongClose, 120.0),
        ];
        let trades = reconstruct_trades(&signals);
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].side, Side::Long);
        assert_eq!(trades[0].pnl, 20.0);
    }

    #[test]
    fn open_must_strictly_precede_close() {
        let signals = vec![
            sig(2_000, SignalKind::LongOpen, 100.0),
            sig(2_000, SignalKind::LongClose, 110.0),
        ];
        assert!(reconstruct_trades(&signals).is_empty());
    }

    #[test]
    fn unsorted_input_yields_same_trades() {
        let sorted = vec![
            sig(1_000, SignalKind::LongOpen, 100.0),
            sig(2_000, SignalKind::LongClose, 103.0),
            sig(5_000, SignalKind::ShortOpen, 103.0),
            sig(9_000, SignalKind::ShortClose, 99.0),
        ];
        let mut shuffled = sorted.clone();
        shuffled.swap(0, 3);
        shuffled.swap(1, 2);
        assert_eq!(reconstruct_trades(&sorted), reconstruct_trades(&shuffled));
    }

    #[test]
    fn sides_interleave_independently() {
        let signals = vec![
            sig(1_000, SignalKind::LongOpen, 100.0),
            sig(2_000, SignalKind::ShortOpen, 101.0),
            sig(3_000, SignalKind::ShortClose, 97.0),
            sig(4_000, SignalKind::LongClose, 104.0),
        ];
        let trades = reconstruct_trades(&signals);
        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].side, Side::Short);
        assert_eq!(trades[0].pnl, 4.0);
        assert_eq!(trades[1].side, Side::Long);
        assert_eq!(trades[1].pnl, 4.0);
    }
}
